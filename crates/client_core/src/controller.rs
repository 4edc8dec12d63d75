//! List-query state machine: page, sort and filters in, fetch requests out.
//!
//! Every transition consumes the current [`ListState`] and returns the next
//! one together with at most one [`FetchRequest`]. Nothing here performs I/O;
//! [`crate::view::ListView`] runs the requests and feeds the outcomes back.

use shared::{
    domain::SortKey,
    protocol::{ListPage, PaginationMetadata},
};
use tracing::debug;

use crate::{
    presenter::{ErrorPresenter, ViewError},
    query::{FilterPatch, ListParams, QueryError, QueryState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    Mount,
    SetSort(SortKey),
    SetFilter(FilterPatch),
    ResetAll,
    SetPage(u32),
    Refresh,
}

/// Sequence number of an issued fetch. Only the newest one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: Generation,
    pub params: ListParams,
}

#[derive(Debug, Clone)]
pub struct Transition<T> {
    pub state: ListState<T>,
    pub fetch: Option<FetchRequest>,
}

impl<T> Transition<T> {
    fn unchanged(state: ListState<T>) -> Self {
        Self { state, fetch: None }
    }
}

#[derive(Debug, Clone)]
pub struct ListState<T> {
    query: QueryState,
    items: Vec<T>,
    pagination: Option<PaginationMetadata>,
    phase: Phase,
    errors: ErrorPresenter,
    latest: Generation,
}

impl<T> ListState<T> {
    pub fn new(page_size: u32) -> Result<Self, QueryError> {
        Ok(Self::with_query(QueryState::new(page_size)?))
    }

    /// State whose first fetch uses `query` instead of the defaults.
    pub fn with_query(query: QueryState) -> Self {
        Self {
            query,
            items: Vec::new(),
            pagination: None,
            phase: Phase::Idle,
            errors: ErrorPresenter::default(),
            latest: Generation::default(),
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&PaginationMetadata> {
        self.pagination.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.errors.current()
    }

    pub fn latest_generation(&self) -> Generation {
        self.latest
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.map_or(0, |p| p.total_pages)
    }

    pub fn apply(mut self, action: ListAction) -> Transition<T> {
        match action {
            ListAction::Mount | ListAction::Refresh => self.begin_fetch(),
            ListAction::SetSort(sort) => {
                self.query.set_sort(sort);
                self.begin_fetch()
            }
            ListAction::SetFilter(patch) => {
                self.query.apply_filter_patch(patch);
                self.begin_fetch()
            }
            ListAction::ResetAll => {
                self.query.reset();
                self.begin_fetch()
            }
            ListAction::SetPage(page) => {
                if page == 0 || page > self.total_pages() {
                    debug!(
                        page,
                        total_pages = self.total_pages(),
                        "ignoring out-of-range page request"
                    );
                    return Transition::unchanged(self);
                }
                self.query.set_page(page);
                self.begin_fetch()
            }
        }
    }

    /// Applies the outcome of the fetch tagged `generation`. Outcomes of
    /// superseded fetches are dropped.
    ///
    /// A page past the end of the result set is clamped to the last page,
    /// which is then fetched in a follow-up request.
    pub fn complete(
        mut self,
        generation: Generation,
        outcome: Result<ListPage<T>, ViewError>,
    ) -> Transition<T> {
        if generation != self.latest {
            debug!(
                ?generation,
                latest = ?self.latest,
                "dropping stale list response"
            );
            return Transition::unchanged(self);
        }

        match outcome {
            Ok(page) => {
                let reported = page.pagination.current_page;
                let total_pages = page.pagination.total_pages;
                if reported >= 1 && (total_pages == 0 || reported <= total_pages) {
                    self.query.set_page(reported);
                }
                self.items = page.items;
                self.pagination = Some(page.pagination);
                self.phase = Phase::Loaded;

                if total_pages > 0 && self.query.page() > total_pages {
                    debug!(
                        from = self.query.page(),
                        to = total_pages,
                        "requested page past the end, moving to last page"
                    );
                    return self.clamp_page(total_pages).begin_fetch();
                }
            }
            Err(err) => {
                self.errors.present(err);
                self.phase = Phase::Failed;
            }
        }
        Transition::unchanged(self)
    }

    /// Reconciles pagination after one item was removed on the backend and
    /// issues the single follow-up fetch.
    ///
    /// When the current page no longer exists, the last remaining page is
    /// fetched instead, so the view never lands on an empty page. Counts stay
    /// as the server last reported them until that fetch lands.
    pub fn item_deleted(self) -> Transition<T> {
        let Some(pagination) = self.pagination else {
            return self.begin_fetch();
        };
        let per_page = if pagination.items_per_page > 0 {
            pagination.items_per_page
        } else {
            self.query.page_size()
        };
        let last_page = pagination.total_items.saturating_sub(1).div_ceil(per_page);

        if self.query.page() > last_page && last_page > 0 {
            debug!(
                from = self.query.page(),
                to = last_page,
                "current page emptied by delete, moving to last page"
            );
            return self.clamp_page(last_page).begin_fetch();
        }
        self.begin_fetch()
    }

    pub fn delete_failed(mut self, error: ViewError) -> Self {
        self.errors.present(error);
        self
    }

    pub fn dismiss_error(mut self) -> Self {
        self.errors.dismiss();
        self
    }

    fn clamp_page(mut self, page: u32) -> Self {
        self.query.set_page(page);
        if let Some(pagination) = self.pagination.as_mut() {
            pagination.current_page = page;
        }
        self
    }

    fn begin_fetch(mut self) -> Transition<T> {
        self.latest = self.latest.next();
        self.errors.dismiss();
        self.phase = Phase::Loading;
        let fetch = FetchRequest {
            generation: self.latest,
            params: self.query.to_params(),
        };
        Transition {
            state: self,
            fetch: Some(fetch),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
