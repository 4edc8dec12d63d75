//! Async driver that runs a [`ListState`] against a backend source.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    context::FallbackMessages,
    controller::{FetchRequest, ListAction, ListState},
    fetcher::{ItemMutator, ResultFetcher},
    presenter::{FailureKind, ViewError},
    query::{FilterPatch, QueryError, QueryState},
};
use shared::domain::SortKey;

/// One list view: owns its query, result set and error slot.
///
/// Each operation borrows the view mutably until its fetch has landed, so
/// readers never observe [`crate::controller::Phase::Loading`] through it.
/// A UI that renders a loading indicator should drive [`ListState`]
/// transitions itself and run the returned fetch requests.
pub struct ListView<S: ResultFetcher> {
    source: S,
    messages: Arc<FallbackMessages>,
    state: ListState<S::Item>,
}

impl<S> ListView<S>
where
    S: ResultFetcher + ItemMutator,
{
    pub fn new(
        source: S,
        page_size: u32,
        messages: Arc<FallbackMessages>,
    ) -> Result<Self, QueryError> {
        Ok(Self::with_query(source, QueryState::new(page_size)?, messages))
    }

    pub fn with_query(source: S, query: QueryState, messages: Arc<FallbackMessages>) -> Self {
        Self {
            source,
            messages,
            state: ListState::with_query(query),
        }
    }

    pub fn state(&self) -> &ListState<S::Item> {
        &self.state
    }

    pub async fn mount(&mut self) {
        self.dispatch(ListAction::Mount).await;
    }

    pub async fn refresh(&mut self) {
        self.dispatch(ListAction::Refresh).await;
    }

    pub async fn set_sort(&mut self, sort: SortKey) {
        self.dispatch(ListAction::SetSort(sort)).await;
    }

    pub async fn set_filter(&mut self, patch: FilterPatch) {
        self.dispatch(ListAction::SetFilter(patch)).await;
    }

    pub async fn reset_all(&mut self) {
        self.dispatch(ListAction::ResetAll).await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.dispatch(ListAction::SetPage(page)).await;
    }

    /// Deletes one item, then refetches the page that should be visible
    /// afterwards. Returns the error also left in the view on failure.
    pub async fn delete_item(&mut self, id: <S as ItemMutator>::Id) -> Result<(), ViewError> {
        match self.source.delete(id).await {
            Ok(()) => {
                info!(%id, "item deleted");
                let transition = self.state.clone().item_deleted();
                self.state = transition.state;
                self.run(transition.fetch).await;
                Ok(())
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed");
                let view_error = ViewError::from_request(FailureKind::Delete, &err, &self.messages);
                self.state = self.state.clone().delete_failed(view_error.clone());
                Err(view_error)
            }
        }
    }

    pub fn dismiss_error(&mut self) {
        self.state = self.state.clone().dismiss_error();
    }

    async fn dispatch(&mut self, action: ListAction) {
        let transition = self.state.clone().apply(action);
        self.state = transition.state;
        self.run(transition.fetch).await;
    }

    async fn run(&mut self, mut request: Option<FetchRequest>) {
        while let Some(current) = request.take() {
            debug!(
                generation = ?current.generation,
                page = current.params.page,
                sort = %current.params.sort,
                "fetching list page"
            );
            let outcome = self.source.fetch(&current.params).await.map_err(|err| {
                warn!(error = %err, page = current.params.page, "list fetch failed");
                ViewError::from_request(FailureKind::Load, &err, &self.messages)
            });
            let transition = self.state.clone().complete(current.generation, outcome);
            self.state = transition.state;
            request = transition.fetch;
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
