//! Query state of a list view and the request parameters derived from it.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use shared::domain::{CategoryId, SortKey};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("page size must be greater than zero")]
    InvalidPageSize,
    #[error("date range start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive publish-date window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub date_range: Option<DateRange>,
    pub category_ids: Option<BTreeSet<CategoryId>>,
    pub search_query: Option<String>,
}

impl ListFilters {
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.category_ids.is_none() && self.search_query.is_none()
    }

    /// Shallow merge: every field the patch touches replaces the current one.
    pub fn merge(&self, patch: FilterPatch) -> ListFilters {
        let mut next = self.clone();
        if let Some(date_range) = patch.date_range {
            next.date_range = date_range;
        }
        if let Some(category_ids) = patch.category_ids {
            next.category_ids = category_ids.filter(|ids| !ids.is_empty());
        }
        if let Some(search_query) = patch.search_query {
            next.search_query = search_query
                .map(|query| query.trim().to_string())
                .filter(|query| !query.is_empty());
        }
        next
    }
}

/// Partial filter update. Untouched fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    date_range: Option<Option<DateRange>>,
    category_ids: Option<Option<BTreeSet<CategoryId>>>,
    search_query: Option<Option<String>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(Some(range));
        self
    }

    pub fn clear_date_range(mut self) -> Self {
        self.date_range = Some(None);
        self
    }

    pub fn categories(mut self, ids: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids = Some(Some(ids.into_iter().collect()));
        self
    }

    pub fn clear_categories(mut self) -> Self {
        self.category_ids = Some(None);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(Some(query.into()));
        self
    }

    pub fn clear_search(mut self) -> Self {
        self.search_query = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.category_ids.is_none() && self.search_query.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    sort: SortKey,
    filters: ListFilters,
}

impl QueryState {
    pub fn new(page_size: u32) -> Result<Self, QueryError> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        Ok(Self {
            page: 1,
            page_size,
            sort: SortKey::default(),
            filters: ListFilters::default(),
        })
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filters(mut self, patch: FilterPatch) -> Self {
        self.filters = self.filters.merge(patch);
        self
    }

    /// Starting page for the first fetch; values below 1 are raised to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn filters(&self) -> &ListFilters {
        &self.filters
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    pub(crate) fn apply_filter_patch(&mut self, patch: FilterPatch) {
        self.filters = self.filters.merge(patch);
        self.page = 1;
    }

    pub(crate) fn reset(&mut self) {
        self.sort = SortKey::default();
        self.filters = ListFilters::default();
        self.page = 1;
    }

    pub fn to_params(&self) -> ListParams {
        let date_range = self.filters.date_range;
        ListParams {
            page: self.page,
            limit: self.page_size,
            sort: self.sort,
            start_date: date_range.map(|range| range.start),
            end_date: date_range.map(|range| range.end),
            categories: self.filters.category_ids.as_ref().map(|ids| {
                ids.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            }),
            search: self.filters.search_query.clone(),
        }
    }
}

/// Query string sent with a list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub sort: SortKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}
