//! Query results

use super::errors::{QueryError, QueryResult};

/// Outcome of one query execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults<T> {
    query_execution_id: String,
    pages: Vec<Vec<T>>,
    paged_result_count: u32,
    has_more_items: bool,
    total_count: Option<(i64, i64)>,
}

impl<T> QueryResults<T> {
    pub(crate) fn new(
        query_execution_id: String,
        pages: Vec<Vec<T>>,
        has_more_items: bool,
        total_count: Option<(i64, i64)>,
    ) -> Self {
        let paged_result_count = pages.iter().map(Vec::len).sum::<usize>();
        Self {
            query_execution_id,
            pages,
            paged_result_count: u32::try_from(paged_result_count).unwrap_or(u32::MAX),
            has_more_items,
            total_count,
        }
    }

    /// Identifier shared with the parameters that produced these results
    pub fn query_execution_id(&self) -> &str {
        &self.query_execution_id
    }

    /// Materialized pages, in page order
    pub fn pages(&self) -> &[Vec<T>] {
        &self.pages
    }

    /// The only page. Empty when nothing was materialized.
    ///
    /// Fails with `MultiplePages` when more than one page was requested and filled.
    pub fn page(&self) -> QueryResult<&[T]> {
        match self.pages.as_slice() {
            [] => Ok(&[]),
            [page] => Ok(page),
            pages => Err(QueryError::MultiplePages(pages.len() as u32)),
        }
    }

    /// Items across all materialized pages
    pub fn paged_result_count(&self) -> u32 {
        self.paged_result_count
    }

    /// Pages actually materialized; never more than requested
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// True if filtered results exist past the last materialized page
    pub fn has_more_items(&self) -> bool {
        self.has_more_items
    }

    /// `(low, high)` bound on the number of filtered results before windowing.
    ///
    /// Exact (`low == high`) unless an early permission cutoff left candidates unchecked.
    pub fn total_count(&self) -> QueryResult<(i64, i64)> {
        self.total_count.ok_or(QueryError::TotalNotRequested)
    }

    pub fn is_empty(&self) -> bool {
        self.paged_result_count == 0
    }

    pub fn into_pages(self) -> Vec<Vec<T>> {
        self.pages
    }

    /// Collapses the materialized pages into one caller-facing page
    pub fn into_paging_results(self) -> PagingResults<T> {
        PagingResults {
            query_execution_id: self.query_execution_id,
            page: self.pages.into_iter().flatten().collect(),
            has_more_items: self.has_more_items,
            total_count: self.total_count,
        }
    }
}

/// A single page handed back to a listing caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingResults<T> {
    query_execution_id: String,
    page: Vec<T>,
    has_more_items: bool,
    total_count: Option<(i64, i64)>,
}

impl<T> PagingResults<T> {
    pub fn query_execution_id(&self) -> &str {
        &self.query_execution_id
    }

    pub fn page(&self) -> &[T] {
        &self.page
    }

    pub fn into_page(self) -> Vec<T> {
        self.page
    }

    pub fn has_more_items(&self) -> bool {
        self.has_more_items
    }

    /// `None` unless the caller asked for a total count
    pub fn total_count(&self) -> Option<(i64, i64)> {
        self.total_count
    }

    /// Applies `f` to every item, keeping paging metadata
    pub fn map<U, F>(self, f: F) -> PagingResults<U>
    where
        F: FnMut(T) -> U,
    {
        PagingResults {
            query_execution_id: self.query_execution_id,
            page: self.page.into_iter().map(f).collect(),
            has_more_items: self.has_more_items,
            total_count: self.total_count,
        }
    }
}
