//! Query parameter value objects
//!
//! `QueryParameters`, `PageSpec` and `SortSpec` are immutable once built. Invalid page shapes are
//! rejected at construction so an execution never starts with a window it cannot fill.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{QueryError, QueryResult};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Applies the direction to an ascending comparison
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// One `(key, direction)` entry of a sort specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortPair {
    pub key: String,
    pub direction: SortDirection,
}

/// Ordered sort keys, primary key first. Empty means "keep fetch order".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    pairs: Vec<SortPair>,
}

impl SortSpec {
    /// Creates an empty sort specification
    pub fn new() -> Self {
        Self::default()
    }

    /// Single ascending key
    pub fn asc(key: impl Into<String>) -> Self {
        Self::new().then_asc(key)
    }

    /// Single descending key
    pub fn desc(key: impl Into<String>) -> Self {
        Self::new().then_desc(key)
    }

    /// Appends a key with the given direction
    pub fn then(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.pairs.push(SortPair {
            key: key.into(),
            direction,
        });
        self
    }

    /// Appends an ascending key
    pub fn then_asc(self, key: impl Into<String>) -> Self {
        self.then(key, SortDirection::Ascending)
    }

    /// Appends a descending key
    pub fn then_desc(self, key: impl Into<String>) -> Self {
        self.then(key, SortDirection::Descending)
    }

    pub fn pairs(&self) -> &[SortPair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl FromIterator<(String, SortDirection)> for SortSpec {
    fn from_iter<I: IntoIterator<Item = (String, SortDirection)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, direction)| SortPair { key, direction })
                .collect(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{} {}", pair.key, pair.direction.as_str())?;
        }
        Ok(())
    }
}

/// The requested results window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PageSpecRepr")]
pub struct PageSpec {
    skip_count: u32,
    page_size: u32,
    start_page: u32,
    page_count: u32,
}

impl PageSpec {
    /// Creates a page window.
    ///
    /// Fails with `InvalidPageSize` when `page_size == 0`, `InvalidPageNumber` when
    /// `start_page == 0` and `InvalidPageCount` when `page_count == 0`.
    pub fn new(skip_count: u32, page_size: u32, start_page: u32, page_count: u32) -> QueryResult<Self> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }
        if start_page == 0 {
            return Err(QueryError::InvalidPageNumber);
        }
        if page_count == 0 {
            return Err(QueryError::InvalidPageCount);
        }
        Ok(Self {
            skip_count,
            page_size,
            start_page,
            page_count,
        })
    }

    /// One page of `page_size` items after skipping `skip_count`
    pub fn single(skip_count: u32, page_size: u32) -> QueryResult<Self> {
        Self::new(skip_count, page_size, 1, 1)
    }

    pub fn skip_count(&self) -> u32 {
        self.skip_count
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn start_page(&self) -> u32 {
        self.start_page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Filtered items dropped before the first materialized page.
    /// Pages before `start_page` count as skipped.
    pub fn offset(&self) -> usize {
        let preceding = u64::from(self.start_page - 1) * u64::from(self.page_size);
        saturate(u64::from(self.skip_count).saturating_add(preceding))
    }

    /// Maximum number of items across all materialized pages
    pub fn window_size(&self) -> usize {
        saturate(u64::from(self.page_size) * u64::from(self.page_count))
    }

    /// Filtered items needed to fill the whole window
    pub fn requested_count(&self) -> usize {
        self.offset().saturating_add(self.window_size())
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            skip_count: 0,
            page_size: u32::MAX,
            start_page: 1,
            page_count: 1,
        }
    }
}

fn saturate(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[derive(Deserialize)]
struct PageSpecRepr {
    #[serde(default)]
    skip_count: u32,
    page_size: u32,
    #[serde(default = "default_start_page")]
    start_page: u32,
    #[serde(default = "default_page_count")]
    page_count: u32,
}

fn default_start_page() -> u32 {
    1
}

fn default_page_count() -> u32 {
    1
}

impl TryFrom<PageSpecRepr> for PageSpec {
    type Error = QueryError;

    fn try_from(repr: PageSpecRepr) -> Result<Self, Self::Error> {
        PageSpec::new(repr.skip_count, repr.page_size, repr.start_page, repr.page_count)
    }
}

/// Everything a caller asks of one execution
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters<A = ()> {
    query_argument: Option<A>,
    page: Option<PageSpec>,
    sort: Option<SortSpec>,
    total_count_cap: Option<i64>,
    query_execution_id: String,
}

impl<A> QueryParameters<A> {
    /// Parameters carrying `argument`, with no paging, no sorting and no total count
    pub fn new(argument: A) -> Self {
        Self::from_argument(Some(argument))
    }

    /// Parameters without a query argument
    pub fn without_argument() -> Self {
        Self::from_argument(None)
    }

    fn from_argument(query_argument: Option<A>) -> Self {
        Self {
            query_argument,
            page: None,
            sort: None,
            total_count_cap: None,
            query_execution_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_page(mut self, page: PageSpec) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// `0` allows the permission scan to stop once the window is filled; any other value asks
    /// for a full scan and an exact total.
    pub fn with_total_count_cap(mut self, cap: i64) -> Self {
        self.total_count_cap = Some(cap);
        self
    }

    pub fn with_query_execution_id(mut self, id: impl Into<String>) -> Self {
        self.query_execution_id = id.into();
        self
    }

    pub fn query_argument(&self) -> Option<&A> {
        self.query_argument.as_ref()
    }

    pub fn page(&self) -> Option<&PageSpec> {
        self.page.as_ref()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// The sort specification if present and non-empty
    pub fn effective_sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref().filter(|s| !s.is_empty())
    }

    pub fn total_count_cap(&self) -> Option<i64> {
        self.total_count_cap
    }

    pub fn query_execution_id(&self) -> &str {
        &self.query_execution_id
    }

    /// True when the caller gave up an exact total in exchange for an early permission cutoff
    pub fn is_cutoff_allowed(&self) -> bool {
        self.total_count_cap == Some(0)
    }

    pub fn is_total_count_requested(&self) -> bool {
        self.total_count_cap.is_some()
    }

    /// Filtered items needed to fill the window; `None` means the full filtered set
    pub fn requested_count(&self) -> Option<usize> {
        self.page.as_ref().map(PageSpec::requested_count)
    }
}
