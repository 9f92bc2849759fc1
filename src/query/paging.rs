//! Listing-style paging requests
//!
//! A `PagingRequest` is what a listing endpoint receives: skip this many, give me at most that
//! many, and optionally tell me roughly how many there are in total.

use serde::{Deserialize, Serialize};

use super::errors::QueryResult;
use super::params::{PageSpec, QueryParameters, SortSpec};

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingRequest {
    #[serde(default)]
    skip_count: u32,
    max_items: u32,
    /// `0` (the default) means no total is needed, which lets permission checks stop early
    #[serde(default)]
    request_total_count_max: i64,
    #[serde(default)]
    query_execution_id: Option<String>,
}

impl PagingRequest {
    /// Fails with `InvalidPageSize` when `max_items == 0`
    pub fn new(skip_count: u32, max_items: u32) -> QueryResult<Self> {
        PageSpec::single(skip_count, max_items)?;
        Ok(Self {
            skip_count,
            max_items,
            request_total_count_max: 0,
            query_execution_id: None,
        })
    }

    /// First page of `max_items`
    pub fn first(max_items: u32) -> QueryResult<Self> {
        Self::new(0, max_items)
    }

    pub fn with_total_count_max(mut self, max: i64) -> Self {
        self.request_total_count_max = max;
        self
    }

    /// Reuses the execution id of an earlier page so related pages can be correlated
    pub fn with_query_execution_id(mut self, id: impl Into<String>) -> Self {
        self.query_execution_id = Some(id.into());
        self
    }

    pub fn skip_count(&self) -> u32 {
        self.skip_count
    }

    pub fn max_items(&self) -> u32 {
        self.max_items
    }

    pub fn request_total_count_max(&self) -> i64 {
        self.request_total_count_max
    }

    pub fn query_execution_id(&self) -> Option<&str> {
        self.query_execution_id.as_deref()
    }

    /// The request as a single-page window
    pub fn to_page_spec(&self) -> QueryResult<PageSpec> {
        PageSpec::single(self.skip_count, self.max_items)
    }

    /// The request after this one
    pub fn next(&self) -> Self {
        Self {
            skip_count: self.skip_count.saturating_add(self.max_items),
            ..self.clone()
        }
    }

    /// Builds query parameters for this page. The total-count max always becomes the
    /// total-count cap, so the default of `0` allows a permission cutoff.
    pub fn to_parameters<A>(
        &self,
        argument: Option<A>,
        sort: Option<SortSpec>,
    ) -> QueryResult<QueryParameters<A>> {
        let mut params = match argument {
            Some(argument) => QueryParameters::new(argument),
            None => QueryParameters::without_argument(),
        }
        .with_page(self.to_page_spec()?)
        .with_total_count_cap(self.request_total_count_max);

        if let Some(sort) = sort {
            params = params.with_sort(sort);
        }
        if let Some(id) = &self.query_execution_id {
            params = params.with_query_execution_id(id.clone());
        }
        Ok(params)
    }
}
