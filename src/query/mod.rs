//! Canned query execution
//!
//! A canned query is fetched, optionally sorted, optionally permission-filtered and cut into
//! a page window, exactly once.
//!
//! # Execution Flow (strict order)
//!
//! 1. Refuse a query that already ran
//! 2. Fetch raw candidates
//! 3. Apply sort (if specified and supported)
//! 4. Apply permission filter; stop early only if the total-count cap is `0`
//! 5. Estimate the total count (if a cap was supplied)
//! 6. Skip, then cut `page_count` pages of `page_size`
//!
//! # Total count
//!
//! With an early cutoff the total is a `(low, high)` range: `low` items were accepted, and at
//! most `high - low` more were never checked. A full scan yields an exact `(n, n)`.

mod errors;
mod factory;
mod paging;
mod params;
mod permissions;
mod query;
mod results;
mod sorter;
mod window;

pub use errors::{CollaboratorError, QueryError, QueryResult};
pub use factory::{CannedQueryFactory, FactoryRegistry, FnQuery, FnQueryFactory};
pub use paging::PagingRequest;
pub use params::{PageSpec, QueryParameters, SortDirection, SortPair, SortSpec};
pub use permissions::{FilteredCandidates, PermissionFilter};
pub use query::{CannedQuery, Query, QueryState};
pub use results::{PagingResults, QueryResults};
pub use sorter::{PropertyAccess, ResultSorter};
pub use window::PagedWindow;
