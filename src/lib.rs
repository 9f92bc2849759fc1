//! canned-query - single-use, pageable, permission-aware query execution
//!
//! A factory, registered by name, creates a `Query` bound to its parameters. Executing the
//! query fetches candidates, sorts them, filters them by permission and cuts the requested
//! page window. Each query runs at most once.

pub mod config;
pub mod observability;
pub mod query;
pub mod registry;

pub use config::{ConfigError, EngineConfig};
pub use query::{
    CannedQuery, CannedQueryFactory, FactoryRegistry, FnQueryFactory, PageSpec, PagingRequest,
    PagingResults, Query, QueryError, QueryParameters, QueryResult, QueryResults, SortDirection,
    SortSpec,
};
pub use registry::{NamedRegistry, RegistryError};
