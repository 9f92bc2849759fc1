//! Query factories
//!
//! A factory turns parameters into a fresh `Query`. Factories are shared (`Send + Sync`) and
//! registered by name; the queries they create are not.

use std::sync::Arc;

use super::errors::QueryResult;
use super::paging::PagingRequest;
use super::params::{QueryParameters, SortSpec};
use super::query::{CannedQuery, Query};
use super::sorter::{PropertyAccess, ResultSorter};
use crate::registry::{NamedRegistry, RegistryResult};

/// Creates single-use queries of one kind
pub trait CannedQueryFactory<T, A = ()>: Send + Sync {
    /// Name the factory registers under
    fn name(&self) -> &str;

    /// Creates a query bound to `parameters`
    fn create(&self, parameters: QueryParameters<A>) -> Query<T, A>;

    /// Creates a query for one page of a listing
    fn create_paged(
        &self,
        argument: Option<A>,
        paging: &PagingRequest,
        sort: Option<SortSpec>,
    ) -> QueryResult<Query<T, A>> {
        Ok(self.create(paging.to_parameters(argument, sort)?))
    }
}

/// Registry of query factories sharing an item and argument type
pub type FactoryRegistry<T, A = ()> = NamedRegistry<dyn CannedQueryFactory<T, A>>;

impl<T: 'static, A: 'static> NamedRegistry<dyn CannedQueryFactory<T, A>> {
    /// Registers a factory under its own name
    pub fn register_factory(&self, factory: Arc<dyn CannedQueryFactory<T, A>>) -> RegistryResult<()> {
        let name = factory.name().to_string();
        self.register(name, factory)
    }

    /// Looks up a factory and creates a query from it
    pub fn create(&self, name: &str, parameters: QueryParameters<A>) -> Option<Query<T, A>> {
        self.lookup(name).map(|factory| factory.create(parameters))
    }
}

type FetchFn<T, A> = Arc<dyn Fn(Option<&A>) -> QueryResult<Vec<T>> + Send + Sync>;
type PermitFn<T> = Arc<dyn Fn(&T) -> QueryResult<bool> + Send + Sync>;
type SortFn<T> = Arc<dyn Fn(&mut [T], &SortSpec) + Send + Sync>;

/// A query kind assembled from closures
pub struct FnQuery<T, A = ()> {
    fetch: FetchFn<T, A>,
    permit: Option<PermitFn<T>>,
    sort: Option<SortFn<T>>,
}

impl<T, A> CannedQuery<T, A> for FnQuery<T, A> {
    fn fetch(&mut self, argument: Option<&A>) -> QueryResult<Vec<T>> {
        (self.fetch)(argument)
    }

    fn is_apply_sorting(&self, _sort: &SortSpec) -> bool {
        self.sort.is_some()
    }

    fn apply_sorting(&self, mut items: Vec<T>, sort: &SortSpec) -> QueryResult<Vec<T>> {
        if let Some(sort_fn) = &self.sort {
            sort_fn(items.as_mut_slice(), sort);
        }
        Ok(items)
    }

    fn is_apply_permissions(&self) -> bool {
        self.permit.is_some()
    }

    fn is_permitted(&self, item: &T) -> QueryResult<bool> {
        match &self.permit {
            Some(permit) => permit(item),
            None => Ok(true),
        }
    }
}

/// Factory producing `FnQuery` instances that share the same closures
pub struct FnQueryFactory<T, A = ()> {
    name: String,
    fetch: FetchFn<T, A>,
    permit: Option<PermitFn<T>>,
    sort: Option<SortFn<T>>,
}

impl<T, A> FnQueryFactory<T, A> {
    /// A factory whose queries fetch with `fetch`, with no sorting and no permission checks
    pub fn new<F>(name: impl Into<String>, fetch: F) -> Self
    where
        F: Fn(Option<&A>) -> QueryResult<Vec<T>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            fetch: Arc::new(fetch),
            permit: None,
            sort: None,
        }
    }

    /// Adds a post-fetch permission predicate
    pub fn with_permission<P>(mut self, permit: P) -> Self
    where
        P: Fn(&T) -> QueryResult<bool> + Send + Sync + 'static,
    {
        self.permit = Some(Arc::new(permit));
        self
    }

    /// Adds post-fetch sorting. `sort` must be stable.
    pub fn with_sorting<S>(mut self, sort: S) -> Self
    where
        S: Fn(&mut [T], &SortSpec) + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Wraps the factory for registration
    pub fn into_shared(self) -> Arc<dyn CannedQueryFactory<T, A>>
    where
        T: 'static,
        A: 'static,
    {
        Arc::new(self)
    }
}

impl<T: PropertyAccess + 'static, A> FnQueryFactory<T, A> {
    /// Adds post-fetch sorting by item properties
    pub fn with_property_sorting(self) -> Self {
        self.with_sorting(|items: &mut [T], sort: &SortSpec| ResultSorter::sort(items, sort))
    }
}

impl<T: 'static, A: 'static> CannedQueryFactory<T, A> for FnQueryFactory<T, A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, parameters: QueryParameters<A>) -> Query<T, A> {
        let kind = FnQuery {
            fetch: Arc::clone(&self.fetch),
            permit: self.permit.clone(),
            sort: self.sort.clone(),
        };
        Query::new(kind, parameters)
    }
}
