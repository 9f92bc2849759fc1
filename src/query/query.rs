//! Single-use query executor
//!
//! Execution flow (strict order):
//! 1. Refuse a spent query
//! 2. Fetch raw candidates from the query kind
//! 3. Sort (if requested and supported by the query kind)
//! 4. Permission-filter, stopping early only when the caller allowed a cutoff
//! 5. Estimate the total count (if requested)
//! 6. Cut the page window

use super::errors::{QueryError, QueryResult};
use super::params::{QueryParameters, SortSpec};
use super::permissions::{FilteredCandidates, PermissionFilter};
use super::results::QueryResults;
use super::window::PagedWindow;
use crate::observability::{log_event_with_fields, Event, ObservationScope, Severity};

/// The collaborator side of a canned query: where candidates come from and how they are
/// ordered and checked. Only `fetch` is required.
pub trait CannedQuery<T, A = ()>: Send {
    /// Retrieves raw candidates for `argument`. Errors propagate to the caller of `execute`.
    fn fetch(&mut self, argument: Option<&A>) -> QueryResult<Vec<T>>;

    /// Whether this query kind sorts after fetching. Not called for an empty sort.
    fn is_apply_sorting(&self, _sort: &SortSpec) -> bool {
        false
    }

    /// Reorders candidates; must be stable
    fn apply_sorting(&self, items: Vec<T>, _sort: &SortSpec) -> QueryResult<Vec<T>> {
        Ok(items)
    }

    /// Whether this query kind checks permissions after fetching
    fn is_apply_permissions(&self) -> bool {
        false
    }

    /// Permission predicate for one candidate
    fn is_permitted(&self, _item: &T) -> QueryResult<bool> {
        Ok(true)
    }

    /// Keeps permitted candidates in order. `requested_count` is the number of filtered items
    /// the page window needs, `None` for all of them.
    fn apply_permission_filter(
        &self,
        items: Vec<T>,
        requested_count: Option<usize>,
        cutoff_allowed: bool,
    ) -> QueryResult<FilteredCandidates<T>> {
        PermissionFilter::apply(items, requested_count, cutoff_allowed, |item| {
            self.is_permitted(item)
        })
    }
}

/// Lifecycle of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Fresh,
    Consumed,
}

/// A query bound to its parameters. Executes at most once.
pub struct Query<T, A = ()> {
    parameters: QueryParameters<A>,
    kind: Box<dyn CannedQuery<T, A>>,
    state: QueryState,
}

impl<T, A> Query<T, A> {
    pub fn new<Q>(kind: Q, parameters: QueryParameters<A>) -> Self
    where
        Q: CannedQuery<T, A> + 'static,
    {
        Self::from_boxed(Box::new(kind), parameters)
    }

    pub fn from_boxed(kind: Box<dyn CannedQuery<T, A>>, parameters: QueryParameters<A>) -> Self {
        log_event_with_fields(
            Event::QueryCreated,
            &[("query_execution_id", parameters.query_execution_id())],
        );
        Self {
            parameters,
            kind,
            state: QueryState::Fresh,
        }
    }

    pub fn parameters(&self) -> &QueryParameters<A> {
        &self.parameters
    }

    pub fn query_execution_id(&self) -> &str {
        self.parameters.query_execution_id()
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    /// Runs the query.
    ///
    /// The query is spent as soon as this is called, whether or not the run succeeds; later
    /// calls fail with `AlreadyExecuted` and do nothing else.
    pub fn execute(&mut self) -> QueryResult<QueryResults<T>> {
        if self.state == QueryState::Consumed {
            let id = self.query_execution_id().to_string();
            log_event_with_fields(Event::QueryReused, &[("query_execution_id", id.as_str())]);
            return Err(QueryError::AlreadyExecuted(id));
        }
        self.state = QueryState::Consumed;

        let scope = ObservationScope::with_fields(
            "QUERY",
            Severity::Trace,
            &[("query_execution_id", self.parameters.query_execution_id())],
        );

        match self.run_pipeline() {
            Ok((results, filtered_scan)) => {
                let scanned = filtered_scan.scanned.to_string();
                let accepted = filtered_scan.accepted.to_string();
                let returned = results.paged_result_count().to_string();
                scope.complete_with_fields(&[
                    ("accepted", accepted.as_str()),
                    ("returned", returned.as_str()),
                    ("scanned", scanned.as_str()),
                ]);
                Ok(results)
            }
            Err(err) => {
                scope.fail(&err.to_string());
                Err(err)
            }
        }
    }

    /// Consumes the query and runs it
    pub fn run(mut self) -> QueryResult<QueryResults<T>> {
        self.execute()
    }

    fn run_pipeline(&mut self) -> QueryResult<(QueryResults<T>, ScanStats)> {
        let params = &self.parameters;
        let kind = &mut self.kind;

        let mut candidates = kind.fetch(params.query_argument())?;

        if let Some(sort) = params.effective_sort() {
            if kind.is_apply_sorting(sort) {
                candidates = kind.apply_sorting(candidates, sort)?;
            }
        }

        let filtered = if kind.is_apply_permissions() {
            kind.apply_permission_filter(
                candidates,
                params.requested_count(),
                params.is_cutoff_allowed(),
            )?
        } else {
            FilteredCandidates::unfiltered(candidates)
        };

        if !filtered.is_complete() {
            let unscanned = filtered.unscanned().to_string();
            log_event_with_fields(
                Event::PermissionCutoff,
                &[
                    ("query_execution_id", params.query_execution_id()),
                    ("unscanned", unscanned.as_str()),
                ],
            );
        }

        let stats = ScanStats {
            scanned: filtered.scanned(),
            accepted: filtered.accepted(),
        };

        let total_count = params.is_total_count_requested().then(|| {
            let low = to_count(filtered.accepted());
            (low, low.saturating_add(to_count(filtered.unscanned())))
        });

        let window = PagedWindow::cut(filtered.into_items(), params.page());

        let results = QueryResults::new(
            params.query_execution_id().to_string(),
            window.pages,
            window.has_more_items,
            total_count,
        );
        Ok((results, stats))
    }
}

struct ScanStats {
    scanned: usize,
    accepted: usize,
}

fn to_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
