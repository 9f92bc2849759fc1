//! Post-fetch permission filtering with early cutoff
//!
//! When cutoff is allowed the scan stops once `requested_count + 1` items were accepted: the
//! window is full and one extra accepted item proves that more results exist. Candidates past
//! that point are never checked.

use super::errors::QueryResult;

/// Outcome of a permission scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredCandidates<T> {
    items: Vec<T>,
    scanned: usize,
    total_candidates: usize,
}

impl<T> FilteredCandidates<T> {
    /// Candidates accepted without any permission check
    pub fn unfiltered(items: Vec<T>) -> Self {
        let total_candidates = items.len();
        Self {
            items,
            scanned: total_candidates,
            total_candidates,
        }
    }

    /// Builds an outcome from a custom scan
    pub fn new(items: Vec<T>, scanned: usize, total_candidates: usize) -> Self {
        Self {
            items,
            scanned: scanned.min(total_candidates),
            total_candidates,
        }
    }

    /// Accepted items in scan order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of accepted items
    pub fn accepted(&self) -> usize {
        self.items.len()
    }

    /// Number of candidates that went through the permission check
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Candidates left unchecked by an early cutoff
    pub fn unscanned(&self) -> usize {
        self.total_candidates - self.scanned
    }

    /// True when every candidate was checked
    pub fn is_complete(&self) -> bool {
        self.scanned == self.total_candidates
    }
}

/// Applies a permission predicate to fetched candidates
pub struct PermissionFilter;

impl PermissionFilter {
    /// Keeps the candidates `allowed` accepts, in order.
    ///
    /// `requested_count` is the number of accepted items the page window needs (`None` for the
    /// full set). The scan stops early only when `cutoff_allowed` is set.
    pub fn apply<T, F>(
        candidates: Vec<T>,
        requested_count: Option<usize>,
        cutoff_allowed: bool,
        mut allowed: F,
    ) -> QueryResult<FilteredCandidates<T>>
    where
        F: FnMut(&T) -> QueryResult<bool>,
    {
        let total_candidates = candidates.len();
        let limit = match (cutoff_allowed, requested_count) {
            (true, Some(requested)) => Some(requested.saturating_add(1)),
            _ => None,
        };

        let mut accepted = Vec::with_capacity(limit.unwrap_or(total_candidates).min(total_candidates));
        let mut scanned = 0;

        for candidate in candidates {
            if limit.is_some_and(|limit| accepted.len() >= limit) {
                break;
            }
            scanned += 1;
            if allowed(&candidate)? {
                accepted.push(candidate);
            }
        }

        Ok(FilteredCandidates {
            items: accepted,
            scanned,
            total_candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::errors::QueryError;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("a{}", i)).collect()
    }

    #[test]
    fn test_full_scan_excludes_denied() {
        let filtered =
            PermissionFilter::apply(names(10), None, false, |n| Ok(n != "a5")).unwrap();
        assert_eq!(filtered.accepted(), 9);
        assert!(!filtered.items().contains(&"a5".to_string()));
        assert!(filtered.is_complete());
    }

    #[test]
    fn test_no_cutoff_scans_everything_even_when_window_is_small() {
        let filtered = PermissionFilter::apply(names(10), Some(2), false, |_| Ok(true)).unwrap();
        assert_eq!(filtered.accepted(), 10);
        assert_eq!(filtered.unscanned(), 0);
    }

    #[test]
    fn test_cutoff_stops_after_look_ahead() {
        let mut checks = 0;
        let filtered = PermissionFilter::apply(names(10), Some(3), true, |_| {
            checks += 1;
            Ok(true)
        })
        .unwrap();

        assert_eq!(filtered.accepted(), 4);
        assert_eq!(filtered.scanned(), 4);
        assert_eq!(filtered.unscanned(), 6);
        assert_eq!(checks, 4);
    }

    #[test]
    fn test_cutoff_skips_over_denied_items() {
        let filtered =
            PermissionFilter::apply(names(10), Some(5), true, |n| Ok(n != "a5")).unwrap();
        let items = filtered.into_items();
        assert_eq!(items, vec!["a0", "a1", "a2", "a3", "a4", "a6"]);
    }

    #[test]
    fn test_cutoff_without_window_scans_everything() {
        let filtered = PermissionFilter::apply(names(10), None, true, |_| Ok(true)).unwrap();
        assert!(filtered.is_complete());
    }

    #[test]
    fn test_predicate_failure_propagates() {
        let result = PermissionFilter::apply(names(3), None, false, |n| {
            if n == "a1" {
                Err(QueryError::collaborator("acl lookup failed"))
            } else {
                Ok(true)
            }
        });
        assert_eq!(result.unwrap_err().to_string(), "acl lookup failed");
    }

    #[test]
    fn test_unfiltered() {
        let filtered = FilteredCandidates::unfiltered(names(4));
        assert_eq!(filtered.accepted(), 4);
        assert!(filtered.is_complete());
    }
}
