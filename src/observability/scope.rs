//! ObservationScope for start/complete logging around one unit of work
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` with elapsed time on `complete`
//! - Logs `{name}_FAILED` on `fail`, `{name}_INCOMPLETE` if dropped unfinished

use std::cell::Cell;
use std::time::Instant;

use super::logger::{Logger, Severity};

/// A scope that logs begin/complete events at a chosen severity
///
/// ```ignore
/// let scope = ObservationScope::new("QUERY", Severity::Trace);
/// // ... do work ...
/// scope.complete_with_fields(&[("accepted", "9")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    severity: Severity,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
    timer: Timer,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope. Logs `{name}_BEGIN` immediately.
    pub fn new(name: &'a str, severity: Severity) -> Self {
        Self::with_fields(name, severity, &[])
    }

    /// Create a new observation scope carrying fields on every line it logs
    pub fn with_fields(name: &'a str, severity: Severity, fields: &[(&'a str, &str)]) -> Self {
        if Logger::enabled(severity) {
            Logger::log(severity, &format!("{}_BEGIN", name), fields);
        }

        Self {
            name,
            severity,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            timer: Timer::new(),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as successfully completed with additional fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        if !Logger::enabled(self.severity) {
            return;
        }

        let elapsed = self.timer.elapsed_ms();
        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed.as_str()));

        Logger::log(self.severity, &format!("{}_COMPLETE", self.name), &all_fields);
    }

    /// Mark the scope as failed. Logged at ERROR regardless of the scope severity.
    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.push(("reason", reason));
        Logger::error(&format!("{}_FAILED", self.name), &all_fields);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed.get() {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_creation() {
        let scope = ObservationScope::new("TEST", Severity::Trace);
        assert!(!scope.is_completed());
        scope.complete();
    }

    #[test]
    fn test_scope_with_fields() {
        let scope = ObservationScope::with_fields("TEST", Severity::Trace, &[("id", "q-1")]);
        scope.complete_with_fields(&[("accepted", "3")]);
    }

    #[test]
    fn test_scope_fail() {
        let scope = ObservationScope::new("TEST", Severity::Trace);
        scope.fail("fetch failed");
    }

    #[test]
    fn test_scope_drop_without_complete() {
        let scope = ObservationScope::new("TEST", Severity::Trace);
        drop(scope);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ms: u64 = timer.elapsed_ms().parse().unwrap();
        assert!(ms >= 10);
    }
}
