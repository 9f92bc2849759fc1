//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events raised by the registry and the query executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded
    ConfigLoaded,

    // Registry
    /// Factory registered under a name
    FactoryRegistered,
    /// Registration refused (invalid or duplicate name)
    FactoryRejected,

    // Query
    /// Query created by a factory
    QueryCreated,
    /// Second execution attempt on a spent query
    QueryReused,
    /// Permission scan stopped before the end of the candidates
    PermissionCutoff,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::FactoryRegistered => "FACTORY_REGISTERED",
            Event::FactoryRejected => "FACTORY_REJECTED",

            Event::QueryCreated => "QUERY_CREATED",
            Event::QueryReused => "QUERY_REUSED",
            Event::PermissionCutoff => "PERMISSION_CUTOFF",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryCreated | Event::PermissionCutoff => Severity::Trace,
            Event::ConfigLoaded | Event::FactoryRegistered => Severity::Info,
            Event::FactoryRejected | Event::QueryReused => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::FactoryRegistered,
            Event::FactoryRejected,
            Event::QueryCreated,
            Event::QueryReused,
            Event::PermissionCutoff,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_per_execution_events_are_trace() {
        assert_eq!(Event::QueryCreated.severity(), Severity::Trace);
        assert_eq!(Event::PermissionCutoff.severity(), Severity::Trace);
        assert_eq!(Event::QueryReused.severity(), Severity::Warn);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::FactoryRegistered), "FACTORY_REGISTERED");
    }
}
