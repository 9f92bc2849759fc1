//! Observability for the canned-query engine
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Scope-based begin/complete logging with elapsed time
//!
//! Observability is read-only: it never changes the outcome of a registration or an execution.
//!
//! ```ignore
//! use canned_query::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::FactoryRegistered, &[("name", "cq.getChildren")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
