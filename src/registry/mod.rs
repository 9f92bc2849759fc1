//! Named registry
//!
//! Query definitions are looked up by name rather than wired by direct reference. Names are
//! validated against a pattern (a dotted namespace by default) and registered once.

mod errors;
mod registry;

pub use errors::{RegistryError, RegistryResult};
pub use registry::{NamedRegistry, DEFAULT_NAME_PATTERN};
