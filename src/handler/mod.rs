//! Pluggable marker handlers.
//!
//! A handler is polymorphic over one target marker name: it validates every
//! symbol carrying that marker and, downstream, synthesizes companion output
//! for the symbols that validated. The registry keeps handlers in processing
//! order with optional "run before" hints.

pub mod registry;
pub mod validation;

pub use registry::{HandlerRegistry, MarkerHandler, PluginInfo, ValidationContext};
pub use validation::{ValidationMessage, ValidationResult};
