use std::sync::Arc;

use thiserror::Error;

/// Errors on the crate's fallible surfaces. Validation failures are not
/// errors — they become diagnostics; this enum covers API misuse and
/// unresolvable configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A handler for this marker is already registered.
    #[error("a handler for marker '{target}' is already registered")]
    DuplicateHandler { target: Arc<str> },

    /// A component interface has several eligible implementations and no
    /// explicit disambiguation.
    #[error("cannot decide between multiple implementations of '{interface}': {}", candidates.join(", "))]
    AmbiguousComposition {
        interface: Arc<str>,
        candidates: Vec<Arc<str>>,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;
