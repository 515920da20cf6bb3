//! Symbol model — arena storage, markers, and element holders.
//!
//! This layer has no dependency on the validation machinery: it describes
//! what the host symbol table supplies (real symbols and their declared
//! markers) and what the linking engine adds on top (virtual proxy symbols).

pub mod elements;
pub mod marker;
pub mod store;
pub mod symbol;

pub use elements::{AncestorLink, MarkerElements};
pub use marker::{MarkerInstance, MarkerName, MarkerSchema, MarkerValue, names};
pub use store::SymbolStore;
pub use symbol::{SymbolData, SymbolEntry, SymbolId, SymbolKind, VirtualShape, VirtualSymbol};
