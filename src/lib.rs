//! # weft-base
//!
//! Core library for marker-driven code generation: symbol validation,
//! virtual symbol linking, and handler orchestration.
//!
//! The host toolchain extracts the declared symbols carrying declarative
//! markers and hands them to [`process::ModelValidator`], which drives every
//! registered handler over its marked symbols, synthesizes virtual symbols
//! for the export/import composition model, and collects diagnostics. The
//! validated result feeds the downstream generation stage.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! process     → validation orchestrator, composition marker policy
//!   ↓
//! handler     → pluggable marker handlers, results, ordered registry
//!   ↓
//! synthesis   → virtual symbol synthesizer, composition-site index
//!   ↓
//! adi         → retroactively granted markers, keyed by stable path
//!   ↓
//! model       → symbol arena, marker schemas/instances, element holders
//! ```
//!
//! `diagnostics` and `error` sit beside the stack: the collector is filled
//! by the orchestrator and rendered by the host; `ModelError` covers the
//! fallible registration surfaces.

// ============================================================================
// MODULES (dependency order: model → adi → synthesis → handler → process)
// ============================================================================

/// Symbol arena, marker schemas/instances, element holders
pub mod model;

/// Retroactive marker registry (ADI)
pub mod adi;

/// Virtual symbol synthesizer and composition-site index
pub mod synthesis;

/// Pluggable marker handlers, validation results, ordered registry
pub mod handler;

/// Validation orchestrator and composition marker policy
pub mod process;

/// Diagnostics: severities, codes, collector
pub mod diagnostics;

/// Error types for the fallible registration surfaces
pub mod error;

// Re-export the working surface
pub use adi::AdiRegistry;
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity};
pub use error::{ModelError, ModelResult};
pub use handler::{
    HandlerRegistry, MarkerHandler, PluginInfo, ValidationContext, ValidationResult,
};
pub use model::{
    AncestorLink, MarkerElements, MarkerInstance, MarkerName, MarkerSchema, MarkerValue,
    SymbolId, SymbolKind, SymbolStore, VirtualShape, names,
};
pub use process::{CompositionMarkers, ModelValidator, ProcessingContext};
pub use synthesis::{CompositionSites, VirtualSynthesizer};
