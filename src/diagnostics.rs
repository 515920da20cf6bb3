//! Diagnostics — validation error reporting.
//!
//! Diagnostics are collected during the validation pass and handed to the
//! host toolchain for rendering. Each diagnostic names the offending symbol
//! with its full enclosing chain; virtual symbols are resolved back through
//! their reference and wrapped symbol so the reported location is always a
//! physically declared element.

use std::sync::Arc;

use crate::model::{MarkerName, SymbolId, SymbolStore};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A diagnostic message attached to a symbol.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The offending symbol.
    pub symbol: SymbolId,
    /// The marker being validated, if applicable.
    pub marker: Option<MarkerName>,
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Rendered enclosing chain locating the declaration.
    pub origin: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(store: &SymbolStore, symbol: SymbolId, message: impl Into<Arc<str>>) -> Self {
        Self {
            symbol,
            marker: None,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            origin: Arc::from(store.describe(symbol)),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(store: &SymbolStore, symbol: SymbolId, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(store, symbol, message)
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the marker under validation.
    pub fn with_marker(mut self, marker: impl Into<MarkerName>) -> Self {
        self.marker = Some(marker.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes for the validation pass.
///
/// - **E0001-E0099**: validation errors
/// - **W0001-W0099**: warnings
pub mod codes {
    /// A symbol failed a handler's structural rule.
    pub const INVALID_SYMBOL: &str = "E0001";
    /// A component interface has multiple eligible implementations.
    pub const AMBIGUOUS_COMPOSITION: &str = "E0002";
    /// A handler crashed while validating a symbol.
    pub const INTERNAL_CRASH: &str = "E0003";

    /// Non-blocking handler warning.
    pub const VALIDATION_WARNING: &str = "W0001";
    /// A projected parameter never got its virtual method.
    pub const UNRESOLVED_PARAMETER: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during the validation pass.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a handler validation error.
    pub fn validation_error(
        &mut self,
        store: &SymbolStore,
        symbol: SymbolId,
        marker: &str,
        message: &str,
    ) {
        self.add(
            Diagnostic::error(store, symbol, message)
                .with_code(codes::INVALID_SYMBOL)
                .with_marker(marker.to_string()),
        );
    }

    /// Add a non-blocking handler warning.
    pub fn validation_warning(
        &mut self,
        store: &SymbolStore,
        symbol: SymbolId,
        marker: &str,
        message: &str,
    ) {
        self.add(
            Diagnostic::warning(store, symbol, message)
                .with_code(codes::VALIDATION_WARNING)
                .with_marker(marker.to_string()),
        );
    }

    /// Add an ambiguous composition error.
    pub fn ambiguous_composition(
        &mut self,
        store: &SymbolStore,
        symbol: SymbolId,
        interface: &str,
        candidates: &[Arc<str>],
    ) {
        self.add(
            Diagnostic::error(
                store,
                symbol,
                format!(
                    "cannot decide between multiple implementations of '{}': {}",
                    interface,
                    candidates.join(", ")
                ),
            )
            .with_code(codes::AMBIGUOUS_COMPOSITION),
        );
    }

    /// Add an internal crash diagnostic for an uncaught handler failure.
    pub fn internal_crash(
        &mut self,
        store: &SymbolStore,
        symbol: SymbolId,
        marker: &str,
        issues_url: &str,
        detail: &str,
    ) {
        self.add(
            Diagnostic::error(
                store,
                symbol,
                format!(
                    "internal crash while validating symbol with marker '{}': {}. Please report this in {}",
                    marker, detail, issues_url
                ),
            )
            .with_code(codes::INTERNAL_CRASH)
            .with_marker(marker.to_string()),
        );
    }

    /// Add a warning for a projected parameter left without a virtual method.
    pub fn unresolved_parameter(&mut self, store: &SymbolStore, parameter: SymbolId) {
        self.add(
            Diagnostic::warning(
                store,
                parameter,
                "projected parameter was never linked to a virtual method",
            )
            .with_code(codes::UNRESOLVED_PARAMETER),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics attached to a specific symbol.
    pub fn diagnostics_for_symbol(&self, symbol: SymbolId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.symbol == symbol)
            .collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}
