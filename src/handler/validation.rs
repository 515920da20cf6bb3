//! Per-(handler, symbol) validation outcome.

use std::sync::Arc;

use crate::model::{MarkerName, SymbolId};

/// One error or warning produced while validating a symbol.
#[derive(Clone, Debug)]
pub struct ValidationMessage {
    /// The symbol the message is attached to.
    pub symbol: SymbolId,
    /// The marker under validation, if applicable.
    pub marker: Option<MarkerName>,
    pub message: Arc<str>,
}

/// Outcome of validating one symbol with one handler.
///
/// Starts valid; adding an error invalidates it. Warnings never invalidate.
/// An invalid symbol is excluded from that handler's validated set only —
/// other handlers still see and independently validate it.
#[derive(Clone, Debug)]
pub struct ValidationResult {
    marker: MarkerName,
    symbol: SymbolId,
    valid: bool,
    errors: Vec<ValidationMessage>,
    warnings: Vec<ValidationMessage>,
}

impl ValidationResult {
    pub fn new(marker: impl Into<MarkerName>, symbol: SymbolId) -> Self {
        Self {
            marker: marker.into(),
            symbol,
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Record an error against the validated symbol and invalidate it.
    pub fn add_error(&mut self, message: impl Into<Arc<str>>) {
        self.add_error_on(self.symbol, message);
    }

    /// Record an error against another symbol (e.g. a parameter of the
    /// validated method) and invalidate the result.
    pub fn add_error_on(&mut self, symbol: SymbolId, message: impl Into<Arc<str>>) {
        self.valid = false;
        self.errors.push(ValidationMessage {
            symbol,
            marker: Some(self.marker.clone()),
            message: message.into(),
        });
    }

    /// Record a non-blocking warning.
    pub fn add_warning(&mut self, message: impl Into<Arc<str>>) {
        self.add_warning_on(self.symbol, message);
    }

    pub fn add_warning_on(&mut self, symbol: SymbolId, message: impl Into<Arc<str>>) {
        self.warnings.push(ValidationMessage {
            symbol,
            marker: Some(self.marker.clone()),
            message: message.into(),
        });
    }

    /// Invalidate without a message.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ValidationMessage] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationMessage] {
        &self.warnings
    }
}
