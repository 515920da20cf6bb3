//! Pluggable marker handlers and their ordered registry.

use std::sync::Arc;

use crate::adi::AdiRegistry;
use crate::error::{ModelError, ModelResult};
use crate::model::{MarkerElements, MarkerName, SymbolId, SymbolStore};
use crate::synthesis::VirtualSynthesizer;

use super::validation::ValidationResult;

/// Read-only view of the processing state handed to handlers.
pub struct ValidationContext<'a> {
    pub store: &'a SymbolStore,
    pub adi: &'a AdiRegistry,
    pub virtuals: &'a VirtualSynthesizer,
    pub elements: &'a MarkerElements,
}

/// A pluggable validator bound to one marker name.
///
/// Handlers are invoked in registry order; [`Self::before_target`] lets a
/// handler ask to run before another marker's handler. `process` runs
/// downstream, and only for symbols whose validation result was valid.
pub trait MarkerHandler {
    /// The marker this handler is bound to. Unique across the registry.
    fn target(&self) -> &str;

    /// Marker this handler must run before, if any.
    fn before_target(&self) -> Option<&str> {
        None
    }

    /// Markers that must already be resolved before this handler's symbols
    /// can be processed.
    fn dependencies(&self) -> Vec<MarkerName> {
        Vec::new()
    }

    /// The symbol a dependency applies to. Defaults to the symbol itself.
    fn dependent_symbol(&self, symbol: SymbolId, _dependency: &str) -> SymbolId {
        symbol
    }

    fn enabled(&self) -> bool {
        true
    }

    fn validate(&self, symbol: SymbolId, cx: &ValidationContext<'_>) -> ValidationResult;

    /// Synthesize companion output for a validated symbol. The default does
    /// nothing; generating handlers override it.
    fn process(&self, _symbol: SymbolId, _cx: &ValidationContext<'_>) {}
}

/// The plugin a handler belongs to. Internal-crash diagnostics point users
/// at the owning plugin's issue tracker.
#[derive(Clone, Debug)]
pub struct PluginInfo {
    pub name: Arc<str>,
    pub issues_url: Arc<str>,
}

impl PluginInfo {
    pub fn new(name: impl Into<Arc<str>>, issues_url: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            issues_url: issues_url.into(),
        }
    }

    /// The built-in plugin used by [`HandlerRegistry::register`].
    pub fn core() -> Self {
        Self::new("weft-core", "https://github.com/weft-codegen/weft/issues")
    }
}

struct RegisteredHandler {
    handler: Box<dyn MarkerHandler>,
    plugin: Arc<PluginInfo>,
}

/// Ordered registry of marker handlers.
///
/// Registration order is processing order, except that a handler naming a
/// `before_target` already present in the registry is inserted right before
/// it. Duplicate targets are rejected.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<RegisteredHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all handlers of a plugin, in the plugin's order.
    pub fn register_plugin(
        &mut self,
        plugin: PluginInfo,
        handlers: Vec<Box<dyn MarkerHandler>>,
    ) -> ModelResult<()> {
        let plugin = Arc::new(plugin);
        for handler in handlers {
            self.insert(handler, plugin.clone())?;
        }
        Ok(())
    }

    /// Register a single handler under the built-in core plugin.
    pub fn register(&mut self, handler: Box<dyn MarkerHandler>) -> ModelResult<()> {
        self.insert(handler, Arc::new(PluginInfo::core()))
    }

    fn insert(
        &mut self,
        handler: Box<dyn MarkerHandler>,
        plugin: Arc<PluginInfo>,
    ) -> ModelResult<()> {
        let target = handler.target();
        if self.position_of(target).is_some() {
            return Err(ModelError::DuplicateHandler {
                target: Arc::from(target),
            });
        }

        let entry = RegisteredHandler { handler, plugin };
        let before = entry
            .handler
            .before_target()
            .and_then(|before| self.position_of(before));
        match before {
            Some(index) => self.handlers.insert(index, entry),
            None => self.handlers.push(entry),
        }
        Ok(())
    }

    fn position_of(&self, target: &str) -> Option<usize> {
        self.handlers
            .iter()
            .position(|entry| entry.handler.target() == target)
    }

    pub fn get(&self, target: &str) -> Option<&dyn MarkerHandler> {
        self.position_of(target)
            .map(|index| self.handlers[index].handler.as_ref())
    }

    /// Handlers in processing order, each with its owning plugin.
    pub fn iter(&self) -> impl Iterator<Item = (&dyn MarkerHandler, &Arc<PluginInfo>)> {
        self.handlers
            .iter()
            .map(|entry| (entry.handler.as_ref(), &entry.plugin))
    }

    /// All registered marker names, in processing order.
    pub fn supported_markers(&self) -> Vec<Arc<str>> {
        self.handlers
            .iter()
            .map(|entry| Arc::from(entry.handler.target()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
