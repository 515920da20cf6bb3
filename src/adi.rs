//! ADI registry — retroactively attached markers.
//!
//! ADI ("annotation by dependency injection") lets one handler grant a
//! marker to a symbol for another handler's benefit, without a physical
//! declaration. Grants are keyed by the symbol's stable path, so a virtual
//! symbol and the real symbol it wraps are distinct entries while two proxy
//! objects for the same projected location are the same one.
//!
//! A symbol "has" a marker if it is physically declared with it OR its
//! stable path is present here with that marker kind — callers go through
//! [`AdiRegistry::has`] / [`AdiRegistry::get`] instead of checking either
//! side by hand. The registry is append-only: a marker granted for a round
//! is kept for the remainder of the compilation.

use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use crate::model::{MarkerInstance, MarkerName, MarkerSchema, SymbolId, SymbolStore};

#[derive(Default)]
pub struct AdiRegistry {
    /// Marker kinds granted per stable path.
    kinds: FxHashMap<Arc<str>, IndexSet<MarkerName>>,
    /// Concrete instances granted per stable path, when the grantor supplied
    /// parameter values.
    instances: FxHashMap<Arc<str>, Vec<MarkerInstance>>,
    /// Declared marker shapes, used to synthesize default-valued instances.
    schemas: FxHashMap<MarkerName, MarkerSchema>,
}

impl AdiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a marker's parameter shape so that kind-only grants can be
    /// read back as default-valued instances.
    pub fn register_schema(&mut self, schema: MarkerSchema) {
        self.schemas.insert(Arc::from(schema.name()), schema);
    }

    pub fn schema(&self, marker: &str) -> Option<&MarkerSchema> {
        self.schemas.get(marker)
    }

    /// Grant a marker kind to a symbol's stable path.
    pub fn add(&mut self, store: &SymbolStore, symbol: SymbolId, marker: impl Into<MarkerName>) {
        self.add_path(store.stable_path(symbol), marker);
    }

    /// Grant a marker kind to a raw stable path.
    pub fn add_path(&mut self, path: Arc<str>, marker: impl Into<MarkerName>) {
        self.kinds.entry(path).or_default().insert(marker.into());
    }

    /// Grant a concrete marker instance to a symbol's stable path. Also
    /// records the kind so [`Self::has`] sees it.
    pub fn add_instance(&mut self, store: &SymbolStore, symbol: SymbolId, instance: MarkerInstance) {
        let path = store.stable_path(symbol);
        self.kinds
            .entry(path.clone())
            .or_default()
            .insert(Arc::from(instance.name()));
        self.instances.entry(path).or_default().push(instance);
    }

    /// True when the symbol is physically declared with the marker or its
    /// stable path has been granted it.
    pub fn has(&self, store: &SymbolStore, symbol: SymbolId, marker: &str) -> bool {
        if store.has_declared_marker(symbol, marker) {
            return true;
        }
        self.kinds
            .get(&store.stable_path(symbol))
            .is_some_and(|set| set.contains(marker))
    }

    /// The marker instance visible on a symbol: the physical declaration if
    /// present, else a granted instance, else a default-valued instance
    /// synthesized from the registered schema (parameters without a declared
    /// default read back as empty). `None` when the symbol does not have the
    /// marker at all.
    pub fn get(&self, store: &SymbolStore, symbol: SymbolId, marker: &str) -> Option<MarkerInstance> {
        if let Some(declared) = store.declared_marker(symbol, marker) {
            return Some(declared.clone());
        }

        let path = store.stable_path(symbol);
        let granted = self
            .kinds
            .get(&path)
            .is_some_and(|set| set.contains(marker));
        if !granted {
            return None;
        }

        if let Some(instances) = self.instances.get(&path) {
            if let Some(instance) = instances.iter().find(|i| i.name() == marker) {
                return Some(instance.clone());
            }
        }

        Some(match self.schemas.get(marker) {
            Some(schema) => schema.synthesize(),
            None => MarkerInstance::new(marker.to_string()),
        })
    }

    /// Marker kinds granted to a symbol beyond its physical declarations.
    pub fn markers_on(&self, store: &SymbolStore, symbol: SymbolId) -> Vec<MarkerName> {
        self.markers_on_path(&store.stable_path(symbol))
    }

    /// Marker kinds granted to a raw stable path.
    pub fn markers_on_path(&self, path: &str) -> Vec<MarkerName> {
        self.kinds
            .get(path)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}
