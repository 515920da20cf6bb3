//! Virtual symbol synthesis — projecting component members into consumers.
//!
//! A member declared once inside a reusable component type is projected into
//! every consumer that embeds the component, without the consumer declaring
//! anything by hand. The synthesizer creates the proxy symbols, keeps the
//! "virtual children of X" index consistent, and defers parameter/method
//! linking when projections arrive out of declaration order.
//!
//! # Linking order
//!
//! A parameter can be projected before its enclosing method. The parameter
//! is queued and given a `temporal` placeholder parent (so consumers of
//! "enclosing" never see a hole); when the method is projected later, every
//! queued parameter of that method is re-pointed onto the new virtual method
//! and removed from the queue. Temporal parents are never indexed.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::adi::AdiRegistry;
use crate::error::{ModelError, ModelResult};
use crate::model::{MarkerElements, SymbolId, SymbolKind, SymbolStore};

// ============================================================================
// COMPOSITION SITES
// ============================================================================

/// Index of composition sites: for each component type name, the containers
/// embedding it and the reference symbol (the field or site declaring the
/// component) that established the composition.
///
/// Also tracks which component types implement which interfaces, so that a
/// component referenced through an interface can be resolved to its single
/// eligible implementation.
#[derive(Debug, Default)]
pub struct CompositionSites {
    by_component: FxHashMap<Arc<str>, IndexMap<SymbolId, SymbolId>>,
    implementations: FxHashMap<Arc<str>, Vec<Arc<str>>>,
}

impl CompositionSites {
    /// Scan the root symbols of the composable-component markers and record
    /// one site per marked symbol: container = the site's root type,
    /// component = the site's static type.
    pub fn build(
        store: &SymbolStore,
        elements: &MarkerElements,
        component_markers: &[Arc<str>],
    ) -> Self {
        let mut sites = CompositionSites::default();

        for marker in component_markers {
            for site in elements.root_symbols(marker) {
                let container = store.root_type_of(site);
                let component = store.type_name(site).clone();
                tracing::trace!(
                    "composition site: {} embeds {} via {}",
                    store.name(container),
                    component,
                    store.stable_path(site)
                );
                sites
                    .by_component
                    .entry(component)
                    .or_default()
                    .insert(container, site);
            }
        }

        // Interface -> implementing component types, for disambiguation.
        for id in store.ids() {
            if store.is_virtual(id) || store.kind(id) != SymbolKind::Type {
                continue;
            }
            for interface in store.implements(id) {
                sites
                    .implementations
                    .entry(interface.clone())
                    .or_default()
                    .push(store.name(id).clone());
            }
        }

        sites
    }

    /// Composition sites for a component type name: container → reference.
    pub fn sites_for(&self, component: &str) -> Option<&IndexMap<SymbolId, SymbolId>> {
        self.by_component.get(component)
    }

    /// Resolve a component referenced through an interface to its single
    /// implementing type. `Ok(None)` when the interface is not implemented
    /// by any known component; an error when several implementations are
    /// eligible and nothing disambiguates.
    pub fn resolve_component(&self, interface: &str) -> ModelResult<Option<Arc<str>>> {
        match self.implementations.get(interface) {
            None => Ok(None),
            Some(types) if types.len() == 1 => Ok(Some(types[0].clone())),
            Some(types) => Err(ModelError::AmbiguousComposition {
                interface: Arc::from(interface),
                candidates: types.clone(),
            }),
        }
    }
}

// ============================================================================
// SYNTHESIZER
// ============================================================================

/// Creates and links virtual symbols.
///
/// Owns the process-level linking state: the enclosing-symbol → virtual
/// children index (kept across rounds), and the per-round projection memo
/// and pending-parameter queue (reset by [`Self::begin_round`]).
#[derive(Default)]
pub struct VirtualSynthesizer {
    /// Enclosing symbol → virtual symbols linked under it.
    children: FxHashMap<SymbolId, Vec<SymbolId>>,
    /// Projected parameters waiting for their virtual method.
    pending_parameters: Vec<SymbolId>,
    /// Per-round projection results, keyed by the real symbol.
    projected: FxHashMap<SymbolId, IndexSet<SymbolId>>,
}

impl VirtualSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new validation round: clears the projection memo and the
    /// pending-parameter queue. The virtual-children index persists.
    pub fn begin_round(&mut self) {
        self.projected.clear();
        self.pending_parameters.clear();
    }

    /// Link a virtual symbol under its enclosing symbol. Unless the linked
    /// symbol is temporal, it is appended to the children index so later
    /// lookups of "virtual children of X" stay consistent.
    pub fn set_enclosing(&mut self, store: &mut SymbolStore, virt: SymbolId, enclosing: SymbolId) {
        if !store.is_temporal(virt) {
            self.children.entry(enclosing).or_default().push(virt);
        }
        store.set_virtual_enclosing(virt, enclosing);
    }

    /// Virtual symbols linked under an enclosing symbol. Empty when none.
    pub fn virtual_children_of(&self, enclosing: SymbolId) -> &[SymbolId] {
        self.children
            .get(&enclosing)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Parameters still waiting for their virtual method.
    pub fn pending_parameters(&self) -> &[SymbolId] {
        &self.pending_parameters
    }

    /// Drain the parameters left unlinked at the end of a round.
    pub fn take_unresolved_parameters(&mut self) -> Vec<SymbolId> {
        std::mem::take(&mut self.pending_parameters)
    }

    /// Project a real symbol into every consumer of its owning component.
    ///
    /// When the component's root type is a base type with known subclasses,
    /// projection targets each leaf subclass's composition sites instead —
    /// never both an ancestor-level and a subclass-level projection for the
    /// same physical symbol. Results are memoized per real symbol for the
    /// round; re-invocation returns the identical proxy symbols.
    pub fn project(
        &mut self,
        store: &mut SymbolStore,
        adi: &mut AdiRegistry,
        elements: &MarkerElements,
        sites: &CompositionSites,
        real: SymbolId,
    ) -> IndexSet<SymbolId> {
        if let Some(cached) = self.projected.get(&real) {
            return cached.clone();
        }

        let mut result = IndexSet::new();
        let root = store.root_type_of(real);

        if elements.is_ancestor(root) {
            for link in elements.subclasses_of(root) {
                if elements.is_ancestor(link.root_type) {
                    continue;
                }
                let component = store.type_name(link.root_type).clone();
                self.project_into(store, adi, sites, &component, real, &mut result);
            }
        } else {
            let component = store.type_name(root).clone();
            self.project_into(store, adi, sites, &component, real, &mut result);
        }

        self.projected.insert(real, result.clone());
        result
    }

    /// Create one virtual symbol per composition site of a component type.
    fn project_into(
        &mut self,
        store: &mut SymbolStore,
        adi: &mut AdiRegistry,
        sites: &CompositionSites,
        component: &str,
        real: SymbolId,
        result: &mut IndexSet<SymbolId>,
    ) {
        let Some(component_sites) = sites.sites_for(component) else {
            return;
        };
        let component_sites: Vec<(SymbolId, SymbolId)> = component_sites
            .iter()
            .map(|(&container, &reference)| (container, reference))
            .collect();

        let adi_markers = adi.markers_on_path(&store.stable_path(real));

        for (container, reference) in component_sites {
            let virt = store.new_virtual(real);

            match store.kind(real) {
                SymbolKind::Parameter => {
                    self.link_parameter(store, virt, real, container, reference);
                }
                SymbolKind::Method => {
                    self.relink_pending_parameters(store, virt, real);
                    self.set_enclosing(store, virt, container);
                }
                _ => {
                    self.set_enclosing(store, virt, container);
                }
            }

            store.set_virtual_reference(virt, reference);

            for marker in &adi_markers {
                adi.add_path(store.stable_path(virt), marker.clone());
            }

            tracing::debug!(
                "projected {} into {}",
                store.stable_path(real),
                store.name(container)
            );
            result.insert(virt);
        }
    }

    /// Link a projected parameter under its virtual method. If the method
    /// has not been projected into this container yet, queue the parameter
    /// and give it a temporal placeholder parent so downstream consumers of
    /// "enclosing" never see a hole.
    fn link_parameter(
        &mut self,
        store: &mut SymbolStore,
        virt: SymbolId,
        real: SymbolId,
        container: SymbolId,
        reference: SymbolId,
    ) {
        let real_method = store.enclosing(real);
        let virtual_parent = self
            .virtual_children_of(container)
            .iter()
            .copied()
            .find(|&child| Some(store.wrapped(child)) == real_method);

        match virtual_parent {
            Some(parent) => {
                self.set_enclosing(store, virt, parent);
            }
            None => {
                self.pending_parameters.push(virt);

                let Some(real_method) = real_method else {
                    return;
                };
                let temporal = store.new_virtual(real_method);
                store.set_temporal(temporal);
                self.set_enclosing(store, temporal, container);
                store.set_virtual_reference(temporal, reference);

                self.set_enclosing(store, virt, temporal);
            }
        }
    }

    /// Re-point every queued parameter of this real method onto its new
    /// virtual method and drop them from the queue.
    fn relink_pending_parameters(
        &mut self,
        store: &mut SymbolStore,
        virtual_method: SymbolId,
        real_method: SymbolId,
    ) {
        let mut i = 0;
        while i < self.pending_parameters.len() {
            let param = self.pending_parameters[i];
            if store.enclosing(store.wrapped(param)) == Some(real_method) {
                self.pending_parameters.remove(i);
                self.set_enclosing(store, param, virtual_method);
                continue;
            }
            i += 1;
        }
    }
}
