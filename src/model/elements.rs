//! Element holders — per-marker root symbol sets plus the ancestor closure.
//!
//! The same holder shape is used for the extracted input (supplied by the
//! host symbol table) and for the validated output (filled by the
//! orchestrator): a map from marker name to the symbols carrying it, plus a
//! closure describing which marked symbols live on ancestor types and which
//! subclasses inherit them.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use super::marker::MarkerName;
use super::symbol::SymbolId;

/// A marked symbol declared on an ancestor type, paired with the subclass
/// root type that inherits it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AncestorLink {
    /// The marked symbol (or the ancestor type itself).
    pub symbol: SymbolId,
    /// The root type of the subclass that sees the inherited symbol.
    pub root_type: SymbolId,
}

#[derive(Clone, Debug, Default)]
pub struct MarkerElements {
    roots_by_marker: IndexMap<MarkerName, IndexSet<SymbolId>>,
    ancestors_by_marker: IndexMap<MarkerName, IndexSet<AncestorLink>>,
    subclasses_by_ancestor: FxHashMap<SymbolId, IndexSet<AncestorLink>>,
}

impl MarkerElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the root symbols carrying a marker, replacing any previous
    /// set for that marker.
    pub fn put_root_symbols(&mut self, marker: impl Into<MarkerName>, symbols: IndexSet<SymbolId>) {
        self.roots_by_marker.insert(marker.into(), symbols);
    }

    /// Append a single root symbol under a marker.
    pub fn add_root_symbol(&mut self, marker: impl Into<MarkerName>, symbol: SymbolId) {
        self.roots_by_marker
            .entry(marker.into())
            .or_default()
            .insert(symbol);
    }

    /// Root symbols for a marker, in registration order. Empty when none.
    pub fn root_symbols(&self, marker: &str) -> Vec<SymbolId> {
        self.roots_by_marker
            .get(marker)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_root_symbols(&self, marker: &str) -> bool {
        self.roots_by_marker
            .get(marker)
            .is_some_and(|set| !set.is_empty())
    }

    /// Record a marked symbol that lives on an ancestor type, visible to the
    /// given subclass root type. Also indexes the subclass under the
    /// ancestor for [`Self::subclasses_of`].
    pub fn put_ancestor_symbol(
        &mut self,
        marker: impl Into<MarkerName>,
        symbol: SymbolId,
        root_type: SymbolId,
    ) {
        let link = AncestorLink { symbol, root_type };
        self.ancestors_by_marker
            .entry(marker.into())
            .or_default()
            .insert(link);
        self.subclasses_by_ancestor
            .entry(symbol)
            .or_default()
            .insert(link);
    }

    pub fn ancestor_symbols(&self, marker: &str) -> Vec<AncestorLink> {
        self.ancestors_by_marker
            .get(marker)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// True when the symbol is a base type with known subclasses.
    pub fn is_ancestor(&self, symbol: SymbolId) -> bool {
        self.subclasses_by_ancestor.contains_key(&symbol)
    }

    /// The subclass links recorded for an ancestor. Empty when none.
    pub fn subclasses_of(&self, symbol: SymbolId) -> Vec<AncestorLink> {
        self.subclasses_by_ancestor
            .get(&symbol)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All root symbols across every marker.
    pub fn all_symbols(&self) -> IndexSet<SymbolId> {
        self.roots_by_marker
            .values()
            .flat_map(|set| set.iter().copied())
            .collect()
    }

    /// Marker names with registered root symbols, in registration order.
    pub fn markers(&self) -> impl Iterator<Item = &MarkerName> {
        self.roots_by_marker.keys()
    }

    /// A fresh holder for validation output: shares this holder's ancestor
    /// closure, starts with no root symbols.
    pub fn validating_holder(&self) -> MarkerElements {
        MarkerElements {
            roots_by_marker: IndexMap::new(),
            ancestors_by_marker: self.ancestors_by_marker.clone(),
            subclasses_by_ancestor: self.subclasses_by_ancestor.clone(),
        }
    }
}
