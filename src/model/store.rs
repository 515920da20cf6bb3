//! Symbol arena — single source of truth for real and virtual symbols.
//!
//! Real symbols are appended by the host symbol table extraction; virtual
//! symbols are appended by the synthesizer during validation. Entries are
//! never removed: identity is the arena index, and stable paths give the
//! deterministic string identity used by the ADI registry.

use std::sync::Arc;

use super::marker::{MarkerInstance, MarkerValue};
use super::symbol::{SymbolData, SymbolEntry, SymbolId, SymbolKind, VirtualShape, VirtualSymbol};

/// Delimiter between stable-path segments.
const PATH_DELIMITER: char = ':';

pub struct SymbolStore {
    /// Arena storage for all symbols - single source of truth
    arena: Vec<SymbolEntry>,
}

impl SymbolStore {
    pub fn new() -> Self {
        Self { arena: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.arena.len()).map(SymbolId::new)
    }

    // ============================================================
    // Construction
    // ============================================================

    fn push(&mut self, entry: SymbolEntry) -> SymbolId {
        let id = SymbolId::new(self.arena.len());
        self.arena.push(entry);
        id
    }

    fn push_real(&mut self, data: SymbolData) -> SymbolId {
        let enclosing = data.enclosing;
        let id = self.push(SymbolEntry::Real(data));
        if let Some(parent) = enclosing {
            if let SymbolEntry::Real(parent_data) = &mut self.arena[parent.index()] {
                parent_data.children.push(id);
            }
        }
        id
    }

    /// Add a top-level type by qualified name.
    pub fn add_type(&mut self, qualified_name: impl Into<Arc<str>>) -> SymbolId {
        let name: Arc<str> = qualified_name.into();
        self.push_real(SymbolData {
            kind: SymbolKind::Type,
            type_name: name.clone(),
            name,
            enclosing: None,
            children: Vec::new(),
            markers: Vec::new(),
            implements: Vec::new(),
            constant: None,
        })
    }

    /// Add a top-level type declaring the interfaces it implements.
    pub fn add_type_implementing(
        &mut self,
        qualified_name: impl Into<Arc<str>>,
        implements: Vec<Arc<str>>,
    ) -> SymbolId {
        let id = self.add_type(qualified_name);
        if let SymbolEntry::Real(data) = &mut self.arena[id.index()] {
            data.implements = implements;
        }
        id
    }

    pub fn add_method(&mut self, enclosing: SymbolId, name: impl Into<Arc<str>>) -> SymbolId {
        self.push_real(SymbolData {
            kind: SymbolKind::Method,
            name: name.into(),
            type_name: Arc::from("void"),
            enclosing: Some(enclosing),
            children: Vec::new(),
            markers: Vec::new(),
            implements: Vec::new(),
            constant: None,
        })
    }

    pub fn add_field(
        &mut self,
        enclosing: SymbolId,
        name: impl Into<Arc<str>>,
        type_name: impl Into<Arc<str>>,
    ) -> SymbolId {
        self.push_real(SymbolData {
            kind: SymbolKind::Field,
            name: name.into(),
            type_name: type_name.into(),
            enclosing: Some(enclosing),
            children: Vec::new(),
            markers: Vec::new(),
            implements: Vec::new(),
            constant: None,
        })
    }

    pub fn add_parameter(
        &mut self,
        method: SymbolId,
        name: impl Into<Arc<str>>,
        type_name: impl Into<Arc<str>>,
    ) -> SymbolId {
        self.push_real(SymbolData {
            kind: SymbolKind::Parameter,
            name: name.into(),
            type_name: type_name.into(),
            enclosing: Some(method),
            children: Vec::new(),
            markers: Vec::new(),
            implements: Vec::new(),
            constant: None,
        })
    }

    /// Attach a physically declared marker to a real symbol.
    pub fn add_marker(&mut self, symbol: SymbolId, marker: MarkerInstance) {
        if let SymbolEntry::Real(data) = &mut self.arena[symbol.index()] {
            data.markers.push(marker);
        }
    }

    /// Record a field's compile-time constant value.
    pub fn set_constant(&mut self, field: SymbolId, value: MarkerValue) {
        if let SymbolEntry::Real(data) = &mut self.arena[field.index()] {
            data.constant = Some(value);
        }
    }

    /// Create a virtual proxy for a real symbol. The wrapper shape is chosen
    /// from the real symbol's kind; the container is the topmost enclosing
    /// type of the wrapped symbol. Enclosing and reference are linked later
    /// through the synthesizer.
    pub fn new_virtual(&mut self, symbol: SymbolId) -> SymbolId {
        let wrapped = self.wrapped(symbol);
        let container = self.root_type_of(wrapped);
        let shape = VirtualShape::from_kind(self.kind(wrapped));
        self.push(SymbolEntry::Virtual(VirtualSymbol {
            shape,
            wrapped,
            enclosing: None,
            reference: None,
            container,
            temporal: false,
        }))
    }

    // ============================================================
    // Access (virtual intrinsics delegate to the wrapped symbol)
    // ============================================================

    pub fn get(&self, id: SymbolId) -> Option<&SymbolEntry> {
        self.arena.get(id.index())
    }

    pub fn entry(&self, id: SymbolId) -> &SymbolEntry {
        &self.arena[id.index()]
    }

    fn real_data(&self, id: SymbolId) -> &SymbolData {
        match &self.arena[id.index()] {
            SymbolEntry::Real(data) => data,
            SymbolEntry::Virtual(v) => self.real_data(v.wrapped),
        }
    }

    pub fn kind(&self, id: SymbolId) -> SymbolKind {
        self.real_data(id).kind
    }

    pub fn name(&self, id: SymbolId) -> &Arc<str> {
        &self.real_data(id).name
    }

    pub fn type_name(&self, id: SymbolId) -> &Arc<str> {
        &self.real_data(id).type_name
    }

    pub fn children(&self, id: SymbolId) -> &[SymbolId] {
        &self.real_data(id).children
    }

    pub fn declared_markers(&self, id: SymbolId) -> &[MarkerInstance] {
        &self.real_data(id).markers
    }

    pub fn declared_marker(&self, id: SymbolId, marker: &str) -> Option<&MarkerInstance> {
        self.declared_markers(id).iter().find(|m| m.name() == marker)
    }

    pub fn has_declared_marker(&self, id: SymbolId, marker: &str) -> bool {
        self.declared_marker(id, marker).is_some()
    }

    pub fn implements(&self, id: SymbolId) -> &[Arc<str>] {
        &self.real_data(id).implements
    }

    /// The enclosing symbol. Virtual symbols report their overridden,
    /// consumer-side enclosing rather than the wrapped symbol's.
    pub fn enclosing(&self, id: SymbolId) -> Option<SymbolId> {
        match &self.arena[id.index()] {
            SymbolEntry::Real(data) => data.enclosing,
            SymbolEntry::Virtual(v) => v.enclosing,
        }
    }

    pub fn is_virtual(&self, id: SymbolId) -> bool {
        matches!(self.arena[id.index()], SymbolEntry::Virtual(_))
    }

    pub fn as_virtual(&self, id: SymbolId) -> Option<&VirtualSymbol> {
        match &self.arena[id.index()] {
            SymbolEntry::Virtual(v) => Some(v),
            SymbolEntry::Real(_) => None,
        }
    }

    /// The underlying real symbol: identity for real symbols, the wrapped
    /// symbol for virtual ones.
    pub fn wrapped(&self, id: SymbolId) -> SymbolId {
        match &self.arena[id.index()] {
            SymbolEntry::Real(_) => id,
            SymbolEntry::Virtual(v) => self.wrapped(v.wrapped),
        }
    }

    pub fn reference(&self, id: SymbolId) -> Option<SymbolId> {
        self.as_virtual(id).and_then(|v| v.reference)
    }

    pub fn is_temporal(&self, id: SymbolId) -> bool {
        self.as_virtual(id).is_some_and(|v| v.temporal)
    }

    pub fn shape(&self, id: SymbolId) -> Option<VirtualShape> {
        self.as_virtual(id).map(|v| v.shape)
    }

    /// Parameters of a method symbol, in declaration order. Method-shaped
    /// virtual symbols expose the wrapped method's parameters.
    pub fn parameters(&self, id: SymbolId) -> Vec<SymbolId> {
        if let Some(v) = self.as_virtual(id) {
            if v.shape != VirtualShape::Method {
                return Vec::new();
            }
        } else if self.kind(id) != SymbolKind::Method {
            return Vec::new();
        }
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.kind(c) == SymbolKind::Parameter)
            .collect()
    }

    /// Constant value of a field symbol. Variable-shaped virtual symbols
    /// expose the wrapped field's constant.
    pub fn constant_value(&self, id: SymbolId) -> Option<&MarkerValue> {
        if let Some(v) = self.as_virtual(id) {
            if v.shape != VirtualShape::Variable {
                return None;
            }
        }
        self.real_data(id).constant.as_ref()
    }

    /// Topmost enclosing type. Virtual symbols resolve through their
    /// container (the wrapped symbol's root type).
    pub fn root_type_of(&self, id: SymbolId) -> SymbolId {
        match &self.arena[id.index()] {
            SymbolEntry::Virtual(v) => v.container,
            SymbolEntry::Real(data) => match data.enclosing {
                Some(parent) => self.root_type_of(parent),
                None => id,
            },
        }
    }

    // ============================================================
    // Stable paths
    // ============================================================

    /// Deterministic string identity for a symbol: the enclosing chain from
    /// the topmost type down to the symbol, joined with `:`. Packages are
    /// excluded; top-level type segments are their qualified names. Virtual
    /// symbols walk their overridden enclosing chain, so a projected member's
    /// path is rooted at the consumer.
    pub fn stable_path(&self, id: SymbolId) -> Arc<str> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(sym) = current {
            segments.push(self.segment(sym));
            current = self.enclosing(sym);
        }
        segments.reverse();
        Arc::from(segments.join(&PATH_DELIMITER.to_string()))
    }

    /// One stable-path segment. Methods carry their parameter types so that
    /// overloads stay distinct.
    fn segment(&self, id: SymbolId) -> String {
        match self.kind(id) {
            SymbolKind::Method => {
                let params: Vec<&str> = self
                    .parameters_of_method(id)
                    .iter()
                    .map(|&p| self.type_name(p).as_ref())
                    .collect();
                format!("{}({})", self.name(id), params.join(","))
            }
            _ => self.name(id).to_string(),
        }
    }

    /// Parameter list used for path rendering; unlike [`Self::parameters`]
    /// it ignores the wrapper shape and always reads the wrapped method.
    fn parameters_of_method(&self, id: SymbolId) -> Vec<SymbolId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.kind(c) == SymbolKind::Parameter)
            .collect()
    }

    /// Human-readable location for diagnostics. Virtual symbols resolve back
    /// through `reference`/`wrapped` so the reported location is always a
    /// physically declared symbol.
    pub fn describe(&self, id: SymbolId) -> String {
        match self.as_virtual(id) {
            None => self.stable_path(id).to_string(),
            Some(v) => {
                let declared = self.stable_path(self.wrapped(id));
                match v.reference {
                    Some(reference) => format!(
                        "{} (declared in {}, composed via {})",
                        self.stable_path(id),
                        declared,
                        self.stable_path(reference)
                    ),
                    None => format!("{} (declared in {})", self.stable_path(id), declared),
                }
            }
        }
    }

    // ============================================================
    // Virtual linking (written by the synthesizer only)
    // ============================================================

    pub(crate) fn set_virtual_enclosing(&mut self, id: SymbolId, enclosing: SymbolId) {
        if let SymbolEntry::Virtual(v) = &mut self.arena[id.index()] {
            v.enclosing = Some(enclosing);
        }
    }

    pub(crate) fn set_virtual_reference(&mut self, id: SymbolId, reference: SymbolId) {
        if let SymbolEntry::Virtual(v) = &mut self.arena[id.index()] {
            v.reference = Some(reference);
        }
    }

    pub(crate) fn set_temporal(&mut self, id: SymbolId) {
        if let SymbolEntry::Virtual(v) = &mut self.arena[id.index()] {
            v.temporal = true;
        }
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}
