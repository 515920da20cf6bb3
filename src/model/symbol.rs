use std::sync::Arc;

use super::marker::{MarkerInstance, MarkerValue};

/// Unique identifier for a symbol in the arena.
/// Uses u32 for compact storage (supports ~4 billion symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new SymbolId from an index
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the index into the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a declared program element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A declared type (class or interface)
    Type,
    /// A method or constructor
    Method,
    /// A field
    Field,
    /// A method parameter
    Parameter,
}

impl SymbolKind {
    pub fn is_type(self) -> bool {
        matches!(self, SymbolKind::Type)
    }

    pub fn is_method(self) -> bool {
        matches!(self, SymbolKind::Method)
    }

    pub fn is_field(self) -> bool {
        matches!(self, SymbolKind::Field)
    }

    pub fn is_parameter(self) -> bool {
        matches!(self, SymbolKind::Parameter)
    }

    /// Get a display label for this symbol kind.
    pub fn display(self) -> &'static str {
        match self {
            SymbolKind::Type => "type",
            SymbolKind::Method => "method",
            SymbolKind::Field => "field",
            SymbolKind::Parameter => "parameter",
        }
    }
}

/// A physically declared symbol supplied by the host symbol table.
///
/// Real symbols are immutable once extracted: the validation pass reads them
/// but never rewrites kind, name, type, or declared markers.
#[derive(Clone, Debug)]
pub struct SymbolData {
    pub kind: SymbolKind,
    /// Simple name; top-level types carry their fully qualified name, the way
    /// the host toolchain renders type symbols.
    pub name: Arc<str>,
    /// The symbol's static type. For types this is the type's own name.
    pub type_name: Arc<str>,
    /// The owning symbol, if any. Top-level types have none.
    pub enclosing: Option<SymbolId>,
    /// Directly enclosed symbols, in declaration order.
    pub children: Vec<SymbolId>,
    /// Markers physically declared on this symbol.
    pub markers: Vec<MarkerInstance>,
    /// Interface names this type declares to implement (types only).
    pub implements: Vec<Arc<str>>,
    /// Compile-time constant value (fields only).
    pub constant: Option<MarkerValue>,
}

/// The wrapper shape of a virtual symbol, chosen from the wrapped symbol's
/// kind when the proxy is created. Method-shaped wrappers expose parameter
/// lists, variable-shaped wrappers expose constant values; this dispatch is
/// closed, not an open extension point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VirtualShape {
    Type,
    Method,
    Variable,
    Parameter,
}

impl VirtualShape {
    pub fn from_kind(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Type => VirtualShape::Type,
            SymbolKind::Method => VirtualShape::Method,
            SymbolKind::Field => VirtualShape::Variable,
            SymbolKind::Parameter => VirtualShape::Parameter,
        }
    }
}

/// A synthetic proxy symbol projecting a real symbol into a different
/// enclosing container.
///
/// All intrinsic properties (kind, name, type, declared markers, children)
/// delegate to `wrapped`; `enclosing` and `reference` are overridden to point
/// into the consumer that composes the wrapped symbol's owning component.
/// Only the synthesizer writes `enclosing` — once on creation, and once more
/// for parameters that were queued before their virtual method existed.
#[derive(Clone, Debug)]
pub struct VirtualSymbol {
    pub shape: VirtualShape,
    /// The real symbol this proxy stands in for.
    pub wrapped: SymbolId,
    /// The consumer-side container (or virtual method) this proxy is
    /// projected into.
    pub enclosing: Option<SymbolId>,
    /// The symbol in the consumer that established the composition, e.g. the
    /// field whose type is the reusable component.
    pub reference: Option<SymbolId>,
    /// Topmost enclosing type of `wrapped` (the component type).
    pub container: SymbolId,
    /// Short-lived placeholder parents awaiting a real virtual parent.
    /// Temporal symbols are never registered in the children index.
    pub temporal: bool,
}

/// One cell of the symbol arena.
#[derive(Clone, Debug)]
pub enum SymbolEntry {
    Real(SymbolData),
    Virtual(VirtualSymbol),
}
