//! Marker values, schemas, and instances.
//!
//! A marker is a declarative tag attached to a symbol. Parameterized markers
//! carry values; a [`MarkerSchema`] declares the parameters and their
//! defaults so that instances granted retroactively (via the ADI registry)
//! can be synthesized with the same surface as physically declared ones.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

/// Interned marker name.
pub type MarkerName = Arc<str>;

/// Canonical marker names understood by the composition policy.
pub mod names {
    /// Gates a symbol out of unrelated handlers until its own handler runs.
    pub const EXPORT: &str = "export";
    /// Projects a member into every consumer; the plain handler sees only
    /// the virtual projections.
    pub const EXPORTED: &str = "exported";
    /// Combined populate family member: real symbol plus projections.
    pub const EXPORT_POPULATE: &str = "exportPopulate";
    /// Plain populate family member: projections only.
    pub const POPULATE: &str = "populate";
    /// Combined recollect family member: real symbol plus projections.
    pub const EXPORT_RECOLLECT: &str = "exportRecollect";
    /// Plain recollect family member: projections only.
    pub const RECOLLECT: &str = "recollect";
    /// Marks a composition site embedding a reusable component.
    pub const COMPONENT: &str = "component";
    /// Marks a composition site embedding a model component.
    pub const MODEL: &str = "model";
}

/// A marker parameter value.
///
/// `Empty` is the structurally-empty value returned when a parameter has no
/// explicit value and no declared default; callers must tolerate it rather
/// than fail.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MarkerValue {
    Bool(bool),
    Int(i64),
    Str(Arc<str>),
    /// A reference to a declared type, by qualified name.
    TypeName(Arc<str>),
    List(Vec<MarkerValue>),
    Empty,
}

impl MarkerValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, MarkerValue::Empty)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MarkerValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MarkerValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MarkerValue::Str(s) | MarkerValue::TypeName(s) => Some(s),
            _ => None,
        }
    }
}

/// Declared shape of a parameterized marker: parameter names in declaration
/// order, each with an optional default value.
#[derive(Clone, Debug)]
pub struct MarkerSchema {
    name: MarkerName,
    params: IndexMap<Arc<str>, Option<MarkerValue>>,
}

impl MarkerSchema {
    pub fn new(name: impl Into<MarkerName>) -> Self {
        Self {
            name: name.into(),
            params: IndexMap::new(),
        }
    }

    /// Declare a parameter with a default value.
    pub fn with_param(mut self, param: impl Into<Arc<str>>, default: MarkerValue) -> Self {
        self.params.insert(param.into(), Some(default));
        self
    }

    /// Declare a parameter without a default. Synthesized instances resolve
    /// it to [`MarkerValue::Empty`].
    pub fn with_required_param(mut self, param: impl Into<Arc<str>>) -> Self {
        self.params.insert(param.into(), None);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default of a parameter, if any.
    pub fn default_of(&self, param: &str) -> Option<&MarkerValue> {
        self.params.get(param).and_then(|d| d.as_ref())
    }

    pub fn params(&self) -> impl Iterator<Item = (&Arc<str>, Option<&MarkerValue>)> {
        self.params.iter().map(|(name, d)| (name, d.as_ref()))
    }

    /// Synthesize a default-valued instance: every parameter resolves to its
    /// declared default; parameters without one are left unset and read back
    /// as [`MarkerValue::Empty`].
    pub fn synthesize(&self) -> MarkerInstance {
        let mut instance = MarkerInstance::new(self.name.clone());
        for (param, default) in &self.params {
            if let Some(value) = default {
                instance.values.insert(param.clone(), value.clone());
            }
        }
        instance
    }
}

/// A concrete marker occurrence: the marker name plus its explicit parameter
/// values. Physically declared instances carry only the values written in
/// source; synthesized instances carry the schema defaults.
#[derive(Clone, Debug)]
pub struct MarkerInstance {
    name: MarkerName,
    values: IndexMap<Arc<str>, MarkerValue>,
}

impl MarkerInstance {
    pub fn new(name: impl Into<MarkerName>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, param: impl Into<Arc<str>>, value: MarkerValue) -> Self {
        self.values.insert(param.into(), value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value of a parameter, or [`MarkerValue::Empty`] when unset.
    pub fn value(&self, param: &str) -> &MarkerValue {
        self.values.get(param).unwrap_or(&MarkerValue::Empty)
    }

    /// Only explicitly set values, in declaration order.
    pub fn explicit_values(&self) -> impl Iterator<Item = (&Arc<str>, &MarkerValue)> {
        self.values.iter()
    }
}

// Identity is (name, explicit values) so that synthesized defaults of the
// same marker kind compare equal and set semantics hold.
impl PartialEq for MarkerInstance {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values
    }
}

impl Eq for MarkerInstance {}

impl Hash for MarkerInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.values.len().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_instance_resolves_defaults() {
        let schema = MarkerSchema::new("cached")
            .with_param("capacity", MarkerValue::Int(16))
            .with_required_param("key");

        let instance = schema.synthesize();
        assert_eq!(instance.value("capacity"), &MarkerValue::Int(16));
        assert_eq!(instance.value("key"), &MarkerValue::Empty);
    }

    #[test]
    fn test_unknown_param_reads_empty() {
        let instance = MarkerInstance::new("exported");
        assert!(instance.value("anything").is_empty());
    }

    #[test]
    fn test_synthesized_instances_compare_equal() {
        let schema = MarkerSchema::new("cached").with_param("capacity", MarkerValue::Int(16));
        assert_eq!(schema.synthesize(), schema.synthesize());
    }

    #[test]
    fn test_explicit_value_distinguishes_instances() {
        let base = MarkerInstance::new("cached");
        let tuned = MarkerInstance::new("cached").with_value("capacity", MarkerValue::Int(64));
        assert_ne!(base, tuned);
    }
}
