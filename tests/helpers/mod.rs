//! Test helpers for building composed symbol models.

#![allow(dead_code)]

use weft::{MarkerElements, ProcessingContext, SymbolId, SymbolStore, names};

/// A reusable component with one field, embedded by two containers.
pub struct ComposedWorld {
    pub cx: ProcessingContext,
    pub elements: MarkerElements,
    pub widget: SymbolId,
    pub count: SymbolId,
    pub container_a: SymbolId,
    pub site_a: SymbolId,
    pub container_b: SymbolId,
    pub site_b: SymbolId,
}

/// Component `com.example.Widget` with field `count`, embedded once by
/// container `A` and once by container `B`. The embedding fields carry the
/// `component` marker in the extracted model.
pub fn widget_composed_by_two() -> ComposedWorld {
    let mut store = SymbolStore::new();
    let widget = store.add_type("com.example.Widget");
    let count = store.add_field(widget, "count", "int");

    let container_a = store.add_type("com.example.A");
    let site_a = store.add_field(container_a, "widget", "com.example.Widget");
    let container_b = store.add_type("com.example.B");
    let site_b = store.add_field(container_b, "widget", "com.example.Widget");

    let mut elements = MarkerElements::new();
    elements.add_root_symbol(names::COMPONENT, site_a);
    elements.add_root_symbol(names::COMPONENT, site_b);

    ComposedWorld {
        cx: ProcessingContext::new(store),
        elements,
        widget,
        count,
        container_a,
        site_a,
        container_b,
        site_b,
    }
}

/// Component embedded twice by the same container, through two distinct
/// fields.
pub struct DoublyComposedWorld {
    pub cx: ProcessingContext,
    pub elements: MarkerElements,
    pub widget: SymbolId,
    pub count: SymbolId,
    pub container: SymbolId,
    pub first_site: SymbolId,
    pub second_site: SymbolId,
}

pub fn widget_composed_twice_by_one() -> DoublyComposedWorld {
    let mut store = SymbolStore::new();
    let widget = store.add_type("com.example.Widget");
    let count = store.add_field(widget, "count", "int");

    let container = store.add_type("com.example.A");
    let first_site = store.add_field(container, "primary", "com.example.Widget");
    let second_site = store.add_field(container, "secondary", "com.example.Widget");

    let mut elements = MarkerElements::new();
    elements.add_root_symbol(names::COMPONENT, first_site);
    elements.add_root_symbol(names::COMPONENT, second_site);

    DoublyComposedWorld {
        cx: ProcessingContext::new(store),
        elements,
        widget,
        count,
        container,
        first_site,
        second_site,
    }
}

/// Stable paths of a set of symbols, for order-insensitive comparisons.
pub fn paths_of(store: &SymbolStore, symbols: impl IntoIterator<Item = SymbolId>) -> Vec<String> {
    let mut paths: Vec<String> = symbols
        .into_iter()
        .map(|s| store.stable_path(s).to_string())
        .collect();
    paths.sort();
    paths
}
