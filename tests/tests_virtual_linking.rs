//! Virtual Symbol Linking
//!
//! Projection of component members into their consumers: one virtual symbol
//! per composition site, leaf-subclass projection roots, and the deferred
//! parameter/method linking queue.

mod helpers;

use std::sync::Arc;

use weft::{
    AdiRegistry, CompositionSites, MarkerElements, SymbolId, SymbolStore, VirtualSynthesizer,
    names,
};

use helpers::{paths_of, widget_composed_by_two, widget_composed_twice_by_one};

fn component_markers() -> Vec<Arc<str>> {
    vec![Arc::from(names::COMPONENT), Arc::from(names::MODEL)]
}

// ============================================================================
// Projection fan-out
// ============================================================================

#[test]
fn test_one_virtual_per_composition_site() {
    let mut world = widget_composed_by_two();
    let store = &mut world.cx.store;
    let sites = CompositionSites::build(store, &world.elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let projected = synth.project(store, &mut adi, &world.elements, &sites, world.count);

    assert_eq!(projected.len(), 2);
    let enclosings: Vec<_> = projected
        .iter()
        .filter_map(|&v| store.enclosing(v))
        .collect();
    assert!(enclosings.contains(&world.container_a));
    assert!(enclosings.contains(&world.container_b));

    for &v in &projected {
        let reference = store.reference(v).expect("projection carries a reference");
        let expected = if store.enclosing(v) == Some(world.container_a) {
            world.site_a
        } else {
            world.site_b
        };
        assert_eq!(reference, expected);
    }

    assert_eq!(
        paths_of(store, projected.iter().copied()),
        vec!["com.example.A:count", "com.example.B:count"]
    );
}

#[test]
fn test_two_sites_in_one_container_are_never_deduplicated() {
    let mut world = widget_composed_twice_by_one();
    let store = &mut world.cx.store;
    let sites = CompositionSites::build(store, &world.elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let projected = synth.project(store, &mut adi, &world.elements, &sites, world.count);

    assert_eq!(projected.len(), 2);
    let references: Vec<_> = projected
        .iter()
        .map(|&v| store.reference(v).unwrap())
        .collect();
    assert!(references.contains(&world.first_site));
    assert!(references.contains(&world.second_site));
    for &v in &projected {
        assert_eq!(store.enclosing(v), Some(world.container));
    }
}

#[test]
fn test_projection_registers_virtual_children() {
    let mut world = widget_composed_by_two();
    let store = &mut world.cx.store;
    let sites = CompositionSites::build(store, &world.elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let projected = synth.project(store, &mut adi, &world.elements, &sites, world.count);

    let children_a = synth.virtual_children_of(world.container_a);
    assert_eq!(children_a.len(), 1);
    assert!(projected.contains(&children_a[0]));
    assert_eq!(synth.virtual_children_of(world.container_b).len(), 1);
    assert!(synth.virtual_children_of(world.widget).is_empty());
}

// ============================================================================
// Leaf-subclass projection roots
// ============================================================================

/// Base component with two leaf subclasses: projections are rooted at the
/// leaves' composition sites only, never the base type's own.
#[test]
fn test_leaf_subclass_exclusivity() {
    let mut store = SymbolStore::new();
    let base = store.add_type("com.example.BaseWidget");
    let count = store.add_field(base, "count", "int");
    let left = store.add_type("com.example.LeftWidget");
    let right = store.add_type("com.example.RightWidget");

    let consumer = store.add_type("com.example.App");
    let base_site = store.add_field(consumer, "base", "com.example.BaseWidget");
    let left_site = store.add_field(consumer, "left", "com.example.LeftWidget");
    let right_site = store.add_field(consumer, "right", "com.example.RightWidget");

    let mut elements = MarkerElements::new();
    for site in [base_site, left_site, right_site] {
        elements.add_root_symbol(names::COMPONENT, site);
    }
    elements.put_ancestor_symbol(names::COMPONENT, base, left);
    elements.put_ancestor_symbol(names::COMPONENT, base, right);

    let sites = CompositionSites::build(&store, &elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let projected = synth.project(&mut store, &mut adi, &elements, &sites, count);

    assert_eq!(projected.len(), 2);
    let references: Vec<_> = projected
        .iter()
        .map(|&v| store.reference(v).unwrap())
        .collect();
    assert!(references.contains(&left_site));
    assert!(references.contains(&right_site));
    assert!(!references.contains(&base_site));
}

/// A subclass that is itself a base type with further subclasses is skipped;
/// only true leaves become projection roots.
#[test]
fn test_intermediate_ancestor_is_not_a_projection_root() {
    let mut store = SymbolStore::new();
    let base = store.add_type("com.example.BaseWidget");
    let count = store.add_field(base, "count", "int");
    let middle = store.add_type("com.example.MiddleWidget");
    let leaf = store.add_type("com.example.LeafWidget");

    let consumer = store.add_type("com.example.App");
    let middle_site = store.add_field(consumer, "middle", "com.example.MiddleWidget");
    let leaf_site = store.add_field(consumer, "leaf", "com.example.LeafWidget");

    let mut elements = MarkerElements::new();
    elements.add_root_symbol(names::COMPONENT, middle_site);
    elements.add_root_symbol(names::COMPONENT, leaf_site);
    elements.put_ancestor_symbol(names::COMPONENT, base, middle);
    elements.put_ancestor_symbol(names::COMPONENT, base, leaf);
    elements.put_ancestor_symbol(names::COMPONENT, middle, leaf);

    let sites = CompositionSites::build(&store, &elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let projected = synth.project(&mut store, &mut adi, &elements, &sites, count);

    assert_eq!(projected.len(), 1);
    let only = *projected.iter().next().unwrap();
    assert_eq!(store.reference(only), Some(leaf_site));
}

// ============================================================================
// Deferred parameter linking
// ============================================================================

fn method_world() -> (SymbolStore, MarkerElements, SymbolId, SymbolId) {
    let mut store = SymbolStore::new();
    let widget = store.add_type("com.example.Widget");
    let run = store.add_method(widget, "run");
    let delay = store.add_parameter(run, "delay", "long");

    let consumer = store.add_type("com.example.App");
    let site = store.add_field(consumer, "widget", "com.example.Widget");

    let mut elements = MarkerElements::new();
    elements.add_root_symbol(names::COMPONENT, site);
    (store, elements, run, delay)
}

#[test]
fn test_parameter_projected_before_method_gets_temporal_parent() {
    let (mut store, elements, _run, delay) = method_world();
    let sites = CompositionSites::build(&store, &elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let projected = synth.project(&mut store, &mut adi, &elements, &sites, delay);
    assert_eq!(projected.len(), 1);
    let virtual_param = *projected.iter().next().unwrap();

    assert_eq!(synth.pending_parameters(), &[virtual_param]);

    let placeholder = store.enclosing(virtual_param).expect("never a hole");
    assert!(store.is_temporal(placeholder));
    assert!(store.reference(placeholder).is_some());
    // Temporal placeholders are never indexed as virtual children.
    let consumer = store.enclosing(placeholder).unwrap();
    assert!(synth.virtual_children_of(consumer).is_empty());
}

#[test]
fn test_method_projection_relinks_pending_parameters() {
    let (mut store, elements, run, delay) = method_world();
    let sites = CompositionSites::build(&store, &elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let params = synth.project(&mut store, &mut adi, &elements, &sites, delay);
    let virtual_param = *params.iter().next().unwrap();

    let methods = synth.project(&mut store, &mut adi, &elements, &sites, run);
    assert_eq!(methods.len(), 1);
    let virtual_method = *methods.iter().next().unwrap();

    assert!(synth.pending_parameters().is_empty());
    assert_eq!(store.enclosing(virtual_param), Some(virtual_method));
    assert!(!store.is_temporal(virtual_method));
}

#[test]
fn test_parameter_projected_after_method_links_directly() {
    let (mut store, elements, run, delay) = method_world();
    let sites = CompositionSites::build(&store, &elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let methods = synth.project(&mut store, &mut adi, &elements, &sites, run);
    let virtual_method = *methods.iter().next().unwrap();

    let params = synth.project(&mut store, &mut adi, &elements, &sites, delay);
    let virtual_param = *params.iter().next().unwrap();

    assert!(synth.pending_parameters().is_empty());
    assert_eq!(store.enclosing(virtual_param), Some(virtual_method));
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_reprojection_returns_identical_symbols_within_round() {
    let mut world = widget_composed_by_two();
    let store = &mut world.cx.store;
    let sites = CompositionSites::build(store, &world.elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let first = synth.project(store, &mut adi, &world.elements, &sites, world.count);
    let arena_len = store.len();
    let second = synth.project(store, &mut adi, &world.elements, &sites, world.count);

    assert_eq!(first, second);
    assert_eq!(store.len(), arena_len, "no new symbols on re-projection");
}

#[test]
fn test_new_round_projects_fresh_symbols() {
    let mut world = widget_composed_by_two();
    let store = &mut world.cx.store;
    let sites = CompositionSites::build(store, &world.elements, &component_markers());
    let mut synth = VirtualSynthesizer::new();
    let mut adi = AdiRegistry::new();

    let first = synth.project(store, &mut adi, &world.elements, &sites, world.count);
    synth.begin_round();
    let second = synth.project(store, &mut adi, &world.elements, &sites, world.count);

    assert!(first.is_disjoint(&second));
    assert_eq!(
        paths_of(store, first.iter().copied()),
        paths_of(store, second.iter().copied()),
        "fresh proxies project to the same locations"
    );
}
