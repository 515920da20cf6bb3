//! Validation orchestrator.
//!
//! Drives every enabled handler, in registry order, over the root symbols of
//! its target marker. Per root symbol the orchestrator decides whether the
//! handler sees the real symbol, its virtual projections, or both, invokes
//! the handler inside a failure-isolating boundary, and collects the
//! outcome. No single bad symbol can abort the round: an uncaught failure is
//! reported as an internal-crash diagnostic attributed to the owning plugin,
//! and processing continues with the next symbol.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexSet;

use crate::adi::AdiRegistry;
use crate::diagnostics::DiagnosticCollector;
use crate::handler::{HandlerRegistry, MarkerHandler, ValidationContext};
use crate::model::{MarkerElements, MarkerName, SymbolId, SymbolKind, SymbolStore, names};
use crate::synthesis::{CompositionSites, VirtualSynthesizer};

/// The mutable processing state a validation pass runs against: symbol
/// arena, ADI registry, and the virtual symbol synthesizer. Context-owned —
/// keep it alive to accumulate state across rounds, or drop it to scope a
/// single round.
pub struct ProcessingContext {
    pub store: SymbolStore,
    pub adi: AdiRegistry,
    pub virtuals: VirtualSynthesizer,
}

impl ProcessingContext {
    pub fn new(store: SymbolStore) -> Self {
        Self {
            store,
            adi: AdiRegistry::new(),
            virtuals: VirtualSynthesizer::new(),
        }
    }

    /// Read-only view for handler invocations.
    pub fn validation_view<'a>(&'a self, elements: &'a MarkerElements) -> ValidationContext<'a> {
        ValidationContext {
            store: &self.store,
            adi: &self.adi,
            virtuals: &self.virtuals,
            elements,
        }
    }
}

/// The marker families steering export/import composition.
///
/// The gate marker excludes a marked symbol from unrelated handlers until
/// its own handler resolves it. Each projection family pairs a "combined"
/// member (its handler sees the real symbol plus the projections) with a
/// "plain" member (its handler sees projections only). The component markers
/// designate composition sites.
#[derive(Clone, Debug)]
pub struct CompositionMarkers {
    pub export: MarkerName,
    pub exported: MarkerName,
    pub export_populate: MarkerName,
    pub populate: MarkerName,
    pub export_recollect: MarkerName,
    pub recollect: MarkerName,
    pub component_markers: Vec<MarkerName>,
}

impl Default for CompositionMarkers {
    fn default() -> Self {
        Self {
            export: Arc::from(names::EXPORT),
            exported: Arc::from(names::EXPORTED),
            export_populate: Arc::from(names::EXPORT_POPULATE),
            populate: Arc::from(names::POPULATE),
            export_recollect: Arc::from(names::EXPORT_RECOLLECT),
            recollect: Arc::from(names::RECOLLECT),
            component_markers: vec![Arc::from(names::COMPONENT), Arc::from(names::MODEL)],
        }
    }
}

/// Drives the handler pipeline over an extracted symbol model.
pub struct ModelValidator<'h> {
    handlers: &'h HandlerRegistry,
    markers: CompositionMarkers,
}

impl<'h> ModelValidator<'h> {
    pub fn new(handlers: &'h HandlerRegistry) -> Self {
        Self {
            handlers,
            markers: CompositionMarkers::default(),
        }
    }

    /// Override the composition marker policy.
    pub fn with_markers(handlers: &'h HandlerRegistry, markers: CompositionMarkers) -> Self {
        Self { handlers, markers }
    }

    /// Validate every marked symbol and return the holder of validated root
    /// symbols per marker, sharing the extracted model's ancestor closure.
    /// Diagnostics accumulate into the collector; the pass itself never
    /// fails.
    pub fn validate(
        &self,
        cx: &mut ProcessingContext,
        extracted: &MarkerElements,
        diags: &mut DiagnosticCollector,
    ) -> MarkerElements {
        tracing::info!("validating marked symbols");

        cx.virtuals.begin_round();
        let mut validating = extracted.validating_holder();
        let mut sites: Option<CompositionSites> = None;

        for (handler, plugin) in self.handlers.iter() {
            if !handler.enabled() {
                continue;
            }

            let target: MarkerName = Arc::from(handler.target());
            let roots = extracted.root_symbols(&target);
            if !roots.is_empty() {
                tracing::debug!("validating {} symbols with '{}'", roots.len(), target);
            }

            let mut validated: IndexSet<SymbolId> = IndexSet::new();

            for &real in &roots {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    self.validate_root(
                        cx,
                        extracted,
                        &mut sites,
                        handler,
                        &target,
                        real,
                        &mut validated,
                        diags,
                    );
                }));

                if let Err(payload) = outcome {
                    let detail = panic_message(payload.as_ref());
                    tracing::error!(
                        "internal crash while validating {} with '{}': {}",
                        cx.store.stable_path(real),
                        target,
                        detail
                    );
                    diags.internal_crash(&cx.store, real, &target, &plugin.issues_url, &detail);
                }
            }

            validating.put_root_symbols(target, validated);
        }

        for parameter in cx.virtuals.take_unresolved_parameters() {
            tracing::warn!(
                "projected parameter never linked to a virtual method: {}",
                cx.store.stable_path(parameter)
            );
            diags.unresolved_parameter(&cx.store, parameter);
        }

        validating
    }

    /// Validate one root symbol with one handler: apply the export gate,
    /// form the working set (real symbol, projections, or both), and run the
    /// handler over it.
    #[allow(clippy::too_many_arguments)]
    fn validate_root(
        &self,
        cx: &mut ProcessingContext,
        extracted: &MarkerElements,
        sites: &mut Option<CompositionSites>,
        handler: &dyn MarkerHandler,
        target: &MarkerName,
        real: SymbolId,
        validated: &mut IndexSet<SymbolId>,
        diags: &mut DiagnosticCollector,
    ) {
        let policy = &self.markers;

        // Export-gated symbols are resolved once, by the export handler;
        // field-level composition is still seen by every handler.
        let gated = cx.adi.has(&cx.store, real, &policy.export);
        if gated
            && !cx.store.is_virtual(real)
            && *target != policy.export
            && cx.store.kind(real) != SymbolKind::Field
        {
            return;
        }

        let has_exported = cx.adi.has(&cx.store, real, &policy.exported);
        let has_export_populate = cx.adi.has(&cx.store, real, &policy.export_populate);
        let has_export_recollect = cx.adi.has(&cx.store, real, &policy.export_recollect);

        // `exported` on a type is an ADI-only construct; its handler never
        // validates type-kind roots.
        if *target == policy.exported && cx.store.kind(real) == SymbolKind::Type {
            return;
        }

        let mut working: IndexSet<SymbolId> = IndexSet::new();
        working.insert(real);

        if (has_exported || has_export_populate || has_export_recollect)
            && cx.store.kind(real) != SymbolKind::Type
        {
            let site_index: &CompositionSites = sites.get_or_insert_with(|| {
                CompositionSites::build(&cx.store, extracted, &policy.component_markers)
            });

            let projection =
                cx.virtuals
                    .project(&mut cx.store, &mut cx.adi, extracted, site_index, real);

            if has_exported {
                working = projection.clone();
            }

            if has_export_populate {
                // The plain handler sees only the projections; the combined
                // handler sees the real symbol as well.
                if *target == policy.populate {
                    working = projection.clone();
                }
                if *target == policy.export_populate {
                    working.extend(projection.iter().copied());
                }
            }

            if has_export_recollect {
                if *target == policy.recollect {
                    working = projection.clone();
                }
                if *target == policy.export_recollect {
                    working.extend(projection.iter().copied());
                }
            }
        }

        for symbol in working {
            let view = cx.validation_view(extracted);
            let result = handler.validate(symbol, &view);

            for error in result.errors() {
                diags.validation_error(
                    &cx.store,
                    error.symbol,
                    error.marker.as_deref().unwrap_or(target.as_ref()),
                    &error.message,
                );
            }
            for warning in result.warnings() {
                diags.validation_warning(
                    &cx.store,
                    warning.symbol,
                    warning.marker.as_deref().unwrap_or(target.as_ref()),
                    &warning.message,
                );
            }

            if result.is_valid() {
                validated.insert(symbol);
            } else {
                tracing::warn!(
                    "symbol {} invalidated by '{}'",
                    cx.store.stable_path(symbol),
                    target
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
