//! Analysis session: everything shared across one analysis run

use super::cache::PurityCache;
use super::context::{Cancelled, CancellationToken, Markers};
use super::resolver::PurityResolver;
use super::rules::RuleCatalog;
use super::signatures::KnownSignatures;
use super::verdict::Check;
use crate::config::PurityConfig;
use crate::model::{FunctionId, SemanticModel};
use crate::observability::{increment_processed, set_phase, set_progress, AnalysisPhase};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Bounds on a single analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    /// Longest resolution path before a callee is treated as impure
    pub max_call_depth: usize,
    /// Resolve top-level functions on the rayon pool
    pub parallel: bool,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            parallel: true,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SessionCounters {
    structural_analyses: AtomicUsize,
    cache_hits: AtomicUsize,
    cycles_detected: AtomicUsize,
    signature_hits: AtomicUsize,
}

impl SessionCounters {
    pub(crate) fn record_structural_analysis(&self) {
        self.structural_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cycle(&self) {
        self.cycles_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_signature_hit(&self) {
        self.signature_hits.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of session statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionStats {
    /// Function bodies analyzed
    pub structural_analyses: usize,
    pub cache_hits: usize,
    pub cycles_detected: usize,
    pub signature_hits: usize,
    pub cached_verdicts: usize,
}

/// Owns the verdict cache, the analysis inputs and the run statistics.
///
/// One session corresponds to one analysis run over one semantic model. It is
/// `Sync`: worker threads share it by reference and each gets its own
/// [`PurityResolver`].
#[derive(Debug)]
pub struct AnalysisSession {
    markers: Markers,
    signatures: KnownSignatures,
    catalog: RuleCatalog,
    cache: PurityCache,
    cancellation: CancellationToken,
    limits: AnalysisLimits,
    counters: SessionCounters,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    /// Session with default markers, the default signature table and the
    /// standard rule catalog
    pub fn new() -> Self {
        Self {
            markers: Markers::default(),
            signatures: KnownSignatures::with_defaults(),
            catalog: RuleCatalog::standard(),
            cache: PurityCache::new(),
            cancellation: CancellationToken::new(),
            limits: AnalysisLimits::default(),
            counters: SessionCounters::default(),
        }
    }

    pub fn from_config(config: &PurityConfig) -> Self {
        let mut signatures = KnownSignatures::with_defaults();
        signatures.extend_pure(config.signatures.pure.iter().cloned());
        signatures.extend_impure(config.signatures.impure.iter().cloned());
        signatures.extend_impure_namespaces(config.signatures.impure_namespaces.iter().cloned());

        Self::new()
            .with_markers(config.markers.clone())
            .with_signatures(signatures)
            .with_limits(AnalysisLimits {
                max_call_depth: config.analysis.max_call_depth,
                parallel: config.analysis.parallel,
            })
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_signatures(mut self, signatures: KnownSignatures) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn with_catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_limits(mut self, limits: AnalysisLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn signatures(&self) -> &KnownSignatures {
        &self.signatures
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &PurityCache {
        &self.cache
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn limits(&self) -> AnalysisLimits {
        self.limits
    }

    pub(crate) fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            structural_analyses: self.counters.structural_analyses.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            cycles_detected: self.counters.cycles_detected.load(Ordering::Relaxed),
            signature_hits: self.counters.signature_hits.load(Ordering::Relaxed),
            cached_verdicts: self.cache.len(),
        }
    }

    /// Resolver for one top-level entry on the current thread
    pub fn resolver<'a>(&'a self, model: &'a dyn SemanticModel) -> PurityResolver<'a> {
        PurityResolver::new(self, model)
    }

    pub fn resolve(&self, model: &dyn SemanticModel, function: FunctionId) -> Check {
        self.resolver(model).resolve(function)
    }

    /// Resolve every function in `functions`, in input order.
    ///
    /// Each top-level function gets its own resolver (and cycle guard); all of
    /// them share this session's cache.
    pub fn analyze_all(
        &self,
        model: &dyn SemanticModel,
        functions: &[FunctionId],
    ) -> Vec<(FunctionId, Check)> {
        let _span = tracing::debug_span!(
            "analyze_all",
            functions = functions.len(),
            parallel = self.limits.parallel
        )
        .entered();
        let _phase = set_phase(AnalysisPhase::PurityResolution);
        set_progress(0, functions.len());

        let resolve_one = |&function: &FunctionId| {
            let result = self.resolve(model, function);
            increment_processed();
            (function, result)
        };

        let results: Vec<(FunctionId, Check)> = if self.limits.parallel {
            functions.par_iter().map(resolve_one).collect()
        } else {
            functions.iter().map(resolve_one).collect()
        };

        let cancelled = results
            .iter()
            .filter(|(_, result)| matches!(result, Err(Cancelled)))
            .count();
        if cancelled > 0 {
            log::info!("{} of {} analyses were cancelled", cancelled, functions.len());
        }
        log::debug!("Session statistics: {:?}", self.stats());

        results
    }
}
