//! Thread-local context tracking for crash reports.
//!
//! Records which phase of a run is active, which model file is loaded and
//! which function body is being analyzed. Each rayon worker has its own
//! context; run-wide progress lives in atomic counters.
//!
//! Setters return a [`ContextGuard`] that restores the previous context when
//! dropped, so nested guards unwind in order even when the analysis returns
//! early.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FUNCTIONS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FUNCTIONS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// What the current thread was doing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    /// Program model being analyzed
    pub model_file: Option<PathBuf>,
    /// Qualified name of the function whose body is under analysis
    pub current_function: Option<String>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            model_file: None,
            current_function: None,
        }
    }
}

/// Stages of one purecheck run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    ConfigLoading,
    ModelLoading,
    /// Checking that the model's symbol references resolve
    Validation,
    PurityResolution,
    Reporting,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ConfigLoading => "config_loading",
            Self::ModelLoading => "model_loading",
            Self::Validation => "validation",
            Self::PurityResolution => "purity_resolution",
            Self::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// Restores the previous context on drop
#[must_use = "the context is restored as soon as the guard is dropped"]
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        CURRENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    }
}

fn update(change: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        change(&mut *ctx.borrow_mut());
        ContextGuard { previous }
    })
}

pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

pub fn set_model_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.model_file = Some(path))
}

pub fn set_current_function(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_function = Some(name))
}

/// Set the run-wide progress counters. Thread-safe.
pub fn set_progress(processed: usize, total: usize) {
    FUNCTIONS_PROCESSED.store(processed, Ordering::Relaxed);
    FUNCTIONS_TOTAL.store(total, Ordering::Relaxed);
}

/// Count one more top-level function as done. Thread-safe.
pub fn increment_processed() {
    FUNCTIONS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

/// Snapshot of the current thread's context
#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) top-level functions
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FUNCTIONS_PROCESSED.load(Ordering::Relaxed),
        FUNCTIONS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| *ctx.borrow_mut() = AnalysisContext::new());
}
