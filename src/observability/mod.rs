//! Crash reports, run context and log output.
//!
//! Install the panic hook and the log subscriber at startup:
//!
//! ```ignore
//! use purecheck::observability::{init_logging, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_logging(1);
//! }
//! ```
//!
//! Track what a thread is doing so a crash report can say so:
//!
//! ```ignore
//! use purecheck::observability::{set_phase, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::ModelLoading);
//! let program = Program::load(path)?;
//! ```

pub mod context;
mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_context, set_current_function,
    set_model_file, set_phase, set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use logging::{init_logging, level_for_verbosity, LOG_ENV};
pub use panic_hook::install_panic_hook;
