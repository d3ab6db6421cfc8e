// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod model;
pub mod observability;
pub mod purity;

// Re-export commonly used types
pub use crate::core::{Error, Result};

pub use crate::model::{FunctionId, Operation, OperationKind, Program, ProgramBuilder, SemanticModel};

pub use crate::purity::{
    AnalysisSession, Cancelled, CancellationToken, KnownSignatures, PurityResolver, Verdict,
};

pub use crate::config::PurityConfig;

pub use crate::diagnostics::{check_enforced, check_function, PurityDiagnostic};
