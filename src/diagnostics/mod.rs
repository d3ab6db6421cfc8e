//! Purity diagnostics for enforce-pure functions

mod render;

pub use render::{render_json, render_terminal, ColorMode};

use crate::model::{FunctionId, Location, SemanticModel};
use crate::purity::{AnalysisSession, Cancelled, Verdict};
use serde::Serialize;
use std::path::PathBuf;

/// Diagnostic code for a function that must be pure but is not
pub const IMPURE_FUNCTION: &str = "PURE001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurityDiagnostic {
    pub code: &'static str,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// First offending operation, or the declaration when none is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub message: String,
}

impl PurityDiagnostic {
    fn impure(model: &dyn SemanticModel, function: FunctionId, verdict: Verdict) -> Self {
        let symbol = model.function(function);
        let name = symbol
            .map(|s| s.qualified_name.clone())
            .unwrap_or_else(|| function.to_string());
        Self {
            code: IMPURE_FUNCTION,
            message: format!("'{}' is not pure", name),
            function: name,
            file: symbol.and_then(|s| s.source_file.clone()),
            location: verdict
                .offending_location()
                .or_else(|| symbol.and_then(|s| s.location)),
        }
    }
}

/// Check one function regardless of markers; `None` when it is pure.
pub fn check_function(
    session: &AnalysisSession,
    model: &dyn SemanticModel,
    function: FunctionId,
) -> Result<Option<PurityDiagnostic>, Cancelled> {
    let verdict = session.resolve(model, function)?;
    Ok(verdict
        .is_impure()
        .then(|| PurityDiagnostic::impure(model, function, verdict)))
}

/// Check the given functions, in order, regardless of markers
pub fn check_functions(
    session: &AnalysisSession,
    model: &dyn SemanticModel,
    functions: &[FunctionId],
) -> Result<Vec<PurityDiagnostic>, Cancelled> {
    let mut diagnostics = Vec::new();
    for (function, result) in session.analyze_all(model, functions) {
        let verdict = result?;
        if verdict.is_impure() {
            diagnostics.push(PurityDiagnostic::impure(model, function, verdict));
        }
    }
    Ok(diagnostics)
}

/// Functions carrying the session's enforce-pure marker, in model order
pub fn enforced_functions(session: &AnalysisSession, model: &dyn SemanticModel) -> Vec<FunctionId> {
    let marker = &session.markers().enforce_pure;
    model
        .function_ids()
        .into_iter()
        .filter(|&id| model.function(id).is_some_and(|f| f.has_marker(marker)))
        .collect()
}

/// Check every function carrying the enforce-pure marker
pub fn check_enforced(
    session: &AnalysisSession,
    model: &dyn SemanticModel,
) -> Result<Vec<PurityDiagnostic>, Cancelled> {
    let functions = enforced_functions(session, model);
    log::info!(
        "Checking {} function(s) marked '{}'",
        functions.len(),
        session.markers().enforce_pure
    );
    check_functions(session, model, &functions)
}
