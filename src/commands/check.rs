use crate::cli::{OutputFormat, Selection};
use crate::config::{self, PurityConfig};
use crate::diagnostics::{self, ColorMode, PurityDiagnostic};
use crate::model::{FunctionId, Program, SemanticModel};
use crate::observability::{set_model_file, set_phase, AnalysisPhase};
use crate::purity::{AnalysisSession, SessionStats};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub struct CheckConfig {
    pub model: PathBuf,
    pub config: Option<PathBuf>,
    pub selection: Selection,
    pub format: OutputFormat,
    pub no_parallel: bool,
    pub color: ColorMode,
}

/// Outcome of one check run
pub struct CheckReport {
    pub diagnostics: Vec<PurityDiagnostic>,
    pub stats: SessionStats,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn run_check(check: &CheckConfig) -> Result<CheckReport> {
    let purity_config = load_purity_config(check)?;

    let program = {
        let _phase = set_phase(AnalysisPhase::ModelLoading);
        Program::load(&check.model)?
    };
    let _model = set_model_file(&check.model);
    {
        let _phase = set_phase(AnalysisPhase::Validation);
        program.validate()?;
    }

    let mut session = AnalysisSession::from_config(&purity_config);
    if check.no_parallel {
        let mut limits = session.limits();
        limits.parallel = false;
        session = session.with_limits(limits);
    }

    let diagnostics = match &check.selection {
        Selection::Enforced => diagnostics::check_enforced(&session, &program)?,
        Selection::All => {
            diagnostics::check_functions(&session, &program, &program.function_ids())?
        }
        Selection::Named(names) => {
            let functions = resolve_names(&program, names)?;
            diagnostics::check_functions(&session, &program, &functions)?
        }
    };

    Ok(CheckReport {
        diagnostics,
        stats: session.stats(),
    })
}

pub fn render_report(report: &CheckReport, format: OutputFormat, color: ColorMode) -> Result<String> {
    let _phase = set_phase(AnalysisPhase::Reporting);
    match format {
        OutputFormat::Terminal => Ok(diagnostics::render_terminal(
            &report.diagnostics,
            &report.stats,
            color,
        )),
        OutputFormat::Json => diagnostics::render_json(&report.diagnostics, &report.stats)
            .context("Failed to serialize diagnostics"),
    }
}

fn load_purity_config(check: &CheckConfig) -> Result<PurityConfig> {
    let _phase = set_phase(AnalysisPhase::ConfigLoading);
    match &check.config {
        Some(path) => Ok(config::load_config_from(path)?),
        None => Ok(config::load_config()),
    }
}

fn resolve_names(program: &Program, names: &[String]) -> Result<Vec<FunctionId>> {
    let mut functions = Vec::with_capacity(names.len());
    for name in names {
        match program.find_function(name) {
            Some(id) => functions.push(id),
            None => bail!("No function named '{}' in the program model", name),
        }
    }
    Ok(functions)
}
