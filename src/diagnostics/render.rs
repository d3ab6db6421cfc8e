use super::PurityDiagnostic;
use crate::purity::SessionStats;
use colored::*;
use serde::Serialize;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
        }
    }
}

/// Human-readable report, one block per diagnostic plus a summary line
pub fn render_terminal(
    diagnostics: &[PurityDiagnostic],
    stats: &SessionStats,
    color: ColorMode,
) -> String {
    colored::control::set_override(color.should_use_color());

    let mut out = String::new();
    for diagnostic in diagnostics {
        let position = match (&diagnostic.file, diagnostic.location) {
            (Some(file), Some(loc)) => format!("{}:{}", file.display(), loc),
            (Some(file), None) => file.display().to_string(),
            (None, Some(loc)) => loc.to_string(),
            (None, None) => String::new(),
        };
        out.push_str(&format!(
            "{}[{}]: {}\n",
            "error".red().bold(),
            diagnostic.code,
            diagnostic.message.bold()
        ));
        if !position.is_empty() {
            out.push_str(&format!("  {} {}\n", "-->".blue(), position));
        }
    }

    let summary = format!(
        "{} impure function(s); {} bodies analyzed, {} cache hits, {} recursion cycles",
        diagnostics.len(),
        stats.structural_analyses,
        stats.cache_hits,
        stats.cycles_detected
    );
    if diagnostics.is_empty() {
        out.push_str(&format!("{} {}\n", "ok:".green().bold(), summary));
    } else {
        out.push_str(&format!("{} {}\n", "failed:".red().bold(), summary.dimmed()));
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [PurityDiagnostic],
    stats: &'a SessionStats,
}

pub fn render_json(
    diagnostics: &[PurityDiagnostic],
    stats: &SessionStats,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { diagnostics, stats })
}
