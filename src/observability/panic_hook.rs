//! Panic hook printing a structured crash report.
//!
//! The report says what the crashing thread was analyzing (phase, model file,
//! function), how far the run had got and where the panic happened.

use super::context::{get_current_context, get_progress, AnalysisContext};
use std::fmt::Write;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 76;

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = panic_message(info);
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
        let report = render_crash_report(
            &message,
            location.as_deref(),
            &get_current_context(),
            get_progress(),
        );
        eprintln!("{}", report);

        if std::env::var_os("RUST_BACKTRACE").is_some() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        }
    }));
}

fn render_crash_report(
    message: &str,
    location: Option<&str>,
    context: &AnalysisContext,
    (processed, total): (usize, usize),
) -> String {
    let rule = "=".repeat(WIDTH + 4);
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let mut out = String::new();

    let mut line = |label: &str, value: &str| {
        let text = format!("{}: {}", label, value);
        let _ = writeln!(out, "| {:<width$} |", truncate(&text, WIDTH), width = WIDTH);
    };

    line("purecheck crash report", VERSION);
    line("Platform", std::env::consts::OS);
    line("Time", &timestamp.to_string());
    line("Panic", message);
    if let Some(location) = location {
        line("Location", location);
    }
    match context.phase {
        Some(phase) => line("Phase", &phase.to_string()),
        None => line("Phase", "(not set, crash before analysis started)"),
    }
    if let Some(span) = tracing::Span::current().metadata() {
        line("Span", span.name());
    }
    if let Some(model) = &context.model_file {
        line("Model", &model.display().to_string());
    }
    if let Some(function) = &context.current_function {
        line("Function", function);
    }
    if total > 0 {
        line(
            "Progress",
            &format!("{} / {} functions ({}%)", processed, total, processed * 100 / total),
        );
    }
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        line("Hint", "run with RUST_BACKTRACE=1 for a stack trace");
    }

    format!("{}\n{}{}", rule, out, rule)
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Shorten to at most `max_chars` characters, marking the cut with "..."
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
