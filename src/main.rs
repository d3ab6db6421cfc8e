use anyhow::Result;
use clap::Parser;
use purecheck::cli::Cli;
use purecheck::commands::{render_report, run_check, CheckConfig};
use purecheck::diagnostics::ColorMode;
use purecheck::observability::{init_logging, install_panic_hook};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    install_panic_hook();
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    let color = if cli.plain {
        ColorMode::Never
    } else {
        ColorMode::Auto
    };
    let check = CheckConfig {
        selection: cli.selection(),
        model: cli.model,
        config: cli.config,
        format: cli.format,
        no_parallel: cli.no_parallel,
        color,
    };

    let report = run_check(&check)?;
    print!("{}", render_report(&report, check.format, check.color)?);

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
