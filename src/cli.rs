use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "purecheck")]
#[command(about = "Interprocedural purity analyzer for semantic program models", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Program model (JSON) produced by a frontend
    pub model: PathBuf,

    /// Configuration file (defaults to the nearest .purecheck.toml)
    #[arg(short, long, env = "PURECHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Check these functions (qualified or simple name) instead of the marked ones
    #[arg(long = "function", value_name = "NAME")]
    pub functions: Vec<String>,

    /// Check every function in the model
    #[arg(long, conflicts_with = "functions")]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Analyze functions one at a time
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Disable colored output
    #[arg(long)]
    pub plain: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbosity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// Which functions a run should check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Functions carrying the enforce-pure marker
    Enforced,
    All,
    Named(Vec<String>),
}

impl Cli {
    pub fn selection(&self) -> Selection {
        if self.all {
            Selection::All
        } else if !self.functions.is_empty() {
            Selection::Named(self.functions.clone())
        } else {
            Selection::Enforced
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_check_enforced_functions() {
        let cli = Cli::try_parse_from(["purecheck", "model.json"]).unwrap();
        assert_eq!(cli.selection(), Selection::Enforced);
        assert_eq!(cli.format, OutputFormat::Terminal);
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn test_named_functions_and_verbosity() {
        let cli = Cli::try_parse_from([
            "purecheck",
            "model.json",
            "--function",
            "App.Add",
            "--function",
            "Twice",
            "-vv",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(
            cli.selection(),
            Selection::Named(vec!["App.Add".to_string(), "Twice".to_string()])
        );
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_all_conflicts_with_function() {
        assert!(Cli::try_parse_from(["purecheck", "m.json", "--all", "--function", "f"]).is_err());
    }
}
