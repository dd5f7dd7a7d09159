use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::accuracy::{AccuracyArgs, run_accuracy};
use crate::compare::{CompareArgs, run_compare};
use crate::config::CompilerConfig;
use crate::confusion::{ConfusionArgs, run_confusion};
use crate::error::Result;
use crate::strategy::{StrategyArgs, run_strategy};
use crate::util::{LogFormat, init_logging};

#[derive(Debug, Parser)]
#[command(
    name = "tablec",
    about = "Compile measured statistics and confusion trials into fixed-width lookup tables",
    version
)]
pub struct Cli {
    /// JSON file overriding grid bounds and the bits → label-space table.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "log-format", value_enum, global = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Select the best configuration per (m, eps), fill gaps, and encode.
    Strategy(StrategyArgs),

    /// Sparse hex encoding of confusion matrices built from trial files.
    Confusion(ConfusionArgs),

    /// Normalized per-label self-accuracy of trial files.
    Accuracy(AccuracyArgs),

    /// Compare the best-score surfaces of two statistics runs.
    Compare(CompareArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = CompilerConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Strategy(args) => run_strategy(args, &config),
        Commands::Confusion(args) => run_confusion(args, &config),
        Commands::Accuracy(args) => run_accuracy(args, &config),
        Commands::Compare(args) => run_compare(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use tablec_core::TableError;
    use tempfile::tempdir;

    use super::{Cli, Commands, run};
    use crate::confusion::ConfusionArgs;
    use crate::error::TablecError;
    use crate::strategy::{SchemaChoice, StrategyArgs};
    use crate::util::{LogFormat, write_string};

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tablec",
            "strategy",
            "--stats",
            "stats.json",
            "--schema",
            "with-score-coef",
            "--config",
            "grid.json",
            "--log-format",
            "json",
        ])
        .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("grid.json")));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Strategy(StrategyArgs { schema: SchemaChoice::WithScoreCoef, .. })
        ));
    }

    #[test]
    fn confusion_requires_trial_files() {
        assert!(Cli::try_parse_from(["tablec", "confusion", "--bits", "4"]).is_err());
    }

    #[test]
    fn strategy_command_dispatches_missing_path_error() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("statistics.json");
        let error = run(Cli {
            config: None,
            log_format: LogFormat::Text,
            command: Commands::Strategy(StrategyArgs {
                stats: missing.clone(),
                schema: SchemaChoice::Auto,
                output: None,
            }),
        })
        .expect_err("missing stats should fail");
        assert!(matches!(error, TablecError::MissingPath { path } if path == missing));
    }

    #[test]
    fn confusion_command_dispatches_unknown_bits_error() {
        let temp = tempdir().expect("tempdir");
        let trials = temp.path().join("9_00.csv");
        write_string(&trials, "0,0\n").expect("write");
        let error = run(Cli {
            config: None,
            log_format: LogFormat::Text,
            command: Commands::Confusion(ConfusionArgs {
                bits: 9,
                trials: vec![trials],
                output: None,
            }),
        })
        .expect_err("bits 9 is not configured");
        assert!(matches!(
            error,
            TablecError::Table(TableError::UnknownBits { bits: 9 })
        ));
    }

    #[test]
    fn bad_config_fails_before_dispatch() {
        let temp = tempdir().expect("tempdir");
        let config = temp.path().join("config.json");
        write_string(&config, "{not json").expect("write");
        let error = run(Cli {
            config: Some(config),
            log_format: LogFormat::Text,
            command: Commands::Confusion(ConfusionArgs {
                bits: 4,
                trials: vec![temp.path().join("unused.csv")],
                output: None,
            }),
        })
        .expect_err("bad config");
        assert!(matches!(error, TablecError::Json(_)));
    }
}
