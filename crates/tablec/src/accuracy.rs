use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::Serialize;
use tablec_core::{DiagonalSummary, normalized_diagonal};

use crate::config::CompilerConfig;
use crate::confusion::matrix_from_file;
use crate::error::{Result, TablecError};
use crate::util::{OutputIntegration, emit};

#[derive(Debug, Clone, Args)]
pub struct AccuracyArgs {
    #[arg(long)]
    pub bits: u32,

    #[arg(required = true)]
    pub trials: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = AccuracyFormat::Json)]
    pub format: AccuracyFormat,

    /// Labels averaged in summaries; defaults to the configured value.
    #[arg(long)]
    pub take: Option<usize>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AccuracyFormat {
    Json,
    /// Nested `vec![..]` literal for embedding in Rust source.
    Rust,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyEntry {
    pub source: String,
    pub trials: u64,
    pub diagonal: Vec<f64>,
    pub summary: DiagonalSummary,
}

pub fn collect_accuracy(paths: &[PathBuf], size: usize, take: usize) -> Result<Vec<AccuracyEntry>> {
    if paths.is_empty() {
        return Err(TablecError::invalid("at least one trial file is required"));
    }
    paths
        .iter()
        .map(|path| {
            let matrix = matrix_from_file(path, size)?;
            let diagonal = normalized_diagonal(&matrix)?;
            Ok(AccuracyEntry {
                source: path.display().to_string(),
                trials: matrix.total(),
                summary: DiagonalSummary::compute(&diagonal, take),
                diagonal,
            })
        })
        .collect()
}

/// Render diagonals as `vec![vec![..], ..]`, one file per inner vector.
///
/// One call covers a single bit-width, so the literal has two levels (file,
/// then label). A `bits → eps → label` table is built by running once per
/// bit-width and nesting those outputs in an outer `vec![..]`.
#[must_use]
pub fn render_rust(entries: &[AccuracyEntry]) -> String {
    let mut out = String::from("vec![\n");
    for entry in entries {
        out.push_str("    vec![");
        for (i, value) in entry.diagonal.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{value:?}");
        }
        out.push_str("],\n");
    }
    out.push(']');
    out
}

pub fn run_accuracy(args: AccuracyArgs, config: &CompilerConfig) -> Result<()> {
    let integration = OutputIntegration::detect();
    let size = config.label_spaces.size_for(args.bits)?;
    let take = args.take.unwrap_or(config.accuracy.take);
    let entries = collect_accuracy(&args.trials, size, take)?;

    let rendered = match args.format {
        AccuracyFormat::Json => serde_json::to_string_pretty(&entries)?,
        AccuracyFormat::Rust => render_rust(&entries),
    };
    emit("accuracy", &rendered, args.output.as_deref(), &integration)
}
