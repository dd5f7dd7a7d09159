use std::path::{Path, PathBuf};

use clap::Args;
use tablec_core::{ConfusionMatrix, check_label_space, encode_sparse_into};

use crate::config::CompilerConfig;
use crate::error::{Result, TablecError};
use crate::input::load_trials;
use crate::util::{OutputIntegration, emit};

#[derive(Debug, Clone, Args)]
pub struct ConfusionArgs {
    /// Bit-width of the runs; selects the label-space size.
    #[arg(long)]
    pub bits: u32,

    /// Trial CSV files, encoded in the order given.
    #[arg(required = true)]
    pub trials: Vec<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Aggregate one trial file into a confusion matrix over `size` labels.
pub fn matrix_from_file(path: &Path, size: usize) -> Result<ConfusionMatrix> {
    let pairs = load_trials(path)?;
    Ok(ConfusionMatrix::from_pairs(size, pairs)?)
}

/// Concatenate the sparse encodings of every file.
///
/// The label space is checked against the encoding before any file is read.
pub fn encode_trial_files(paths: &[PathBuf], size: usize) -> Result<String> {
    if paths.is_empty() {
        return Err(TablecError::invalid("at least one trial file is required"));
    }
    check_label_space(size)?;
    let mut stream = String::new();
    for path in paths {
        let matrix = matrix_from_file(path, size)?;
        encode_sparse_into(&matrix, &mut stream)?;
    }
    Ok(stream)
}

pub fn run_confusion(args: ConfusionArgs, config: &CompilerConfig) -> Result<()> {
    let integration = OutputIntegration::detect();
    let size = config.label_spaces.size_for(args.bits)?;
    let stream = encode_trial_files(&args.trials, size)?;
    emit("confusion", &stream, args.output.as_deref(), &integration)
}
