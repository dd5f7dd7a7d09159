use std::path::PathBuf;

use clap::Args;
use tablec_core::{
    GridShape, ScoreSurface, StatisticsSample, StrategyGridBuilder, SurfaceComparison,
    compare_surfaces,
};

use crate::config::CompilerConfig;
use crate::error::Result;
use crate::input::load_statistics;
use crate::util::OutputIntegration;

#[derive(Debug, Clone, Args)]
pub struct CompareArgs {
    #[arg(long)]
    pub baseline: PathBuf,

    #[arg(long)]
    pub candidate: PathBuf,
}

/// Best-score surface of a statistics run after backward fill.
pub fn surface_from_samples(
    samples: &[StatisticsSample],
    shape: GridShape,
) -> Result<ScoreSurface> {
    let mut builder = StrategyGridBuilder::new(shape);
    builder.extend(samples)?;
    Ok(ScoreSurface::from_table(&builder.finish()?))
}

/// Mean normalized score of each run over the shared grid.
///
/// Both runs are backward-filled and must resolve every cell. A run whose
/// boundary row `max_m` is missing an `eps` fails with `UnresolvedGridCell`
/// instead of scoring that column as 0.
pub fn compare_runs(
    baseline: &[StatisticsSample],
    candidate: &[StatisticsSample],
    shape: GridShape,
) -> Result<SurfaceComparison> {
    let baseline = surface_from_samples(baseline, shape)?;
    let candidate = surface_from_samples(candidate, shape)?;
    Ok(compare_surfaces(&baseline, &candidate)?)
}

pub fn run_compare(args: CompareArgs, config: &CompilerConfig) -> Result<()> {
    let integration = OutputIntegration::detect();
    let shape = config.grid.shape()?;
    let comparison = compare_runs(
        &load_statistics(&args.baseline)?,
        &load_statistics(&args.candidate)?,
        shape,
    )?;

    if integration.should_emit_json() {
        println!("{}", serde_json::to_string(&comparison)?);
    } else {
        println!("{} -> {}", comparison.baseline, comparison.candidate);
    }
    Ok(())
}
