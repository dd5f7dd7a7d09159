use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tablec_core::{
    FillReport, GridShape, RecordSchema, StatisticsSample, StrategyGridBuilder, StrategyTable,
    encode_table,
};

use crate::config::CompilerConfig;
use crate::error::Result;
use crate::input::load_statistics;
use crate::util::{OutputIntegration, emit, output_for};

#[derive(Debug, Clone, Args)]
pub struct StrategyArgs {
    /// Collector statistics (JSON array of samples).
    #[arg(long)]
    pub stats: PathBuf,

    #[arg(long, value_enum, default_value_t = SchemaChoice::Auto)]
    pub schema: SchemaChoice,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaChoice {
    Auto,
    Compact,
    WithScoreCoef,
}

#[derive(Debug, Clone)]
pub struct CompiledStrategy {
    pub table: StrategyTable,
    pub fill: FillReport,
    pub schema: RecordSchema,
    pub encoded: String,
}

/// Select, fill and encode. Samples are applied in slice order.
pub fn compile_strategy(
    samples: &[StatisticsSample],
    shape: GridShape,
    schema: SchemaChoice,
) -> Result<CompiledStrategy> {
    let mut builder = StrategyGridBuilder::new(shape);
    let replaced = builder.extend(samples)?;
    let fill = builder.backward_fill();
    let table = builder.finish()?;

    let schema = match schema {
        SchemaChoice::Auto => RecordSchema::infer(&table)?,
        SchemaChoice::Compact => RecordSchema::Compact,
        SchemaChoice::WithScoreCoef => RecordSchema::WithScoreCoef,
    };
    let encoded = encode_table(&table, schema)?;

    tracing::info!(
        target: "tablec.strategy",
        samples = samples.len(),
        replaced,
        measured = fill.measured,
        inherited = fill.inherited,
        ?schema,
        "strategy table compiled"
    );

    Ok(CompiledStrategy {
        table,
        fill,
        schema,
        encoded,
    })
}

pub fn run_strategy(args: StrategyArgs, config: &CompilerConfig) -> Result<()> {
    let integration = OutputIntegration::detect();
    let ui = output_for(&integration);

    let samples = load_statistics(&args.stats)?;
    let compiled = compile_strategy(&samples, config.grid.shape()?, args.schema)?;

    ui.info(&format!(
        "{} samples, {} measured cells, {} inherited",
        samples.len(),
        compiled.fill.measured,
        compiled.fill.inherited
    ));
    if compiled.fill.inherited > compiled.fill.measured {
        ui.warning("most cells were inherited from larger budgets");
    }

    emit(
        "strategy",
        &compiled.encoded,
        args.output.as_deref(),
        &integration,
    )
}
