//! Readers for the upstream collector's artifacts.

use std::path::Path;

use tablec_core::StatisticsSample;

use crate::error::{Result, TablecError};
use crate::util::read_string;

/// Load a `statistics.json` array, preserving record order.
pub fn load_statistics(path: &Path) -> Result<Vec<StatisticsSample>> {
    let content = read_string(path)?;
    let samples = serde_json::from_str::<Vec<StatisticsSample>>(&content)?;
    tracing::debug!(
        target: "tablec.input",
        path = %path.display(),
        samples = samples.len(),
        "statistics loaded"
    );
    Ok(samples)
}

/// Parse `truth,predicted` lines. Blank lines are skipped.
pub fn parse_trials(content: &str, origin: &Path) -> Result<Vec<(usize, usize)>> {
    let mut pairs = Vec::new();
    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || TablecError::MalformedTrial {
            path: origin.to_path_buf(),
            line: index + 1,
            content: raw_line.to_string(),
        };
        let (truth, predicted) = line.split_once(',').ok_or_else(malformed)?;
        let truth = truth.trim().parse::<usize>().map_err(|_| malformed())?;
        let predicted = predicted.trim().parse::<usize>().map_err(|_| malformed())?;
        pairs.push((truth, predicted));
    }
    Ok(pairs)
}

pub fn load_trials(path: &Path) -> Result<Vec<(usize, usize)>> {
    let content = read_string(path)?;
    parse_trials(&content, path)
}
