use std::fs;
use std::path::Path;

use clap::ValueEnum;
use fastapi_output::RichOutput;
use serde::Serialize;
use sha2::{Digest, Sha256};
use sqlmodel_console::OutputMode as SqlModelOutputMode;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, TablecError};

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "TABLEC_LOG";

#[derive(Debug, Clone, Serialize)]
pub struct OutputIntegration {
    pub fastapi_mode: String,
    pub fastapi_agent: bool,
    pub fastapi_ci: bool,
    pub fastapi_tty: bool,
    pub sqlmodel_mode: String,
    pub sqlmodel_agent: bool,
}

impl OutputIntegration {
    #[must_use]
    pub fn detect() -> Self {
        let fastapi_detection = fastapi_output::detect_environment();
        let fastapi_mode = fastapi_output::OutputMode::auto();
        let sqlmodel_mode = SqlModelOutputMode::detect();
        Self {
            fastapi_mode: fastapi_mode.as_str().to_string(),
            fastapi_agent: fastapi_detection.is_agent,
            fastapi_ci: fastapi_detection.is_ci,
            fastapi_tty: fastapi_detection.is_tty,
            sqlmodel_mode: sqlmodel_mode.as_str().to_string(),
            sqlmodel_agent: SqlModelOutputMode::is_agent_environment(),
        }
    }

    #[must_use]
    pub fn should_emit_json(&self) -> bool {
        self.sqlmodel_mode == "json"
    }
}

#[derive(Debug, Clone)]
pub struct CliOutput {
    inner: RichOutput,
    enabled: bool,
}

impl CliOutput {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            inner: RichOutput::auto(),
            enabled,
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled {
            self.inner.info(message);
        }
    }

    pub fn success(&self, message: &str) {
        if self.enabled {
            self.inner.success(message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.enabled {
            self.inner.warning(message);
        }
    }
}

#[must_use]
pub fn output_for(integration: &OutputIntegration) -> CliOutput {
    CliOutput::new(!integration.should_emit_json())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the stderr tracing subscriber. Safe to call more than once.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(TablecError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

pub fn read_string(path: &Path) -> Result<String> {
    ensure_exists(path)?;
    Ok(fs::read_to_string(path)?)
}

pub fn write_string(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[must_use]
pub fn sha256_hex(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Summary of an emitted artifact, reported instead of the content itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub command: &'static str,
    pub path: String,
    pub len: usize,
    pub sha256: String,
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn emit(
    command: &'static str,
    content: &str,
    output: Option<&Path>,
    integration: &OutputIntegration,
) -> Result<()> {
    let Some(path) = output else {
        println!("{content}");
        return Ok(());
    };

    write_string(path, content)?;
    let summary = ArtifactSummary {
        command,
        path: path.display().to_string(),
        len: content.len(),
        sha256: sha256_hex(content),
    };
    if integration.should_emit_json() {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        output_for(integration).success(&format!(
            "{command}: wrote {} bytes to {} (sha256 {})",
            summary.len, summary.path, summary.sha256
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{ensure_exists, read_string, sha256_hex, write_string};
    use crate::error::TablecError;

    #[test]
    fn sha256_matches_known_digest() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn write_creates_parent_directories() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("table.txt");
        write_string(&path, "502601").expect("write");
        assert_eq!(read_string(&path).expect("read"), "502601");
    }

    #[test]
    fn missing_path_is_reported() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("absent.json");
        assert!(matches!(
            ensure_exists(&missing),
            Err(TablecError::MissingPath { path }) if path == missing
        ));
    }
}
