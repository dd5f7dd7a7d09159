use std::path::PathBuf;

use tablec_core::TableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TablecError>;

#[derive(Debug, Error)]
pub enum TablecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table error: {0}")]
    Table(#[from] TableError),

    #[error("malformed trial at {path}:{line}: {content:?}")]
    MalformedTrial {
        path: PathBuf,
        line: usize,
        content: String,
    },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl TablecError {
    /// Data errors exit with 2 so scripts can tell them from usage problems.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::Table(_) | Self::MalformedTrial { .. } | Self::Json(_) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
