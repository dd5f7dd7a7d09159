use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TableError>;

/// Grid axis named in coordinate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    M,
    Eps,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::M => f.write_str("m"),
            Self::Eps => f.write_str("eps"),
        }
    }
}

/// Digit alphabet of a fixed-width field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
}

impl Radix {
    #[must_use]
    pub const fn base(self) -> u64 {
        match self {
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => f.write_str("decimal"),
            Self::Hex => f.write_str("hex"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("label out of range: truth={truth} predicted={predicted} (label space {size})")]
    OutOfRangeLabel {
        truth: usize,
        predicted: usize,
        size: usize,
    },

    #[error("grid coordinate out of range: {axis}={value} (allowed {min}..={max})")]
    OutOfRangeGridCoordinate {
        axis: Axis,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("unresolved grid cell at m={m}, eps={eps}")]
    UnresolvedGridCell { m: u32, eps: u32 },

    #[error("field overflow: {field}={value} does not fit in {width} {radix} digit(s)")]
    FieldOverflow {
        field: &'static str,
        value: i64,
        width: usize,
        radix: Radix,
    },

    #[error("invalid shape: {message}")]
    InvalidShape { message: String },

    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("row 0 has no observations; cannot normalize")]
    EmptyReferenceRow,

    #[error("missing {field} at m={m}, eps={eps}")]
    MissingField { field: &'static str, m: u32, eps: u32 },

    #[error("table mixes cells with and without score_coef")]
    MixedSchema,

    #[error("no label space configured for bits={bits}")]
    UnknownBits { bits: u32 },

    #[error("malformed encoding at offset {offset}: {message}")]
    MalformedEncoding { offset: usize, message: String },
}

impl TableError {
    #[must_use]
    pub fn shape(message: impl Into<String>) -> Self {
        Self::InvalidShape {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedEncoding {
            offset,
            message: message.into(),
        }
    }
}
