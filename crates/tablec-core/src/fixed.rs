//! Fixed-width, delimiter-free digit fields.
//!
//! Every encoded stream in this crate is a run of fields whose widths are
//! known up front. Values that do not fit are rejected with
//! [`TableError::FieldOverflow`] instead of being truncated by the formatter.

use std::fmt::Write as _;

use crate::error::{Radix, Result, TableError};

/// A named field of `width` digits in `radix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedField {
    pub name: &'static str,
    pub width: usize,
    pub radix: Radix,
}

impl FixedField {
    #[must_use]
    pub const fn hex(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            radix: Radix::Hex,
        }
    }

    #[must_use]
    pub const fn decimal(name: &'static str, width: usize) -> Self {
        Self {
            name,
            width,
            radix: Radix::Decimal,
        }
    }

    /// Largest value representable in this field.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.radix.base().pow(self.width as u32) - 1
    }

    /// Append `value` zero-padded to exactly `width` digits.
    pub fn push(&self, out: &mut String, value: i64) -> Result<()> {
        let fits = u64::try_from(value).is_ok_and(|v| v <= self.max_value());
        if !fits {
            return Err(TableError::FieldOverflow {
                field: self.name,
                value,
                width: self.width,
                radix: self.radix,
            });
        }
        let width = self.width;
        // Writing into a String cannot fail.
        let _ = match self.radix {
            Radix::Decimal => write!(out, "{value:0width$}"),
            Radix::Hex => write!(out, "{value:0width$x}"),
        };
        Ok(())
    }

    /// Read this field from `text` at `*offset`, advancing the offset.
    pub fn read(&self, text: &str, offset: &mut usize) -> Result<u64> {
        let start = *offset;
        let end = start + self.width;
        let digits = text.get(start..end).ok_or_else(|| {
            TableError::malformed(start, format!("truncated {} field", self.name))
        })?;
        let radix = self.radix.base() as u32;
        if !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(TableError::malformed(
                start,
                format!("{} field {digits:?} is not {}", self.name, self.radix),
            ));
        }
        let value = u64::from_str_radix(digits, radix)
            .map_err(|err| TableError::malformed(start, err.to_string()))?;
        *offset = end;
        Ok(value)
    }
}
