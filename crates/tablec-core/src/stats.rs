use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Bias added before truncating a scaled ratio, so that values such as
/// `0.29 * 100.0 == 28.999999999999996` land in bucket 29.
pub const BUCKET_BIAS: f64 = 0.01;

/// Opaque configuration of the scheme under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub bits: u32,
    pub redundancy: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_coef: Option<f64>,
}

impl Strategy {
    #[must_use]
    pub const fn new(bits: u32, redundancy: u32) -> Self {
        Self {
            bits,
            redundancy,
            score_coef: None,
        }
    }

    #[must_use]
    pub fn with_score_coef(mut self, score_coef: f64) -> Self {
        self.score_coef = Some(score_coef);
        self
    }
}

/// One measured configuration, as produced by the accuracy collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSample {
    pub m: u32,
    pub error_ratio: f64,
    pub expected_score: f64,
    pub bits: u32,
    pub redundancy: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_coef: Option<f64>,
}

impl StatisticsSample {
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        Strategy {
            bits: self.bits,
            redundancy: self.redundancy,
            score_coef: self.score_coef,
        }
    }

    pub fn eps(&self) -> Result<u32> {
        eps_bucket(self.error_ratio)
    }
}

/// Map an error ratio in `[0, 1]`-ish float form to its integer grid column.
pub fn eps_bucket(error_ratio: f64) -> Result<u32> {
    scaled_truncate("error_ratio", error_ratio, 100.0)
}

/// `floor(value * scale + BUCKET_BIAS)` for finite, non-negative `value`.
pub(crate) fn scaled_truncate(field: &'static str, value: f64, scale: f64) -> Result<u32> {
    if !value.is_finite() || value < 0.0 {
        return Err(TableError::InvalidValue { field, value });
    }
    let scaled = (value * scale + BUCKET_BIAS).floor();
    if scaled > f64::from(u32::MAX) {
        return Err(TableError::InvalidValue { field, value });
    }
    Ok(scaled as u32)
}

#[cfg(test)]
mod tests {
    use super::{StatisticsSample, Strategy, eps_bucket};
    use crate::error::TableError;

    #[test]
    fn bucket_bias_avoids_landing_one_low() {
        assert_eq!(eps_bucket(0.29).unwrap(), 29);
        assert_eq!(eps_bucket(0.57).unwrap(), 57);
        assert_eq!(eps_bucket(0.0).unwrap(), 0);
        assert_eq!(eps_bucket(0.4).unwrap(), 40);
    }

    #[test]
    fn bucket_truncates_rather_than_rounds() {
        assert_eq!(eps_bucket(0.126).unwrap(), 12);
    }

    #[test]
    fn invalid_ratios_rejected() {
        assert!(matches!(
            eps_bucket(-0.01),
            Err(TableError::InvalidValue { field: "error_ratio", .. })
        ));
        assert!(eps_bucket(f64::NAN).is_err());
        assert!(eps_bucket(f64::INFINITY).is_err());
    }

    #[test]
    fn deserializes_collector_record_and_ignores_extras() {
        let sample: StatisticsSample = serde_json::from_str(
            r#"{"m":34,"error_ratio":0.07,"bits":5,"redundancy":3,"score_coef":1.5,
                "trial_count":200,"accepted":190,"accuracy":0.95,"expected_score":1234.5}"#,
        )
        .unwrap();
        assert_eq!(sample.eps().unwrap(), 7);
        assert_eq!(sample.strategy(), Strategy::new(5, 3).with_score_coef(1.5));
    }

    #[test]
    fn score_coef_is_optional() {
        let sample: StatisticsSample = serde_json::from_str(
            r#"{"m":10,"error_ratio":0.0,"expected_score":1.0,"bits":4,"redundancy":1}"#,
        )
        .unwrap();
        assert_eq!(sample.score_coef, None);
    }
}
