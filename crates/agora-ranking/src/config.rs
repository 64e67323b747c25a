//! Tunable scoring constants.
//!
//! Defaults follow the classic "hot" ranking: every engagement kind counts
//! once, and scores decay with `(age_hours + 2)^1.5`.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Error, Result};

/// Default exponent of the trending age penalty.
pub const DEFAULT_GRAVITY: f64 = 1.5;

/// Default weight of one reply in trending engagement.
pub const DEFAULT_REPLY_WEIGHT: f64 = 1.0;

/// Default weight of one repost in trending engagement.
pub const DEFAULT_REPOST_WEIGHT: f64 = 1.0;

/// Default z for the Wilson lower bound (95% confidence).
pub const DEFAULT_WILSON_Z: f64 = 1.96;

/// Hours added to an item's age before applying gravity.
pub const AGE_OFFSET_HOURS: f64 = 2.0;

/// Scoring weights shared by all strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Trending weight for replies
    pub reply_weight: f64,

    /// Trending weight for reposts
    pub repost_weight: f64,

    /// Trending decay exponent
    pub gravity: f64,

    /// Standard normal quantile for the Wilson interval
    pub wilson_z: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            reply_weight: DEFAULT_REPLY_WEIGHT,
            repost_weight: DEFAULT_REPOST_WEIGHT,
            gravity: DEFAULT_GRAVITY,
            wilson_z: DEFAULT_WILSON_Z,
        }
    }
}

impl ScoreConfig {
    /// Builder: Set reply weight.
    #[must_use]
    pub fn with_reply_weight(mut self, weight: f64) -> Self {
        self.reply_weight = weight;
        self
    }

    /// Builder: Set repost weight.
    #[must_use]
    pub fn with_repost_weight(mut self, weight: f64) -> Self {
        self.repost_weight = weight;
        self
    }

    /// Builder: Set trending gravity.
    #[must_use]
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: Set the Wilson z directly.
    #[must_use]
    pub fn with_wilson_z(mut self, z: f64) -> Self {
        self.wilson_z = z;
        self
    }

    /// Builder: Derive the Wilson z from a two-sided confidence level.
    pub fn with_confidence(self, level: f64) -> Result<Self> {
        Ok(self.with_wilson_z(z_for_confidence(level)?))
    }

    /// Whether every constant is a finite number.
    pub fn is_finite(&self) -> bool {
        self.reply_weight.is_finite()
            && self.repost_weight.is_finite()
            && self.gravity.is_finite()
            && self.wilson_z.is_finite()
    }
}

/// Two-sided z for a confidence level, e.g. 0.95 → 1.95996.
///
/// `z = Φ⁻¹(1 − (1 − level) / 2)` on the standard normal.
pub fn z_for_confidence(level: f64) -> Result<f64> {
    if !(level > 0.0 && level < 1.0) {
        return Err(Error::InvalidConfidence(level));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|_| Error::InvalidConfidence(level))?;
    Ok(normal.inverse_cdf(1.0 - (1.0 - level) / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ScoreConfig::default();
        assert_eq!(config.reply_weight, 1.0);
        assert_eq!(config.repost_weight, 1.0);
        assert_eq!(config.gravity, 1.5);
        assert_eq!(config.wilson_z, 1.96);
        assert!(config.is_finite());
    }

    #[test]
    fn known_quantiles() {
        let cases = [
            (0.95, 1.959_963_985),
            (0.99, 2.575_829_304),
            (0.8, 1.281_551_566),
            (0.98, 2.326_347_874),
            (0.5, 0.674_489_750),
        ];

        for (level, expected) in cases {
            let z = z_for_confidence(level).unwrap();
            assert!(
                (z - expected).abs() < 1e-6,
                "z_for_confidence({}) = {}, expected {}",
                level,
                z,
                expected
            );
        }
    }

    #[test]
    fn z_grows_with_confidence() {
        let levels = [0.1, 0.5, 0.9, 0.95, 0.999];
        let zs: Vec<f64> = levels.iter().map(|&l| z_for_confidence(l).unwrap()).collect();
        for pair in zs.windows(2) {
            assert!(pair[0] < pair[1], "{:?}", zs);
        }
    }

    #[test]
    fn confidence_to_z() {
        let z = z_for_confidence(0.95).unwrap();
        assert!((z - 1.96).abs() < 1e-3);

        let config = ScoreConfig::default().with_confidence(0.99).unwrap();
        assert!((config.wilson_z - 2.5758).abs() < 1e-3);
    }

    #[test]
    fn confidence_out_of_range() {
        assert_eq!(z_for_confidence(1.0), Err(Error::InvalidConfidence(1.0)));
        assert_eq!(z_for_confidence(0.0), Err(Error::InvalidConfidence(0.0)));
        assert!(z_for_confidence(f64::NAN).is_err());
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: ScoreConfig = serde_json::from_str(r#"{"gravity": 1.8}"#).unwrap();
        assert_eq!(config.gravity, 1.8);
        assert_eq!(config.wilson_z, DEFAULT_WILSON_Z);
    }
}
