use serde::{Deserialize, Serialize};

use crate::error::CloneError;

/// Upper bound on the clone count. Any base in `(0, 1)` underflows long before
/// this for all but bases within a few ulps of 1.
pub const MAX_CLONES: u32 = 1024;

/// How many nested clones to build and how fast they shrink.
///
/// Clone `k` (for `k = 1..=count`) gets scale factor `base_scale^k`, so every
/// level is a smaller copy of the world than the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneConfig {
    /// Ratio between consecutive nesting levels, in `(0, 1)`.
    pub base_scale: f32,
    /// Number of nested clones.
    pub count: usize,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            base_scale: 0.2,
            count: 2,
        }
    }
}

impl CloneConfig {
    pub fn new(base_scale: f32, count: usize) -> Self {
        Self { base_scale, count }
    }

    /// Scale factor of one nesting level, without validation.
    ///
    /// Levels beyond `i32` range report `0.0`.
    pub fn scale_for_level(&self, level: u32) -> f32 {
        i32::try_from(level).map_or(0.0, |l| self.base_scale.powi(l))
    }

    /// Check the base scale and that every level's scale stays a normal `f32`.
    pub fn validate(&self) -> Result<(), CloneError> {
        self.scales().map(|_| ())
    }

    /// Validated `(level, scale)` pairs for levels `1..=count`.
    pub fn scales(&self) -> Result<Vec<(u32, f32)>, CloneError> {
        let b = self.base_scale;
        if !(b > 0.0 && b < 1.0) {
            return Err(CloneError::InvalidBaseScale(b));
        }

        let count = u32::try_from(self.count)
            .ok()
            .filter(|&c| c <= MAX_CLONES)
            .ok_or(CloneError::TooManyClones {
                count: self.count,
                max: MAX_CLONES,
            })?;

        let mut out = Vec::with_capacity(count as usize);
        for level in 1..=count {
            let scale = self.scale_for_level(level);
            if !scale.is_normal() {
                return Err(CloneError::ScaleUnderflow { level, scale });
            }
            out.push((level, scale));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_setup() {
        let c = CloneConfig::default();
        assert_eq!(c.base_scale, 0.2);
        assert_eq!(c.count, 2);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn geometric_progression() {
        let c = CloneConfig::new(0.5, 4);
        let scales = c.scales().unwrap();
        assert_eq!(
            scales,
            vec![(1, 0.5), (2, 0.25), (3, 0.125), (4, 0.0625)]
        );
    }

    #[test]
    fn scales_strictly_decrease() {
        let c = CloneConfig::new(0.9, 30);
        let scales = c.scales().unwrap();
        for pair in scales.windows(2) {
            assert!(pair[1].1 < pair[0].1);
        }
    }

    #[test]
    fn zero_count_is_valid_and_empty() {
        let c = CloneConfig::new(0.2, 0);
        assert!(c.scales().unwrap().is_empty());
    }

    #[test]
    fn rejects_unit_base() {
        let err = CloneConfig::new(1.0, 2).validate().unwrap_err();
        assert_eq!(err, CloneError::InvalidBaseScale(1.0));
    }

    #[test]
    fn rejects_non_positive_and_nan_base() {
        assert!(CloneConfig::new(0.0, 1).validate().is_err());
        assert!(CloneConfig::new(-0.5, 1).validate().is_err());
        assert!(CloneConfig::new(f32::NAN, 1).validate().is_err());
        assert!(CloneConfig::new(1.5, 1).validate().is_err());
    }

    #[test]
    fn rejects_count_that_underflows() {
        let err = CloneConfig::new(0.2, 100).validate().unwrap_err();
        assert!(matches!(err, CloneError::ScaleUnderflow { .. }));
    }

    #[test]
    fn rejects_huge_count_without_allocating() {
        let err = CloneConfig::new(0.2, usize::MAX).validate().unwrap_err();
        assert_eq!(
            err,
            CloneError::TooManyClones {
                count: usize::MAX,
                max: MAX_CLONES
            }
        );
        let err = CloneConfig::new(0.9999, MAX_CLONES as usize + 1).validate().unwrap_err();
        assert!(matches!(err, CloneError::TooManyClones { .. }));
    }

    #[test]
    fn count_at_limit_is_accepted() {
        let scales = CloneConfig::new(0.9999, MAX_CLONES as usize).scales().unwrap();
        assert_eq!(scales.len(), MAX_CLONES as usize);
        assert_eq!(scales.last().map(|s| s.0), Some(MAX_CLONES));
    }

    #[test]
    fn out_of_range_level_reports_zero() {
        assert_eq!(CloneConfig::new(0.5, 1).scale_for_level(u32::MAX), 0.0);
    }

    #[test]
    fn deserializes_partial_config() {
        let c: CloneConfig = serde_json::from_str(r#"{ "count": 5 }"#).unwrap();
        assert_eq!(c.count, 5);
        assert_eq!(c.base_scale, 0.2);
    }
}
