//! Reproducible specification for one generation cycle.
//!
//! A [`Recipe`] captures everything needed to replay a render: canvas
//! dimensions, the tunable parameter object, the PRNG seed, and an optional
//! frame-count override. Two identical recipes fed to the same binary
//! produce bit-identical frames.

use crate::error::DriftError;
use serde::{Deserialize, Serialize};

/// Reproducible specification for a generation cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub width: usize,
    pub height: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    /// Fixed frame count; `None` lets the driver pick a random lifetime.
    pub frames: Option<u32>,
}

impl Recipe {
    /// Creates a recipe with empty params and a driver-chosen lifetime.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            frames: None,
        }
    }

    /// Validates non-zero dimensions and that the pixel count fits `usize`.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.width == 0 || self.height == 0 {
            return Err(DriftError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(DriftError::InvalidDimensions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_empty_params_and_no_frame_override() {
        let r = Recipe::new(640, 480, 7);
        assert_eq!(r.params, serde_json::json!({}));
        assert_eq!(r.frames, None);
        assert_eq!(r.seed, 7);
    }

    #[test]
    fn json_round_trip() {
        let mut r = Recipe::new(800, 600, 42);
        r.params = serde_json::json!({"error_rate": 0.35, "base_force": 5000000.0});
        r.frames = Some(12);
        let json = serde_json::to_string(&r).unwrap();
        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn validate_accepts_sane_dimensions() {
        assert!(Recipe::new(1920, 1080, 1).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_and_overflow() {
        assert!(Recipe::new(0, 480, 1).validate().is_err());
        assert!(Recipe::new(640, 0, 1).validate().is_err());
        assert!(Recipe::new(usize::MAX, 2, 1).validate().is_err());
    }
}
