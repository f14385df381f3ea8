//! Dense per-pixel flow direction grid.
//!
//! A [`FlowMap`] is baked exactly once per generation cycle by invoking
//! the force sampler at every integer pixel coordinate in row-major order,
//! optionally blending in a coherent-noise direction before renormalizing.
//! Every entry is a unit vector, except where total influence cancels to
//! zero, where the entry is the zero vector.

use crate::sampler::ForceSampler;
use driftfield_core::DriftError;
use glam::DVec2;
use noise::{NoiseFn, Perlin};

/// Fraction of stochastic perturbation mixed into the deterministic field.
pub const DEFAULT_ERROR_RATE: f64 = 0.2;

const NORM_EPS: f64 = 1e-9;

/// Coherent-noise perturbation blended into the sampled field.
///
/// Directions come from two offset Perlin reads at independently scaled
/// coordinates, normalized to unit length. Deterministic for a fixed seed.
pub struct NoiseBlend {
    noise: Perlin,
    scale_x: f64,
    scale_y: f64,
    weight: f64,
}

impl NoiseBlend {
    /// Creates a perturbation source.
    ///
    /// `scale_x` / `scale_y` are the low-frequency coordinate scales;
    /// `weight` is the error rate — the share of noise mixed into each
    /// sampled vector (0 disables, 0.2 is the usual default).
    pub fn new(seed: u32, scale_x: f64, scale_y: f64, weight: f64) -> Self {
        Self {
            noise: Perlin::new(seed),
            scale_x,
            scale_y,
            weight,
        }
    }

    /// The blend weight (error rate).
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Unit noise direction at pixel coordinates `(x, y)`.
    fn direction(&self, x: f64, y: f64) -> DVec2 {
        let sx = x * self.scale_x;
        let sy = y * self.scale_y;
        let v = DVec2::new(
            self.noise.get([sx, sy]),
            self.noise.get([sx + 100.0, sy + 100.0]),
        );
        let len = v.length();
        if len < NORM_EPS {
            DVec2::ZERO
        } else {
            v / len
        }
    }
}

/// Dense 2-component-per-pixel direction grid, row-major, immutable once
/// baked.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMap {
    width: usize,
    height: usize,
    data: Vec<DVec2>,
}

impl FlowMap {
    /// An all-zero map (no displacement anywhere); the degenerate path for
    /// scenes that produced no sites.
    pub fn zeroed(width: usize, height: usize) -> Result<Self, DriftError> {
        if width == 0 || height == 0 {
            return Err(DriftError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(DriftError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![DVec2::ZERO; len],
        })
    }

    /// Bakes the flow map: one sampler invocation per pixel, row-major,
    /// with an optional noise blend re-normalized into each entry.
    ///
    /// This is the one-time cost of a generation cycle; animation frames
    /// reuse the result and never re-bake.
    pub fn bake(
        width: usize,
        height: usize,
        sampler: &mut ForceSampler<'_>,
        noise: Option<&NoiseBlend>,
    ) -> Result<Self, DriftError> {
        let mut map = Self::zeroed(width, height)?;
        let mut i = 0;
        for y in 0..height {
            for x in 0..width {
                let p = DVec2::new(x as f64, y as f64);
                let mut v = sampler.sample(p);
                if let Some(blend) = noise {
                    let mixed = blend.direction(p.x, p.y) * blend.weight() + v;
                    let len = mixed.length();
                    v = if len < NORM_EPS {
                        DVec2::ZERO
                    } else {
                        mixed / len
                    };
                }
                map.data[i] = v;
                i += 1;
            }
        }
        Ok(map)
    }

    /// Map width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Map height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The vector at pixel `(x, y)`. No wrapping; callers index in range.
    pub fn get(&self, x: usize, y: usize) -> DVec2 {
        self.data[y * self.width + x]
    }

    /// Read-only access to the row-major vector data.
    pub fn data(&self) -> &[DVec2] {
        &self.data
    }

    #[cfg(test)]
    pub(crate) fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> DVec2) -> Self {
        let mut map = Self::zeroed(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                map.data[y * width + x] = f(x, y);
            }
        }
        map
    }
}
