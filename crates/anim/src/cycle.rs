//! One trigger-to-completion unit of work.
//!
//! A [`GenerationCycle`] owns everything a run needs — the composed
//! raster, the tessellation, the baked flow map, the advector with its
//! scratch buffer, and the remaining frame budget. The bake happens once,
//! in the constructor; stepping only advects. Dropping the cycle releases
//! all of it, which is how cancellation discards a superseded run.

use crate::scene::Scene;
use driftfield_core::params::{param_bool, param_f64};
use driftfield_core::{DriftError, Raster, Xorshift64};
use driftfield_flow::advect::DEFAULT_STEP_LEN;
use driftfield_flow::flow_map::DEFAULT_ERROR_RATE;
use driftfield_flow::sampler::DEFAULT_BASE_FORCE;
use driftfield_flow::{Advector, FlowMap, ForceSampler, NoiseBlend, Tessellation};

/// Shortest random cycle lifetime, in frames.
pub const MIN_FRAMES: u32 = 4;
/// Longest random cycle lifetime, in frames.
pub const MAX_FRAMES: u32 = 25;

/// Low end of the per-axis noise coordinate scale.
const NOISE_SCALE_MIN: f64 = 0.002;
/// High end of the per-axis noise coordinate scale.
const NOISE_SCALE_MAX: f64 = 0.01;

/// Tunables for flow synthesis and advection.
#[derive(Debug, Clone, Copy)]
pub struct FlowParams {
    /// Inverse-quartic falloff constant for site influence.
    pub base_force: f64,
    /// Share of coherent noise mixed into each flow vector; 0 disables.
    pub error_rate: f64,
    /// Displacement per frame, in pixels.
    pub step_len: f64,
    /// Blend RGB through the gamma-2 linearization during advection.
    pub linear_blend: bool,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            base_force: DEFAULT_BASE_FORCE,
            error_rate: DEFAULT_ERROR_RATE,
            step_len: DEFAULT_STEP_LEN,
            linear_blend: false,
        }
    }
}

impl FlowParams {
    /// Extracts params from a JSON object, falling back to defaults.
    pub fn from_json(params: &serde_json::Value) -> Self {
        let d = Self::default();
        Self {
            base_force: param_f64(params, "base_force", d.base_force),
            error_rate: param_f64(params, "error_rate", d.error_rate),
            step_len: param_f64(params, "step_len", d.step_len),
            linear_blend: param_bool(params, "linear_blend", d.linear_blend),
        }
    }
}

/// A running generation: composed raster, baked flow, frame budget.
pub struct GenerationCycle {
    raster: Raster,
    tessellation: Option<Tessellation>,
    flow: FlowMap,
    advector: Advector,
    remaining: u32,
}

impl GenerationCycle {
    /// Builds a cycle from a composed scene: tessellate, bake, arm.
    ///
    /// A scene whose circles were all too small to seed sites gets a
    /// zeroed flow map (frames then present the unchanged composition).
    /// Noise scales are drawn per axis from a low-frequency range.
    pub fn new(
        scene: Scene,
        params: &FlowParams,
        lifetime: u32,
        rng: &mut Xorshift64,
    ) -> Result<Self, DriftError> {
        let width = scene.raster.width();
        let height = scene.raster.height();

        let (tessellation, flow) = if scene.sites.is_empty() {
            (None, FlowMap::zeroed(width, height)?)
        } else {
            let tessellation = Tessellation::build(&scene.sites, width, height)?;
            let noise = (params.error_rate > 0.0).then(|| {
                NoiseBlend::new(
                    rng.next_u32(),
                    rng.next_range(NOISE_SCALE_MIN, NOISE_SCALE_MAX),
                    rng.next_range(NOISE_SCALE_MIN, NOISE_SCALE_MAX),
                    params.error_rate,
                )
            });
            let mut sampler = ForceSampler::new(&tessellation, &scene.sites, params.base_force)?;
            let flow = FlowMap::bake(width, height, &mut sampler, noise.as_ref())?;
            (Some(tessellation), flow)
        };

        Ok(Self {
            raster: scene.raster,
            tessellation,
            flow,
            advector: Advector::new(params.step_len, params.linear_blend),
            remaining: lifetime,
        })
    }

    /// The live frame buffer.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// The baked flow map (one bake per cycle, reused every frame).
    pub fn flow(&self) -> &FlowMap {
        &self.flow
    }

    /// The tessellation, absent only for site-less degenerate scenes.
    pub fn tessellation(&self) -> Option<&Tessellation> {
        self.tessellation.as_ref()
    }

    /// Frames left before the cycle stops itself.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Runs one advection pass and burns one frame of lifetime.
    ///
    /// Stepping an exhausted cycle is a no-op.
    pub fn step(&mut self) -> Result<(), DriftError> {
        if self.remaining == 0 {
            return Ok(());
        }
        self.advector.pass(&self.flow, &mut self.raster)?;
        self.remaining -= 1;
        Ok(())
    }
}
