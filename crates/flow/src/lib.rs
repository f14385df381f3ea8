#![deny(unsafe_code)]
//! Flow-field synthesis and pixel advection.
//!
//! The pipeline: a [`SiteSet`] of boundary points carrying unit force
//! vectors feeds a [`Tessellation`] (nearest-site regions plus adjacency);
//! a [`ForceSampler`] blends the forces of the owning site and its
//! neighbors with inverse-quartic falloff; [`FlowMap::bake`] turns that
//! into a dense per-pixel unit vector grid, optionally perturbed by
//! coherent noise; the [`Advector`] repeatedly resamples a raster along
//! the baked field with wrapped bilinear lookups.

pub mod advect;
pub mod flow_map;
pub mod sampler;
pub mod site;
pub mod tessellation;

pub use advect::Advector;
pub use flow_map::{FlowMap, NoiseBlend};
pub use sampler::ForceSampler;
pub use site::SiteSet;
pub use tessellation::Tessellation;
