#![deny(unsafe_code)]
//! Core types for the driftfield generative renderer.
//!
//! Provides the `Raster` RGBA pixel buffer with toroidal addressing, `Srgb`
//! color plus the cheap display-encoding pair used during advection, the
//! `Xorshift64` PRNG, the reproducible `Recipe`, JSON parameter helpers,
//! and the shared `DriftError` type.

pub mod color;
pub mod error;
pub mod params;
pub mod prng;
pub mod raster;
pub mod recipe;

pub use color::Srgb;
pub use error::DriftError;
pub use prng::Xorshift64;
pub use raster::Raster;
pub use recipe::Recipe;
