#![deny(unsafe_code)]
//! Scene composition, generation cycles, and the animation driver.
//!
//! A trigger composes a [`Scene`] (translucent circle scatter plus
//! force-carrying boundary sites), bakes it into a [`GenerationCycle`],
//! and hands the cycle to the [`Driver`], which advects and presents one
//! frame per scheduled tick until the cycle's randomly chosen lifetime
//! runs out. Re-triggering cancels the running cycle cooperatively.

pub mod cycle;
pub mod driver;
pub mod scene;
pub mod scheduler;

#[cfg(feature = "png")]
pub mod snapshot;

pub use cycle::{FlowParams, GenerationCycle};
pub use driver::{Driver, DriverState, TickToken};
pub use scene::{Scene, SceneParams};
pub use scheduler::{run, FrameQueue, TickScheduler};
