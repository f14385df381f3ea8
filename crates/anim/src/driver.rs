//! Cooperative animation driver.
//!
//! The driver owns at most one [`GenerationCycle`] and advances it one
//! frame per tick. Cancellation is epoch-based: every trigger bumps the
//! driver's epoch and the previous cycle's outstanding [`TickToken`]s go
//! stale, so a tick scheduled before a re-trigger lands as a no-op instead
//! of advancing (or presenting) the wrong cycle. No flags are shared and
//! nothing is interrupted mid-frame.

use crate::cycle::{FlowParams, GenerationCycle, MAX_FRAMES, MIN_FRAMES};
use crate::scene::Scene;
use driftfield_core::{DriftError, Raster, Xorshift64};

/// Where the driver is in its run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No cycle; ticks are no-ops.
    Idle,
    /// A cycle is live and consuming ticks.
    Running,
    /// The final frame was just presented; completion is being reported.
    Stopping,
}

/// Permission to advance one frame of a specific run.
///
/// A token is only valid for the epoch it was minted in; ticking with a
/// token from an earlier epoch does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    epoch: u64,
}

impl TickToken {
    /// The run this token belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Drives generation cycles frame by frame.
pub struct Driver {
    state: DriverState,
    epoch: u64,
    cycle: Option<GenerationCycle>,
    params: FlowParams,
    rng: Xorshift64,
    on_complete: Option<Box<dyn FnMut(&Raster)>>,
    lifetime_override: Option<u32>,
}

impl Driver {
    /// Creates an idle driver. All lifetime and noise randomness for every
    /// subsequent run draws from the one seeded generator.
    pub fn new(params: FlowParams, seed: u64) -> Self {
        Self {
            state: DriverState::Idle,
            epoch: 0,
            cycle: None,
            params,
            rng: Xorshift64::new(seed),
            on_complete: None,
            lifetime_override: None,
        }
    }

    /// Pins every run to a fixed frame count instead of a random one.
    pub fn with_lifetime(mut self, frames: u32) -> Self {
        self.lifetime_override = Some(frames);
        self
    }

    /// Registers a callback invoked with the final raster of each run that
    /// finishes on its own (a cancelled run never completes).
    pub fn on_complete(&mut self, f: impl FnMut(&Raster) + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The live cycle's raster, while one exists.
    pub fn raster(&self) -> Option<&Raster> {
        self.cycle.as_ref().map(GenerationCycle::raster)
    }

    /// Starts a new run from a composed scene, cancelling any run in
    /// flight: the previous cycle is dropped whole and its tokens go
    /// stale. Returns the token for the new run's first tick.
    pub fn trigger(&mut self, scene: Scene) -> Result<TickToken, DriftError> {
        self.epoch += 1;
        self.cycle = None;

        let lifetime = match self.lifetime_override {
            Some(frames) => frames,
            None => {
                let span = (MAX_FRAMES - MIN_FRAMES + 1) as usize;
                MIN_FRAMES + self.rng.next_usize(span) as u32
            }
        };

        let cycle = GenerationCycle::new(scene, &self.params, lifetime, &mut self.rng)?;
        self.cycle = Some(cycle);
        self.state = DriverState::Running;
        Ok(TickToken { epoch: self.epoch })
    }

    /// Drops the live cycle without presenting or completing it.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        self.cycle = None;
        self.state = DriverState::Idle;
    }

    /// Advances one frame: advect, present, and either hand back the token
    /// for the next frame or finish the run.
    ///
    /// A stale token (minted before the latest trigger or cancel) returns
    /// `Ok(None)` without touching anything. On the final frame the driver
    /// passes through [`DriverState::Stopping`], reports completion, and
    /// settles at [`DriverState::Idle`].
    pub fn tick(
        &mut self,
        token: TickToken,
        mut present: impl FnMut(&Raster),
    ) -> Result<Option<TickToken>, DriftError> {
        if token.epoch != self.epoch || self.state != DriverState::Running {
            return Ok(None);
        }
        let cycle = match self.cycle.as_mut() {
            Some(c) => c,
            None => return Ok(None),
        };

        cycle.step()?;
        present(cycle.raster());

        if cycle.remaining() == 0 {
            self.state = DriverState::Stopping;
            if let Some(f) = self.on_complete.as_mut() {
                f(cycle.raster());
            }
            self.cycle = None;
            self.state = DriverState::Idle;
            return Ok(None);
        }
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{compose, SceneParams};
    use driftfield_flow::SiteSet;
    use std::cell::Cell;
    use std::rc::Rc;

    fn test_scene() -> Scene {
        let params = SceneParams::new(24, 24).unwrap();
        compose(&params, &mut Xorshift64::new(31)).unwrap()
    }

    fn siteless_scene() -> Scene {
        Scene {
            raster: Raster::filled(8, 8, [30, 60, 90, 255]).unwrap(),
            sites: SiteSet::new(),
        }
    }

    fn pump(driver: &mut Driver, mut token: TickToken) -> usize {
        let mut frames = 0;
        while let Some(next) = driver.tick(token, |_| frames += 1).unwrap() {
            token = next;
        }
        frames
    }

    #[test]
    fn fixed_lifetime_presents_exactly_that_many_frames() {
        let mut driver = Driver::new(FlowParams::default(), 9).with_lifetime(6);
        let token = driver.trigger(test_scene()).unwrap();
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(pump(&mut driver, token), 6);
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(driver.raster().is_none());
    }

    #[test]
    fn random_lifetimes_stay_in_the_documented_band() {
        let mut driver = Driver::new(FlowParams::default(), 4);
        for _ in 0..12 {
            let token = driver.trigger(test_scene()).unwrap();
            let frames = pump(&mut driver, token) as u32;
            assert!(
                (MIN_FRAMES..=MAX_FRAMES).contains(&frames),
                "lifetime {frames} outside {MIN_FRAMES}..={MAX_FRAMES}"
            );
        }
    }

    #[test]
    fn stale_token_is_a_no_op_after_retrigger() {
        let mut driver = Driver::new(FlowParams::default(), 2).with_lifetime(10);
        let stale = driver.trigger(test_scene()).unwrap();
        let fresh = driver.trigger(siteless_scene()).unwrap();

        let before = driver.raster().unwrap().clone();
        let mut presented = false;
        let out = driver.tick(stale, |_| presented = true).unwrap();
        assert!(out.is_none());
        assert!(!presented, "stale tick must not present");
        assert_eq!(driver.raster().unwrap(), &before, "stale tick must not advect");

        // The fresh token still works.
        assert!(driver.tick(fresh, |_| {}).unwrap().is_some());
    }

    #[test]
    fn cancel_idles_and_invalidates_tokens() {
        let mut driver = Driver::new(FlowParams::default(), 5).with_lifetime(10);
        let token = driver.trigger(test_scene()).unwrap();
        driver.cancel();
        assert_eq!(driver.state(), DriverState::Idle);
        assert!(driver.tick(token, |_| {}).unwrap().is_none());
    }

    #[test]
    fn on_complete_fires_once_with_the_final_frame() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut driver = Driver::new(FlowParams::default(), 13).with_lifetime(3);
        driver.on_complete(move |_| seen.set(seen.get() + 1));

        let token = driver.trigger(test_scene()).unwrap();
        pump(&mut driver, token);
        assert_eq!(calls.get(), 1);

        // Extra ticks after completion change nothing.
        assert!(driver.tick(token, |_| {}).unwrap().is_none());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn cancelled_run_never_reports_completion() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let mut driver = Driver::new(FlowParams::default(), 8).with_lifetime(5);
        driver.on_complete(move |_| seen.set(seen.get() + 1));

        let first = driver.trigger(test_scene()).unwrap();
        driver.tick(first, |_| {}).unwrap();
        let second = driver.trigger(test_scene()).unwrap();
        pump(&mut driver, second);
        assert_eq!(calls.get(), 1, "only the completed run reports");
    }

    #[test]
    fn siteless_scene_presents_static_frames() {
        let mut driver = Driver::new(FlowParams::default(), 3).with_lifetime(4);
        let token = driver.trigger(siteless_scene()).unwrap();
        let expected = driver.raster().unwrap().clone();
        let mut frames = 0;
        let mut token = token;
        while let Some(next) = driver
            .tick(token, |r| {
                frames += 1;
                assert_eq!(r, &expected);
            })
            .unwrap()
        {
            token = next;
        }
        assert_eq!(frames, 4);
    }
}
