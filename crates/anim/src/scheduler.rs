//! Tick scheduling seam between the driver and its host loop.
//!
//! Interactive hosts hand frames out on a timer or vsync callback; the CLI
//! and the tests just want every frame as fast as possible. Both sit
//! behind [`TickScheduler`], and [`run`] pumps a driver against whichever
//! implementation the host provides.

use crate::driver::{Driver, TickToken};
use driftfield_core::{DriftError, Raster};
use std::collections::VecDeque;

/// Hands tick tokens back to the driver in its own time.
pub trait TickScheduler {
    /// Queues a token for a future tick.
    fn schedule(&mut self, token: TickToken);

    /// The next token due, if any.
    fn next(&mut self) -> Option<TickToken>;

    /// Drops every pending token.
    fn cancel_all(&mut self);
}

/// FIFO scheduler with no pacing. Every scheduled tick is due immediately,
/// so pumping it runs a cycle to completion as fast as it advects.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: VecDeque<TickToken>,
}

impl FrameQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl TickScheduler for FrameQueue {
    fn schedule(&mut self, token: TickToken) {
        self.pending.push_back(token);
    }

    fn next(&mut self) -> Option<TickToken> {
        self.pending.pop_front()
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

/// Pumps the driver until the scheduler runs dry: each tick that yields a
/// follow-up token is re-scheduled, stale ticks drain silently.
///
/// The caller seeds the scheduler with the trigger's token before calling.
pub fn run<S, F>(driver: &mut Driver, scheduler: &mut S, mut present: F) -> Result<(), DriftError>
where
    S: TickScheduler,
    F: FnMut(&Raster),
{
    while let Some(token) = scheduler.next() {
        if let Some(next) = driver.tick(token, &mut present)? {
            scheduler.schedule(next);
        }
    }
    Ok(())
}
