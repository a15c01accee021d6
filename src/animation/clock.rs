//! Frame clocks and the cancellable tick loop.
//!
//! Everything here is single-threaded. The loop borrows the engine mutably
//! for each frame, so the engine stays the only writer of animation state.
//! Cancellation is a shared flag; dropping the loop sets it, so no
//! repeating task outlives its owner.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::FrameOutput;
use crate::engine::FlowEngine;

/// Source of frame timestamps.
pub trait FrameClock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

impl<C: FrameClock + ?Sized> FrameClock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: FrameClock + ?Sized> FrameClock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock advanced explicitly, by a host (e.g. `requestAnimationFrame`
/// timestamps) or by tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time.
    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Handle that stops a [`TickLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// A repeating per-frame task driving a [`FlowEngine`].
pub struct TickLoop<C: FrameClock> {
    clock: C,
    cancel: CancelHandle,
    frames: u64,
}

impl<C: FrameClock> TickLoop<C> {
    /// Start a loop; the engine's animation clock is primed with `clock.now()`.
    pub fn start(clock: C, engine: &mut FlowEngine) -> Self {
        engine.start(clock.now());
        tracing::debug!("tick loop started");
        Self {
            clock,
            cancel: CancelHandle::default(),
            frames: 0,
        }
    }

    /// A handle that can stop this loop from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Number of frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run one frame. Returns `None` once the loop has been cancelled.
    pub fn frame(&mut self, engine: &mut FlowEngine) -> Option<FrameOutput> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.frames += 1;
        Some(engine.tick(self.clock.now()))
    }

    /// Run frames every `interval` until cancelled, `max_frames` is reached
    /// or `on_frame` breaks. Returns the number of frames run by this call.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run<F>(
        &mut self,
        engine: &mut FlowEngine,
        interval: Duration,
        max_frames: Option<u64>,
        mut on_frame: F,
    ) -> u64
    where
        F: FnMut(&FrameOutput) -> std::ops::ControlFlow<()>,
    {
        let mut ran = 0u64;
        while max_frames.map_or(true, |max| ran < max) {
            let Some(output) = self.frame(engine) else {
                break;
            };
            ran += 1;
            if on_frame(&output).is_break() {
                break;
            }
            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        ran
    }
}

impl<C: FrameClock> Drop for TickLoop<C> {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            tracing::debug!(frames = self.frames, "tick loop stopped");
        }
    }
}
