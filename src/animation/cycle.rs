//! The perpetual free-fall / up-throw loop.
//!
//! Driven entirely by [`AnimationCycle::tick`] on the UI thread. A start is a
//! deferred continuation (a remaining-delay counter) consumed by the next
//! ticks; phase ends chain into the next phase unless the cycle was stopped.

use std::time::Duration;

use tracing::{debug, trace};

use super::{EndListener, Easing, PhaseAnimation, Property};
use crate::shape::{
    ShapeMutator, DEFAULT_THROW_DISTANCE, LANDED_INDICATOR_SCALE, REST_INDICATOR_SCALE,
    REST_ROTATION,
};

/// Length of each phase
pub const ANIMATION_DURATION: Duration = Duration::from_millis(500);

/// Bias of both easing curves
pub const FACTOR: f32 = 1.2;

/// Which phase is currently moving the shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePhase {
    #[default]
    Idle,
    UpThrow,
    FreeFall,
}

#[derive(Debug, Clone)]
pub struct AnimationCycle {
    distance: f32,
    up: Option<PhaseAnimation>,
    down: Option<PhaseAnimation>,
    stopped: bool,
    pending_start: Option<Duration>,
}

impl Default for AnimationCycle {
    fn default() -> Self {
        Self::new(DEFAULT_THROW_DISTANCE)
    }
}

impl AnimationCycle {
    /// `distance` is how far the shape falls, in canvas units
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            up: None,
            down: None,
            stopped: false,
            pending_start: None,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// A start is waiting for its delay to run out
    pub fn is_start_pending(&self) -> bool {
        self.pending_start.is_some()
    }

    pub fn phase(&self) -> CyclePhase {
        if self.up.as_ref().is_some_and(PhaseAnimation::is_running) {
            CyclePhase::UpThrow
        } else if self.down.as_ref().is_some_and(PhaseAnimation::is_running) {
            CyclePhase::FreeFall
        } else {
            CyclePhase::Idle
        }
    }

    /// Put the shape at rest and begin falling after `delay`.
    ///
    /// No-op while the shape is already falling. A zero delay starts on the
    /// next tick.
    pub fn start<S: ShapeMutator + ?Sized>(&mut self, delay: Duration, shape: &mut S) {
        if self.down.as_ref().is_some_and(PhaseAnimation::is_running) {
            trace!("start ignored: free-fall already running");
            return;
        }
        self.pending_start = None;

        // Mid up-throw: drop it without letting its end chain into a fall
        if self.up.as_ref().is_some_and(PhaseAnimation::is_running) {
            if let Some(mut up) = self.up.take() {
                up.remove_all_listeners();
                up.cancel();
            }
        }

        self.stopped = false;
        shape.set_rotation(REST_ROTATION);
        shape.set_vertical_offset(0.0);
        shape.set_indicator_scale(REST_INDICATOR_SCALE);

        debug!(delay_ms = delay.as_millis() as u64, "cycle start scheduled");
        self.pending_start = Some(delay);
    }

    /// Halt everything. Safe to call at any time, any number of times.
    pub fn stop(&mut self) {
        self.stopped = true;
        for slot in [&mut self.up, &mut self.down] {
            if let Some(mut anim) = slot.take() {
                if let Some(listener) = anim.cancel() {
                    // The stopped flag already rules this out
                    trace!(?listener, "end notification after stop suppressed");
                }
                anim.remove_all_listeners();
            }
        }
        if self.pending_start.take().is_some() {
            debug!("pending cycle start cancelled");
        }
    }

    /// Advance the cycle by `dt` of wall time
    pub fn tick<S: ShapeMutator + ?Sized>(&mut self, dt: Duration, shape: &mut S) {
        if let Some(remaining) = self.pending_start {
            if remaining <= dt {
                self.pending_start = None;
                debug!("cycle started");
                self.run_free_fall(shape);
            } else {
                self.pending_start = Some(remaining - dt);
            }
            return;
        }

        let ended = if let Some(up) = self.up.as_mut().filter(|a| a.is_running()) {
            up.advance(dt, shape)
        } else if let Some(down) = self.down.as_mut().filter(|a| a.is_running()) {
            down.advance(dt, shape)
        } else {
            None
        };

        if let Some(listener) = ended {
            self.on_phase_end(listener, shape);
        }
    }

    fn on_phase_end<S: ShapeMutator + ?Sized>(&mut self, listener: EndListener, shape: &mut S) {
        if self.stopped {
            trace!(?listener, "phase ended after stop; not continuing");
            return;
        }
        match listener {
            EndListener::FreeFall => self.run_free_fall(shape),
            EndListener::ChangeShapeThenUpThrow => {
                shape.change_shape();
                self.run_up_throw(shape);
            }
        }
    }

    fn run_up_throw<S: ShapeMutator + ?Sized>(&mut self, shape: &mut S) {
        let distance = self.distance;
        let up = self.up.get_or_insert_with(|| {
            PhaseAnimation::new(ANIMATION_DURATION, Easing::Decelerate(FACTOR))
                .track(Property::VerticalOffset, distance, 0.0)
                .track(
                    Property::IndicatorScale,
                    LANDED_INDICATOR_SCALE,
                    REST_INDICATOR_SCALE,
                )
                .track(Property::Rotation, 0.0, REST_ROTATION)
                .on_end(EndListener::FreeFall)
        });
        trace!("up-throw");
        up.start(shape);
    }

    fn run_free_fall<S: ShapeMutator + ?Sized>(&mut self, shape: &mut S) {
        let distance = self.distance;
        let down = self.down.get_or_insert_with(|| {
            PhaseAnimation::new(ANIMATION_DURATION, Easing::Accelerate(FACTOR))
                .track(Property::VerticalOffset, 0.0, distance)
                .track(
                    Property::IndicatorScale,
                    REST_INDICATOR_SCALE,
                    LANDED_INDICATOR_SCALE,
                )
                .on_end(EndListener::ChangeShapeThenUpThrow)
        });
        trace!("free-fall");
        down.start(shape);
    }

    #[cfg(test)]
    fn running_count(&self) -> usize {
        [&self.up, &self.down]
            .into_iter()
            .flatten()
            .filter(|a| a.is_running())
            .count()
    }
}
