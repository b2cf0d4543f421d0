pub mod cycle;

use std::time::Duration;

use crate::shape::ShapeMutator;

/// Linear interpolation
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Time-remapping curve applied to a phase's linear progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Starts slow and speeds up: `t^(2f)`
    Accelerate(f32),
    /// Starts fast and slows down: `1 - (1 - t)^(2f)`
    Decelerate(f32),
}

impl Easing {
    /// Map linear progress (clamped to 0.0 - 1.0) onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Accelerate(factor) => t.powf(2.0 * factor),
            Easing::Decelerate(factor) => 1.0 - (1.0 - t).powf(2.0 * factor),
        }
    }
}

/// A visual attribute a phase animation can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    VerticalOffset,
    IndicatorScale,
    Rotation,
}

impl Property {
    /// Write a value for this attribute onto the target
    pub fn apply<S: ShapeMutator + ?Sized>(self, target: &mut S, value: f32) {
        match self {
            Property::VerticalOffset => target.set_vertical_offset(value),
            Property::IndicatorScale => target.set_indicator_scale(value),
            Property::Rotation => target.set_rotation(value),
        }
    }
}

/// One animated attribute within a phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub property: Property,
    pub from: f32,
    pub to: f32,
}

/// Continuation attached to a phase animation, fired when it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndListener {
    /// Up-throw ended: fall again
    FreeFall,
    /// Free-fall ended: swap the shape, then throw it back up
    ChangeShapeThenUpThrow,
}

/// A set of tracks played together over one duration with one easing curve.
///
/// Built once and replayed with [`PhaseAnimation::start`]. Ending, either
/// naturally or through [`PhaseAnimation::cancel`], reports the attached
/// listener to the caller; whoever owns the animation decides what to do.
#[derive(Debug, Clone)]
pub struct PhaseAnimation {
    duration: Duration,
    easing: Easing,
    tracks: Vec<Track>,
    listener: Option<EndListener>,
    elapsed: Duration,
    running: bool,
}

impl PhaseAnimation {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            tracks: Vec::new(),
            listener: None,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Add an attribute driven from `from` to `to`
    pub fn track(mut self, property: Property, from: f32, to: f32) -> Self {
        self.tracks.push(Track { property, from, to });
        self
    }

    /// Attach the end listener
    pub fn on_end(mut self, listener: EndListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Detach the end listener. Ending afterwards reports nothing.
    pub fn remove_all_listeners(&mut self) {
        self.listener = None;
    }

    /// (Re)start from the beginning, writing the first frame immediately
    pub fn start<S: ShapeMutator + ?Sized>(&mut self, target: &mut S) {
        self.elapsed = Duration::ZERO;
        self.running = true;
        self.apply_frame(target);
    }

    /// Advance by `dt`. Returns the listener if this step finished the animation.
    pub fn advance<S: ShapeMutator + ?Sized>(
        &mut self,
        dt: Duration,
        target: &mut S,
    ) -> Option<EndListener> {
        if !self.running {
            return None;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.apply_frame(target);
        if self.elapsed >= self.duration {
            self.running = false;
            return self.listener;
        }
        None
    }

    /// Stop where it is. A running animation still notifies its listener.
    pub fn cancel(&mut self) -> Option<EndListener> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.listener
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn listener(&self) -> Option<EndListener> {
        self.listener
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Linear progress in 0.0 - 1.0
    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn apply_frame<S: ShapeMutator + ?Sized>(&self, target: &mut S) {
        let eased = self.easing.apply(self.fraction());
        for track in &self.tracks {
            track
                .property
                .apply(target, lerp(track.from, track.to, eased));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ShapeMutator, ShapeView};

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::Accelerate(1.2),
            Easing::Decelerate(1.2),
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_accelerate_lags_and_decelerate_leads() {
        assert!(Easing::Accelerate(1.2).apply(0.5) < 0.5);
        assert!(Easing::Decelerate(1.2).apply(0.5) > 0.5);
        // factor 1.0 is the plain quadratic
        assert!((Easing::Accelerate(1.0).apply(0.5) - 0.25).abs() < 1e-6);
        assert!((Easing::Decelerate(1.0).apply(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 200.0, 0.5), 100.0);
        assert_eq!(lerp(1.0, 0.2, 0.0), 1.0);
        assert_eq!(lerp(0.0, 10.0, 3.0), 10.0);
    }

    fn fall() -> PhaseAnimation {
        PhaseAnimation::new(Duration::from_millis(100), Easing::Linear)
            .track(Property::VerticalOffset, 0.0, 100.0)
            .track(Property::IndicatorScale, 0.2, 1.0)
            .on_end(EndListener::ChangeShapeThenUpThrow)
    }

    #[test]
    fn test_start_writes_first_frame() {
        let mut view = ShapeView::default();
        view.set_vertical_offset(42.0);
        let mut anim = fall();
        anim.start(&mut view);
        assert!(anim.is_running());
        assert_eq!(view.state().vertical_offset, 0.0);
        assert!((view.state().indicator_scale - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_advance_reports_listener_once_at_end() {
        let mut view = ShapeView::default();
        let mut anim = fall();
        anim.start(&mut view);

        assert_eq!(anim.advance(Duration::from_millis(40), &mut view), None);
        assert!((view.state().vertical_offset - 40.0).abs() < 1e-3);

        let ended = anim.advance(Duration::from_millis(100), &mut view);
        assert_eq!(ended, Some(EndListener::ChangeShapeThenUpThrow));
        assert!(!anim.is_running());
        assert_eq!(view.state().vertical_offset, 100.0);

        // Already finished, nothing more to report
        assert_eq!(anim.advance(Duration::from_millis(10), &mut view), None);
    }

    #[test]
    fn test_cancel_notifies_listener_like_a_platform_animator() {
        let mut view = ShapeView::default();
        let mut anim = fall();
        anim.start(&mut view);
        assert_eq!(anim.cancel(), Some(EndListener::ChangeShapeThenUpThrow));
        assert!(!anim.is_running());
        // Cancelling an idle animation is silent
        assert_eq!(anim.cancel(), None);
    }

    #[test]
    fn test_removed_listener_is_never_reported() {
        let mut view = ShapeView::default();
        let mut anim = fall();
        anim.start(&mut view);
        anim.remove_all_listeners();
        assert_eq!(anim.cancel(), None);

        anim.start(&mut view);
        assert_eq!(anim.advance(Duration::from_secs(1), &mut view), None);
    }

    #[test]
    fn test_restart_rewinds() {
        let mut view = ShapeView::default();
        let mut anim = fall();
        anim.start(&mut view);
        anim.advance(Duration::from_millis(70), &mut view);
        anim.start(&mut view);
        assert_eq!(anim.fraction(), 0.0);
        assert_eq!(view.state().vertical_offset, 0.0);
    }
}
