//! The composite loading indicator: shape, indicator, and optional caption.

use std::time::Duration;

use tracing::debug;

use crate::animation::cycle::{AnimationCycle, CyclePhase};
use crate::shape::{DisplayMetrics, ShapeView};

/// Pause before the first fall, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 80;

/// Keeps the animation cycle in step with visibility and attachment.
///
/// Visible means the cycle is scheduled or running; hidden or detached means
/// it is stopped.
#[derive(Debug, Clone)]
pub struct LoadingView {
    delay_ms: u64,
    caption: Option<String>,
    visible: bool,
    attached: bool,
    shape: ShapeView,
    cycle: AnimationCycle,
}

impl Default for LoadingView {
    fn default() -> Self {
        Self::new(DisplayMetrics::default())
    }
}

impl LoadingView {
    /// A visible, not yet attached view. Call [`LoadingView::on_attach`] once
    /// it is on screen.
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            caption: None,
            visible: true,
            attached: false,
            shape: ShapeView::default(),
            cycle: AnimationCycle::new(metrics.throw_distance()),
        }
    }

    /// Start hidden instead of visible
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Host finished placing the view. Starts the cycle if visible.
    pub fn on_attach(&mut self) {
        self.attached = true;
        if self.visible {
            let delay = self.delay();
            self.cycle.start(delay, &mut self.shape);
        }
    }

    /// Host removed the view for good. Stops the cycle immediately.
    pub fn on_detach(&mut self) {
        self.attached = false;
        self.cycle.stop();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.set_visible_with_delay(visible, self.delay_ms);
    }

    /// Change visibility, using `delay_ms` instead of the configured delay
    /// if this starts the cycle. A detached view only records the new
    /// visibility; [`LoadingView::on_attach`] starts it later.
    pub fn set_visible_with_delay(&mut self, visible: bool, delay_ms: u64) {
        debug!(visible, delay_ms, attached = self.attached, "loading view visibility");
        self.visible = visible;
        if !visible {
            self.cycle.stop();
        } else if self.attached {
            self.cycle
                .start(Duration::from_millis(delay_ms), &mut self.shape);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Takes effect on the next start
    pub fn set_delay(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Empty or `None` hides the caption
    pub fn set_loading_text<S: Into<String>>(&mut self, text: Option<S>) {
        self.caption = text.map(Into::into).filter(|t| !t.is_empty());
    }

    pub fn loading_text(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn caption_visible(&self) -> bool {
        self.caption.is_some()
    }

    /// Advance the animation by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.cycle.tick(dt, &mut self.shape);
    }

    pub fn shape(&self) -> &ShapeView {
        &self.shape
    }

    pub fn cycle(&self) -> &AnimationCycle {
        &self.cycle
    }

    pub fn phase(&self) -> CyclePhase {
        self.cycle.phase()
    }

    /// Scheduled or running
    pub fn is_animating(&self) -> bool {
        self.cycle.is_start_pending() || self.cycle.phase() != CyclePhase::Idle
    }
}
