//! The falling element: which shape it shows and where it sits.

use std::fmt;

use tracing::trace;

/// Rotation of the shape at rest, in degrees
pub const REST_ROTATION: f32 = 180.0;

/// Indicator (shadow) horizontal scale at rest and at the top of a throw
pub const REST_INDICATOR_SCALE: f32 = 0.2;

/// Indicator scale when the shape touches down
pub const LANDED_INDICATOR_SCALE: f32 = 1.0;

/// Throw height in density-independent units
pub const THROW_DISTANCE_DIP: f32 = 54.0;

/// Throw height used when no display density is known
pub const DEFAULT_THROW_DISTANCE: f32 = 200.0;

/// Something the animation cycle can move, spin, and reshape.
pub trait ShapeMutator {
    fn set_rotation(&mut self, degrees: f32);

    /// Downward displacement from the rest position
    fn set_vertical_offset(&mut self, offset: f32);

    /// Horizontal scale of the indicator under the shape
    fn set_indicator_scale(&mut self, scale: f32);

    /// Swap to the next shape in the fixed cycle. Instantaneous.
    fn change_shape(&mut self);
}

/// Shapes in the order they are cycled through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Triangle,
    Circle,
    Rect,
}

impl Shape {
    pub fn next(self) -> Self {
        match self {
            Shape::Triangle => Shape::Circle,
            Shape::Circle => Shape::Rect,
            Shape::Rect => Shape::Triangle,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Triangle => write!(f, "triangle"),
            Shape::Circle => write!(f, "circle"),
            Shape::Rect => write!(f, "rect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeState {
    pub shape: Shape,
    /// Degrees
    pub rotation: f32,
    pub vertical_offset: f32,
    pub indicator_scale: f32,
}

impl Default for ShapeState {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            rotation: REST_ROTATION,
            vertical_offset: 0.0,
            indicator_scale: REST_INDICATOR_SCALE,
        }
    }
}

impl ShapeState {
    pub fn is_rest_pose(&self) -> bool {
        self.rotation == REST_ROTATION
            && self.vertical_offset == 0.0
            && self.indicator_scale == REST_INDICATOR_SCALE
    }
}

/// The shape element plus its indicator, as drawn by the loading view
#[derive(Debug, Clone, Default)]
pub struct ShapeView {
    state: ShapeState,
    /// Number of shape swaps since creation
    changes: u64,
}

impl ShapeView {
    pub fn new(shape: Shape) -> Self {
        Self {
            state: ShapeState {
                shape,
                ..ShapeState::default()
            },
            changes: 0,
        }
    }

    pub fn state(&self) -> &ShapeState {
        &self.state
    }

    pub fn shape(&self) -> Shape {
        self.state.shape
    }

    pub fn changes(&self) -> u64 {
        self.changes
    }
}

impl ShapeMutator for ShapeView {
    fn set_rotation(&mut self, degrees: f32) {
        self.state.rotation = degrees;
    }

    fn set_vertical_offset(&mut self, offset: f32) {
        self.state.vertical_offset = offset;
    }

    fn set_indicator_scale(&mut self, scale: f32) {
        self.state.indicator_scale = scale;
    }

    fn change_shape(&mut self) {
        let next = self.state.shape.next();
        trace!(from = %self.state.shape, to = %next, "shape change");
        self.state.shape = next;
        self.changes = self.changes.wrapping_add(1);
    }
}

/// Display characteristics of the surface an indicator is drawn on.
///
/// Each indicator derives its own throw distance from its own metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayMetrics {
    /// Canvas units per density-independent unit. `None` means unknown.
    pub density: Option<f32>,
}

impl DisplayMetrics {
    pub fn with_density(density: f32) -> Self {
        Self {
            density: Some(density),
        }
    }

    /// Convert density-independent units to whole canvas units
    pub fn dip_to_units(&self, dip: f32) -> Option<f32> {
        self.density.map(|d| (dip * d + 0.5).floor())
    }

    /// How far the shape falls, in canvas units
    pub fn throw_distance(&self) -> f32 {
        self.dip_to_units(THROW_DISTANCE_DIP)
            .unwrap_or(DEFAULT_THROW_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_cycle_wraps() {
        let start = Shape::Triangle;
        assert_eq!(start.next(), Shape::Circle);
        assert_eq!(start.next().next(), Shape::Rect);
        assert_eq!(start.next().next().next(), Shape::Triangle);
    }

    #[test]
    fn test_change_shape_is_deterministic_and_counted() {
        let mut view = ShapeView::new(Shape::Circle);
        view.change_shape();
        assert_eq!(view.shape(), Shape::Rect);
        view.change_shape();
        assert_eq!(view.shape(), Shape::Triangle);
        assert_eq!(view.changes(), 2);
    }

    #[test]
    fn test_change_shape_leaves_motion_untouched() {
        let mut view = ShapeView::default();
        view.set_vertical_offset(120.0);
        view.set_rotation(33.0);
        view.change_shape();
        assert_eq!(view.state().vertical_offset, 120.0);
        assert_eq!(view.state().rotation, 33.0);
    }

    #[test]
    fn test_default_state_is_rest_pose() {
        assert!(ShapeState::default().is_rest_pose());
        let mut view = ShapeView::default();
        view.set_indicator_scale(1.0);
        assert!(!view.state().is_rest_pose());
    }

    #[test]
    fn test_throw_distance_per_density() {
        assert_eq!(DisplayMetrics::default().throw_distance(), 200.0);
        assert_eq!(DisplayMetrics::with_density(1.0).throw_distance(), 54.0);
        assert_eq!(DisplayMetrics::with_density(2.0).throw_distance(), 108.0);
        // 54 * 1.5 + 0.5 = 81.5 -> 81
        assert_eq!(DisplayMetrics::with_density(1.5).throw_distance(), 81.0);
    }
}
