//! A loading indicator for terminal UIs: a shape falls, lands, turns into the
//! next shape, and is thrown back up, over and over until hidden.
//!
//! [`LoadingView`] is the widget state, [`LoadingDialog`] wraps it in a modal,
//! and [`ui::components::shape_loading::ShapeLoadingWidget`] draws it.

pub mod animation;
pub mod app;
pub mod config;
pub mod dialog;
pub mod error;
pub mod event;
pub mod loading_view;
pub mod shape;
pub mod ui;

pub use animation::cycle::{AnimationCycle, CyclePhase};
pub use dialog::{Builder, LoadingDialog};
pub use error::{ShapeLoadError, ShapeLoadResult};
pub use loading_view::LoadingView;
pub use shape::{DisplayMetrics, Shape, ShapeMutator, ShapeView};
