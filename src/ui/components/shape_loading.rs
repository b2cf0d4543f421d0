use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::loading_view::LoadingView;
use crate::shape::{Shape, ShapeState};
use crate::ui::theme::Theme;

/// Shape half-extent as a fraction of the throw distance
const SIZE_RATIO: f64 = 0.2;

/// Indicator half-width at full scale, relative to the shape half-extent
const INDICATOR_RATIO: f64 = 1.3;

/// Draws a [`LoadingView`]: the shape in flight, its indicator, and the caption.
/// A hidden view draws nothing.
pub struct ShapeLoadingWidget<'a> {
    view: &'a LoadingView,
    theme: &'a Theme,
}

impl<'a> ShapeLoadingWidget<'a> {
    pub fn new(view: &'a LoadingView, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl Widget for ShapeLoadingWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.view.is_visible() || area.is_empty() {
            return;
        }

        let caption_rows = if self.view.caption_visible() { 1 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(caption_rows)])
            .split(area);

        let scene = Scene::new(self.view.cycle().distance() as f64);
        let state = *self.view.shape().state();
        let color = self.theme.shape_color(state.shape);
        let indicator_color = self.theme.indicator;
        let (x_bounds, y_bounds) = scene.bounds(chunks[0]);

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                let half = scene.indicator_half_width(&state);
                ctx.draw(&CanvasLine::new(
                    -half,
                    scene.indicator_y(),
                    half,
                    scene.indicator_y(),
                    indicator_color,
                ));

                let (cx, cy) = (0.0, scene.shape_y(&state));
                if state.shape == Shape::Circle {
                    ctx.draw(&Circle {
                        x: cx,
                        y: cy,
                        radius: scene.size,
                        color,
                    });
                } else {
                    let points = outline(state.shape, cx, cy, scene.size, state.rotation as f64);
                    for (i, &(x1, y1)) in points.iter().enumerate() {
                        let (x2, y2) = points[(i + 1) % points.len()];
                        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
                    }
                }
            })
            .render(chunks[0], buf);

        if let Some(text) = self.view.loading_text() {
            let text = truncate(text, chunks[1].width as usize);
            Paragraph::new(Line::from(Span::styled(text, self.theme.caption)))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
        }
    }
}

/// Canvas coordinates for one throw distance. y grows upward.
#[derive(Debug, Clone, Copy)]
struct Scene {
    distance: f64,
    size: f64,
    margin: f64,
}

impl Scene {
    fn new(distance: f64) -> Self {
        let size = distance * SIZE_RATIO;
        Self {
            distance,
            size,
            margin: size * 0.5,
        }
    }

    fn indicator_y(&self) -> f64 {
        self.margin * 0.5
    }

    /// Centre of the shape: top of the scene at offset 0, just above the
    /// indicator at full distance
    fn shape_y(&self, state: &ShapeState) -> f64 {
        self.margin + self.size + self.distance - state.vertical_offset as f64
    }

    fn indicator_half_width(&self, state: &ShapeState) -> f64 {
        self.size * INDICATOR_RATIO * state.indicator_scale as f64
    }

    fn height(&self) -> f64 {
        self.shape_y(&ShapeState::default()) + self.size + self.margin
    }

    /// Keep shapes square: a terminal cell is about twice as tall as wide
    fn bounds(&self, area: Rect) -> ([f64; 2], [f64; 2]) {
        let height = self.height();
        let rows = area.height.max(1) as f64;
        let half_width = (area.width as f64 * height / (4.0 * rows)).max(self.size * 2.0);
        ([-half_width, half_width], [0.0, height])
    }
}

/// Polygon corners for a shape rotated clockwise by `rotation` degrees.
/// Circles have no corners.
fn outline(shape: Shape, cx: f64, cy: f64, size: f64, rotation: f64) -> Vec<(f64, f64)> {
    let corners: &[f64] = match shape {
        Shape::Triangle => &[90.0, 210.0, 330.0],
        Shape::Rect => &[45.0, 135.0, 225.0, 315.0],
        Shape::Circle => &[],
    };
    let radius = match shape {
        Shape::Rect => size * std::f64::consts::SQRT_2 * 0.8,
        _ => size,
    };
    corners
        .iter()
        .map(|angle| {
            let a = (angle - rotation).to_radians();
            (cx + radius * a.cos(), cy + radius * a.sin())
        })
        .collect()
}

/// Cut `text` to fit `width` columns, adding an ellipsis when shortened
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn render(view: &LoadingView, width: u16, height: u16) -> Buffer {
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(ShapeLoadingWidget::new(view, &theme), f.area()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    fn is_blank(buf: &Buffer) -> bool {
        buf.content.iter().all(|cell| cell.symbol() == " ")
    }

    #[test]
    fn test_hidden_view_draws_nothing() {
        let view = LoadingView::default().hidden();
        assert!(is_blank(&render(&view, 20, 10)));
    }

    #[test]
    fn test_caption_drawn_on_last_row() {
        let mut view = LoadingView::default();
        view.set_loading_text(Some("Loading"));
        let buf = render(&view, 20, 10);
        assert!(row_text(&buf, 9).contains("Loading"));
        assert!(!is_blank(&buf));
    }

    #[test]
    fn test_shape_moves_down_while_falling() {
        let mut view = LoadingView::default();
        view.set_delay(0);
        view.on_attach();
        view.tick(Duration::ZERO);

        let first_row = |buf: &Buffer| {
            (0..buf.area.height).find(|&y| row_text(buf, y).trim() != "")
        };
        let top = first_row(&render(&view, 30, 16));
        view.tick(Duration::from_millis(450));
        let lower = first_row(&render(&view, 30, 16));
        assert!(lower > top);
    }

    #[test]
    fn test_outline_rotation() {
        let upright = outline(Shape::Triangle, 0.0, 0.0, 10.0, 0.0);
        assert_eq!(upright.len(), 3);
        assert!((upright[0].1 - 10.0).abs() < 1e-9);

        let flipped = outline(Shape::Triangle, 0.0, 0.0, 10.0, 180.0);
        assert!((flipped[0].1 + 10.0).abs() < 1e-9);

        assert_eq!(outline(Shape::Rect, 0.0, 0.0, 10.0, 0.0).len(), 4);
        assert!(outline(Shape::Circle, 0.0, 0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_scene_keeps_shape_above_indicator() {
        let scene = Scene::new(200.0);
        let landed = ShapeState {
            vertical_offset: 200.0,
            ..ShapeState::default()
        };
        assert!(scene.shape_y(&landed) - scene.size > scene.indicator_y());
        assert!(scene.shape_y(&ShapeState::default()) + scene.size <= scene.height());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Loading", 10), "Loading");
        assert_eq!(truncate("Loading", 5), "Load…");
    }
}
