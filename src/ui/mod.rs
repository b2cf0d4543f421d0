pub mod components;
pub mod theme;

use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, Host};
use crate::ui::components::loading_dialog::{self, centered_rect};
use crate::ui::components::shape_loading::ShapeLoadingWidget;
use crate::ui::components::status_bar;

/// Plain-host indicator size in cells
const PLAIN_WIDTH: u16 = 26;
const PLAIN_HEIGHT: u16 = 12;

/// Top-level draw function
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let title = Paragraph::new(Line::styled(" shapeload ", app.theme.help_key))
        .alignment(Alignment::Left);
    f.render_widget(title, chunks[0]);
    let state = Paragraph::new(status_bar::indicator_state(app, &app.theme))
        .alignment(Alignment::Right);
    f.render_widget(state, chunks[0]);

    if app.host == Host::Plain {
        let area = centered_rect(PLAIN_WIDTH, PLAIN_HEIGHT, chunks[1]);
        f.render_widget(ShapeLoadingWidget::new(&app.plain, &app.theme), area);
    }

    status_bar::render(f, app, &app.theme, chunks[2]);

    // Overlay dialog
    let theme = app.theme.clone();
    loading_dialog::render(f, &mut app.dialog, &theme);
}
