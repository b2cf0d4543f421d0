use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::animation::cycle::CyclePhase;
use crate::app::{App, Host};
use crate::ui::theme::Theme;

/// Render the bottom status bar with the contextual keybindings
pub fn render(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let key_spans: Vec<Span> = keybindings(app)
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(format!(" {} ", key), theme.help_key),
                Span::styled(format!("{} ", desc), theme.help_desc),
                Span::styled("│", Style::default().fg(theme.fg_dim)),
            ]
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(key_spans)).style(theme.status_bar),
        area,
    );
}

/// Delay and what the active indicator is doing, for the title row
pub fn indicator_state<'a>(app: &App, theme: &'a Theme) -> Line<'a> {
    let view = app.active_view();
    let state = if !view.is_attached() {
        "detached".to_string()
    } else if view.cycle().is_start_pending() {
        "waiting".to_string()
    } else {
        match view.phase() {
            CyclePhase::Idle => "idle".to_string(),
            CyclePhase::FreeFall => format!("falling {}", view.shape().shape()),
            CyclePhase::UpThrow => format!("rising {}", view.shape().shape()),
        }
    };
    Line::from(vec![
        Span::styled(format!("{}ms ", view.delay_ms()), Style::default().fg(theme.fg)),
        Span::styled(format!("{state} "), theme.status_bar),
    ])
}

fn keybindings(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut keys = vec![("space", "Toggle"), ("tab", "Host")];
    if app.host == Host::Dialog && app.dialog.is_showing() {
        keys.push(("esc", "Cancel"));
    } else {
        keys.push(("s", "Dialog"));
    }
    keys.extend([
        ("+/-", "Delay"),
        ("t", "Text"),
        ("d", "Detach"),
        ("q", "Quit"),
    ]);
    keys
}
