use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Clear};
use ratatui::Frame;

use crate::dialog::LoadingDialog;
use crate::ui::components::shape_loading::ShapeLoadingWidget;
use crate::ui::theme::Theme;

const DIALOG_WIDTH: u16 = 28;
const DIALOG_HEIGHT: u16 = 14;

/// Draw the dialog centred over whatever is underneath, and remember where
/// it went so outside clicks can be told apart
pub fn render(f: &mut Frame, dialog: &mut LoadingDialog, theme: &Theme) {
    if !dialog.is_showing() {
        return;
    }

    let area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border);

    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(ShapeLoadingWidget::new(dialog.view(), theme), inner);

    dialog.set_area(area);
}

/// A `width` x `height` rectangle in the middle of `area`, shrunk to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::dialog::Builder;

    #[test]
    fn test_centered_rect() {
        let area = centered_rect(28, 14, Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(26, 5, 28, 14));

        let small = centered_rect(28, 14, Rect::new(0, 0, 20, 10));
        assert_eq!(small, Rect::new(0, 0, 20, 10));
    }

    #[test]
    fn test_render_records_area_for_hit_testing() {
        let theme = Theme::default();
        let mut dialog = Builder::default().load_text("Wait").show();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| render(f, &mut dialog, &theme))
            .unwrap();

        assert_eq!(dialog.area(), Some(Rect::new(26, 5, 28, 14)));
        let buf = terminal.backend().buffer();
        assert_eq!(buf[(26u16, 5u16)].symbol(), "╭");
        assert_eq!(buf[(53u16, 18u16)].symbol(), "╯");
    }

    #[test]
    fn test_hidden_dialog_draws_nothing() {
        let theme = Theme::default();
        let mut dialog = Builder::default().build();
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal
            .draw(|f| render(f, &mut dialog, &theme))
            .unwrap();
        assert!(terminal
            .backend()
            .buffer()
            .content
            .iter()
            .all(|c| c.symbol() == " "));
    }
}
