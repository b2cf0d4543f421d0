use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::config::Config;
use crate::dialog::LoadingDialog;
use crate::event::Event;
use crate::loading_view::LoadingView;
use crate::ui::theme::Theme;

/// Step for the `+` / `-` delay keys, in milliseconds
const DELAY_STEP_MS: u64 = 10;

/// Captions cycled by `t`; `None` hides the caption
const CAPTIONS: &[Option<&str>] = &[
    Some("Loading..."),
    Some("Fetching data"),
    Some("Almost there"),
    None,
];

/// Which surface the indicator lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Dialog,
    Plain,
}

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub should_quit: bool,
    pub theme: Theme,
    pub host: Host,
    pub dialog: LoadingDialog,
    pub plain: LoadingView,
    caption_index: usize,
    last_tick: Instant,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut plain = LoadingView::new(config.metrics()).hidden();
        plain.set_delay(config.loading.delay_ms);
        plain.set_loading_text(config.loading_text());
        plain.on_attach();

        let mut app = Self {
            should_quit: false,
            theme: Theme::from_config(&config.theme),
            host: Host::Plain,
            dialog: config.dialog_builder().build(),
            plain,
            caption_index: 0,
            last_tick: Instant::now(),
        };
        let host = if config.appearance.show_dialog {
            Host::Dialog
        } else {
            Host::Plain
        };
        app.switch_host(host);
        app
    }

    /// The view currently on screen
    pub fn active_view(&self) -> &LoadingView {
        match self.host {
            Host::Dialog => self.dialog.view(),
            Host::Plain => &self.plain,
        }
    }

    fn active_view_mut(&mut self) -> &mut LoadingView {
        match self.host {
            Host::Dialog => self.dialog.view_mut(),
            Host::Plain => &mut self.plain,
        }
    }

    /// Hide one host, show the other
    pub fn switch_host(&mut self, host: Host) {
        debug!(?host, "switching host");
        self.host = host;
        match host {
            Host::Dialog => {
                self.plain.set_visible(false);
                self.dialog.show();
            }
            Host::Plain => {
                self.dialog.dismiss();
                self.plain.set_visible(true);
            }
        }
    }

    fn toggle_visible(&mut self) {
        match self.host {
            Host::Dialog if self.dialog.is_showing() => self.dialog.dismiss(),
            Host::Dialog => self.dialog.show(),
            Host::Plain => {
                let visible = self.plain.is_visible();
                self.plain.set_visible(!visible);
            }
        }
    }

    fn toggle_attached(&mut self) {
        let view = self.active_view_mut();
        if view.is_attached() {
            view.on_detach();
        } else {
            view.on_attach();
        }
    }

    fn adjust_delay(&mut self, increase: bool) {
        let view = self.active_view_mut();
        let delay = if increase {
            view.delay_ms().saturating_add(DELAY_STEP_MS)
        } else {
            view.delay_ms().saturating_sub(DELAY_STEP_MS)
        };
        view.set_delay(delay);
    }

    fn next_caption(&mut self) {
        self.caption_index = (self.caption_index + 1) % CAPTIONS.len();
        let caption = CAPTIONS[self.caption_index];
        self.active_view_mut().set_loading_text(caption);
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.host == Host::Dialog && self.dialog.handle_key(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.toggle_visible(),
            KeyCode::Char('s') => {
                if self.host == Host::Dialog {
                    self.dialog.show();
                } else {
                    self.switch_host(Host::Dialog);
                }
            }
            KeyCode::Tab => {
                let next = match self.host {
                    Host::Dialog => Host::Plain,
                    Host::Plain => Host::Dialog,
                };
                self.switch_host(next);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_delay(true),
            KeyCode::Char('-') => self.adjust_delay(false),
            KeyCode::Char('t') => self.next_caption(),
            KeyCode::Char('d') => self.toggle_attached(),
            _ => {}
        }
    }

    /// Advance every view by `dt`. Stopped views ignore it.
    pub fn advance(&mut self, dt: Duration) {
        self.plain.tick(dt);
        self.dialog.view_mut().tick(dt);
    }

    /// Handle events from the event loop
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                if self.host == Host::Dialog {
                    self.dialog.handle_mouse(mouse);
                }
            }
            Event::Tick => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_tick);
                self.last_tick = now;
                self.advance(dt);
            }
            Event::Resize(_w, _h) => {
                // ratatui redraws at the new size on the next frame
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::cycle::CyclePhase;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(show_dialog: bool) -> App {
        let mut config = Config::default();
        config.appearance.show_dialog = show_dialog;
        config.loading.delay_ms = 0;
        App::new(&config)
    }

    #[test]
    fn test_dialog_host_starts_showing() {
        let mut app = app(true);
        assert!(app.dialog.is_showing());
        assert!(!app.plain.is_visible());
        app.advance(Duration::ZERO);
        assert_eq!(app.active_view().phase(), CyclePhase::FreeFall);
        assert_eq!(app.plain.phase(), CyclePhase::Idle);
    }

    #[test]
    fn test_plain_host_starts_visible() {
        let mut app = app(false);
        assert!(!app.dialog.is_showing());
        app.advance(Duration::ZERO);
        assert_eq!(app.plain.phase(), CyclePhase::FreeFall);
    }

    #[test]
    fn test_space_toggles_visibility() {
        let mut app = app(false);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.plain.is_visible());
        assert!(!app.plain.is_animating());
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.plain.is_animating());
    }

    #[test]
    fn test_esc_dismisses_dialog_and_q_quits() {
        let mut app = app(true);
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.dialog.is_showing());
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_switches_host() {
        let mut app = app(true);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.host, Host::Plain);
        assert!(!app.dialog.is_showing());
        assert!(!app.dialog.view().is_animating());
        assert!(app.plain.is_visible());

        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.host, Host::Dialog);
        assert!(app.dialog.is_showing());
    }

    #[test]
    fn test_delay_keys() {
        let mut app = app(false);
        app.handle_key(key(KeyCode::Char('+')));
        app.handle_key(key(KeyCode::Char('+')));
        assert_eq!(app.plain.delay_ms(), 20);
        app.handle_key(key(KeyCode::Char('-')));
        assert_eq!(app.plain.delay_ms(), 10);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('-')));
        }
        assert_eq!(app.plain.delay_ms(), 0);
    }

    #[test]
    fn test_caption_cycles_through_empty() {
        let mut app = app(false);
        let mut hidden_seen = false;
        for _ in 0..CAPTIONS.len() {
            app.handle_key(key(KeyCode::Char('t')));
            hidden_seen |= !app.plain.caption_visible();
        }
        assert!(hidden_seen);
        assert_eq!(app.plain.loading_text(), Some("Loading..."));
    }

    #[test]
    fn test_detach_key_stops_cycle() {
        let mut app = app(false);
        app.advance(Duration::ZERO);
        app.handle_key(key(KeyCode::Char('d')));
        assert!(!app.plain.is_attached());
        assert!(!app.plain.is_animating());
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.plain.is_animating());
    }
}
