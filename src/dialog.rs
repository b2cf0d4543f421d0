//! Modal wrapper around a [`LoadingView`].

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::loading_view::{LoadingView, DEFAULT_DELAY_MS};
use crate::shape::DisplayMetrics;

/// Collects dialog options before the dialog exists
#[derive(Debug, Clone)]
pub struct Builder {
    metrics: DisplayMetrics,
    delay_ms: u64,
    load_text: Option<String>,
    cancelable: bool,
    canceled_on_touch_outside: bool,
}

impl Builder {
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            metrics,
            delay_ms: DEFAULT_DELAY_MS,
            load_text: None,
            cancelable: true,
            canceled_on_touch_outside: true,
        }
    }

    pub fn delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn load_text(mut self, text: impl Into<String>) -> Self {
        self.load_text = Some(text.into());
        self
    }

    /// Also sets `canceled_on_touch_outside` to the same value
    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self.canceled_on_touch_outside = cancelable;
        self
    }

    pub fn canceled_on_touch_outside(mut self, canceled: bool) -> Self {
        self.canceled_on_touch_outside = canceled;
        self
    }

    pub fn build(self) -> LoadingDialog {
        LoadingDialog::new(self)
    }

    /// Build and show in one go
    pub fn show(self) -> LoadingDialog {
        let mut dialog = self.build();
        dialog.show();
        dialog
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn text(&self) -> Option<&str> {
        self.load_text.as_deref()
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn is_canceled_on_touch_outside(&self) -> bool {
        self.canceled_on_touch_outside
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(DisplayMetrics::default())
    }
}

#[derive(Debug, Clone)]
pub struct LoadingDialog {
    builder: Builder,
    view: LoadingView,
    created: bool,
    showing: bool,
    cancelable: bool,
    canceled_on_touch_outside: bool,
    /// Where the dialog was last drawn, for outside-click detection
    area: Option<Rect>,
}

impl LoadingDialog {
    fn new(builder: Builder) -> Self {
        Self {
            view: LoadingView::new(builder.metrics).hidden(),
            cancelable: builder.cancelable,
            canceled_on_touch_outside: builder.canceled_on_touch_outside,
            builder,
            created: false,
            showing: false,
            area: None,
        }
    }

    /// First show only: hand the builder's options to the view
    fn on_create(&mut self) {
        self.view.set_delay(self.builder.delay_ms);
        self.view.set_loading_text(self.builder.load_text.clone());
        self.created = true;
    }

    pub fn show(&mut self) {
        if !self.created {
            self.on_create();
        }
        if !self.view.is_attached() {
            self.view.on_attach();
        }
        self.showing = true;
        self.view.set_visible(true);
        debug!("loading dialog shown");
    }

    /// Hide the dialog and its view. The cycle stops immediately.
    pub fn dismiss(&mut self) {
        if !self.showing {
            return;
        }
        self.showing = false;
        self.view.set_visible(false);
        self.view.on_detach();
        self.area = None;
        debug!("loading dialog dismissed");
    }

    /// User backed out. Returns whether the dialog went away.
    pub fn cancel(&mut self) -> bool {
        if !self.showing || !self.cancelable {
            return false;
        }
        self.dismiss();
        true
    }

    pub fn set_cancelable(&mut self, cancelable: bool) {
        self.cancelable = cancelable;
    }

    pub fn set_canceled_on_touch_outside(&mut self, canceled: bool) {
        self.canceled_on_touch_outside = canceled;
    }

    /// Esc cancels. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.showing {
            return false;
        }
        match key.code {
            KeyCode::Esc => {
                self.cancel();
                true
            }
            _ => false,
        }
    }

    /// A left click outside the dialog cancels it when allowed
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !self.showing || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        let Some(area) = self.area else {
            return false;
        };
        if area.contains(Position::new(mouse.column, mouse.row)) {
            return false;
        }
        if self.canceled_on_touch_outside {
            self.dismiss();
            return true;
        }
        false
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn is_canceled_on_touch_outside(&self) -> bool {
        self.canceled_on_touch_outside
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    pub fn view(&self) -> &LoadingView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut LoadingView {
        &mut self.view
    }
}
