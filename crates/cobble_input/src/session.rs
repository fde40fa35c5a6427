use crate::click::ClickState;
use crate::config::{InputSettings, PlatformQuirks};
use crate::context::InputContext;

/// All mutable input state for one running client.
#[derive(Debug, Clone)]
pub struct InputSession {
    pub(crate) clicks: ClickState,
    /// Accumulated zoom FOV; unset until the first zoom scroll.
    pub(crate) zoom: Option<f32>,
    pub(crate) hotbar_scroll: f32,
    /// Swallows the escape key-up that follows opening the pause screen.
    pub(crate) suppress_escape: bool,
    quirks: PlatformQuirks,
    poll_interval_ms: u64,
}

impl InputSession {
    pub fn new(settings: &InputSettings) -> Self {
        Self::with_quirks(settings, settings.quirks())
    }

    pub fn with_quirks(settings: &InputSettings, quirks: PlatformQuirks) -> Self {
        Self {
            clicks: ClickState::default(),
            zoom: None,
            hotbar_scroll: 0.0,
            suppress_escape: false,
            quirks,
            poll_interval_ms: settings.poll_interval_ms,
        }
    }

    pub fn clicks(&self) -> &ClickState {
        &self.clicks
    }

    pub fn quirks(&self) -> PlatformQuirks {
        self.quirks
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn zoom(&self) -> Option<f32> {
        self.zoom
    }

    /// Must be called whenever a screen is opened or closed.
    pub fn on_screens_changed(&mut self, ctx: &mut InputContext<'_>) {
        self.clicks.on_screens_changed(ctx);
    }
}
