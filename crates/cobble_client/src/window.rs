use std::sync::Arc;

use cobble_input::context::{HeldBlockView, Window as GameWindow, WindowState};
use tracing::{info, trace};
use winit::window::{Fullscreen, Window};

/// The game's view of the OS window. Closing only flags the request; the
/// event loop exits on its next turn.
#[derive(Default)]
pub struct WindowHandle {
    pub window: Option<Arc<Window>>,
    close_requested: bool,
}

impl WindowHandle {
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

impl GameWindow for WindowHandle {
    fn close(&mut self) {
        info!("Shutdown requested");
        self.close_requested = true;
    }

    fn state(&self) -> WindowState {
        let Some(window) = self.window.as_ref() else {
            return WindowState::Normal;
        };

        if window.fullscreen().is_some() {
            WindowState::Fullscreen
        } else if window.is_minimized() == Some(true) {
            WindowState::Minimised
        } else {
            WindowState::Normal
        }
    }

    fn enter_fullscreen(&mut self) {
        if let Some(window) = self.window.as_ref() {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }
    }

    fn exit_fullscreen(&mut self) {
        if let Some(window) = self.window.as_ref() {
            window.set_fullscreen(None);
        }
    }
}

const SWING_SECONDS: f32 = 0.25;

/// Swing animation of the block in the player's hand.
#[derive(Debug, Default)]
pub struct HeldBlockAnim {
    /// 1.0 at the start of a swing, 0.0 when idle.
    swing: f32,
}

impl HeldBlockAnim {
    pub fn update(&mut self, dt: f32) {
        self.swing = (self.swing - dt / SWING_SECONDS).max(0.0);
    }
}

impl HeldBlockView for HeldBlockAnim {
    fn click_anim(&mut self, digging: bool) {
        trace!("held block swing (digging: {digging})");
        self.swing = 1.0;
    }
}
