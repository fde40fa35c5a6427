use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use cobble_input::config::{load_or_create, SETTINGS_FILE};
use cobble_input::{InputKey, InputSession, InputSettings};
use glam::Vec2;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::game::GameState;
use crate::net::{ClientNet, ServerLink};

const PIXELS_PER_WHEEL_LINE: f32 = 40.0;
const TITLE_REFRESH_SECS: f32 = 0.5;
const DEFAULT_USERNAME: &str = "player";

struct ClientApp {
    settings_path: PathBuf,
    session: InputSession,
    game: GameState,
    cursor_grabbed: bool,
    cursor_position: (i32, i32),
    focused: bool,
    last_frame: Option<Instant>,
    title_elapsed: f32,
    title_frames: u32,
}

impl ClientApp {
    fn new(settings_path: PathBuf, settings: &InputSettings) -> Self {
        Self {
            settings_path,
            session: InputSession::new(settings),
            game: GameState::new(settings),
            cursor_grabbed: false,
            cursor_position: (0, 0),
            focused: true,
            last_frame: None,
            title_elapsed: 0.0,
            title_frames: 0,
        }
    }

    fn connect(&mut self, server_addr: SocketAddr, username: &str) {
        match ClientNet::new(server_addr) {
            Ok(mut net) => {
                net.connect(username);
                self.game.link = ServerLink::connected(net);
            }
            Err(err) => error!("failed to open client socket: {err}"),
        }
    }

    fn set_cursor_grab(&mut self, enabled: bool) {
        let Some(window) = self.game.window.window.as_ref() else {
            self.cursor_grabbed = false;
            return;
        };

        let grabbed = if enabled {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .is_ok()
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            false
        };

        window.set_cursor_visible(!grabbed);
        self.cursor_grabbed = grabbed;
    }

    /// Grabs the cursor for gameplay, releases it while a screen wants the mouse.
    fn sync_cursor_grab(&mut self) {
        let want = self.focused && !self.game.screens.input_grab();
        if want != self.cursor_grabbed {
            self.set_cursor_grab(want);
        }
    }

    fn on_key(&mut self, key: InputKey, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                let repeat = !self.game.keys.press(key) || repeat;
                self.session.on_key_down(&mut self.game.ctx(), key, repeat);
            }
            ElementState::Released => {
                self.game.keys.release(key);
                self.session.on_key_up(&mut self.game.ctx(), key);
            }
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or_else(Default::default, |last| now.duration_since(last));
        self.last_frame = Some(now);

        self.game.tick(&mut self.session, dt);

        if std::mem::take(&mut self.game.options.screenshot_requested) {
            warn!("Screenshots are not supported without a renderer");
        }

        self.title_elapsed += dt.as_secs_f32();
        self.title_frames += 1;
        if self.title_elapsed >= TITLE_REFRESH_SECS {
            let fps = self.title_frames as f32 / self.title_elapsed;
            if let Some(window) = self.game.window.window.as_ref() {
                window.set_title(&self.game.window_title(fps));
            }
            self.title_elapsed = 0.0;
            self.title_frames = 0;
        }

        self.sync_cursor_grab();
        if self.game.window.close_requested() {
            self.shutdown(event_loop);
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(net) = self.game.link.net.as_mut() {
            net.disconnect();
        }
        info!("Shutting down client event loop");
        event_loop.exit();
    }
}

impl ApplicationHandler for ClientApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.game.window.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes().with_title("Cobble");
        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!("Client window initialized");
                self.game.window.window = Some(Arc::new(window));
                self.last_frame = Some(Instant::now());
                self.set_cursor_grab(true);
            }
            Err(err) => {
                error!("failed to create client window: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.game.window.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.game.keys.clear();
                }
                self.sync_cursor_grab();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                self.on_key(InputKey::Key(code), event.state, event.repeat);

                if event.state == ElementState::Pressed {
                    if let Some(text) = event.text.as_deref() {
                        for ch in text.chars() {
                            self.session.on_key_press(&mut self.game.ctx(), ch);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as i32, position.y as i32);
                self.cursor_position = (x, y);
                self.session.on_pointer_move(&mut self.game.ctx(), x, y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.cursor_position;
                let handled = match state {
                    ElementState::Pressed => {
                        self.session
                            .on_pointer_down(&mut self.game.ctx(), x, y, button)
                    }
                    ElementState::Released => {
                        self.session.on_pointer_up(&mut self.game.ctx(), x, y, button)
                    }
                };

                // First click into an ungrabbed window only takes the cursor.
                if !handled && state == ElementState::Pressed && !self.cursor_grabbed {
                    self.sync_cursor_grab();
                    return;
                }
                self.on_key(InputKey::Mouse(button), state, false);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_WHEEL_LINE,
                };
                self.session.on_scroll(&mut self.game.ctx(), delta);
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if !self.cursor_grabbed || self.game.screens.input_grab() {
            return;
        }

        if let DeviceEvent::MouseMotion { delta } = event {
            let sensitivity = self.game.mouse_sensitivity;
            self.game
                .player
                .look(Vec2::new(delta.0 as f32, delta.1 as f32), sensitivity);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.game.window.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Client exited; settings live in {}", self.settings_path.display());
    }
}

/// `cobble_client [server_addr] [username]`. Without an address the client
/// runs a local flat world.
pub fn run() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();

    let settings_path = PathBuf::from(SETTINGS_FILE);
    let settings = load_or_create(&settings_path);
    let mut app = ClientApp::new(settings_path, &settings);

    let mut args = std::env::args().skip(1);
    if let Some(addr) = args.next() {
        let username = args.next().unwrap_or_else(|| DEFAULT_USERNAME.to_owned());
        match addr.parse::<SocketAddr>() {
            Ok(server_addr) => app.connect(server_addr, &username),
            Err(err) => warn!("ignoring invalid server address '{addr}': {err}"),
        }
    }

    let event_loop = match EventLoop::new() {
        Ok(loop_handle) => loop_handle,
        Err(err) => {
            error!("Failed to create event loop: {err}");
            return;
        }
    };

    if let Err(err) = event_loop.run_app(&mut app) {
        error!("Event loop exited with error: {err}");
    }
}
