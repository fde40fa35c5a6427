//! Key and pointer routing between the screen stack and gameplay controls.

use tracing::{debug, info};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use cobble_shared::block::BlockId;

use crate::actions::{check_change_selected, dispatch};
use crate::click::ClickButton;
use crate::context::{InputContext, WindowState};
use crate::events::UserEvent;
use crate::keybinds::KeyBind;
use crate::keys::{InputKey, Modifiers};
use crate::options::{next_view_distance, prev_view_distance, GameOptions};
use crate::screen::{priority, ScreenKind};
use crate::session::InputSession;

const ESCAPE: InputKey = InputKey::Key(KeyCode::Escape);
const PAUSE: InputKey = InputKey::Key(KeyCode::Pause);

const BLOCK_ACTIONS: [(KeyBind, ClickButton); 3] = [
    (KeyBind::DeleteBlock, ClickButton::Delete),
    (KeyBind::PlaceBlock, ClickButton::Place),
    (KeyBind::PickBlock, ClickButton::Pick),
];

/// Stage of key-down routing that consumed a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyDownStage {
    CloseScreen,
    Shutdown,
    Screenshot,
    Screens,
    Pause,
    BlockAction,
    CoreToggle,
    PlayerMovement,
    Hotkey,
}

type StageHandler = fn(&mut InputSession, &mut InputContext<'_>, InputKey, bool) -> bool;

struct Route {
    stage: KeyDownStage,
    /// Whether held-down key repeats reach this stage.
    on_repeat: bool,
    handler: StageHandler,
}

const KEY_DOWN_ROUTES: [Route; 9] = [
    Route {
        stage: KeyDownStage::CloseScreen,
        on_repeat: true,
        handler: close_screen,
    },
    Route {
        stage: KeyDownStage::Shutdown,
        on_repeat: true,
        handler: shutdown,
    },
    Route {
        stage: KeyDownStage::Screenshot,
        on_repeat: false,
        handler: screenshot,
    },
    Route {
        stage: KeyDownStage::Screens,
        on_repeat: true,
        handler: offer_to_screens,
    },
    Route {
        stage: KeyDownStage::Pause,
        on_repeat: true,
        handler: pause,
    },
    Route {
        stage: KeyDownStage::BlockAction,
        on_repeat: false,
        handler: block_action,
    },
    Route {
        stage: KeyDownStage::CoreToggle,
        on_repeat: false,
        handler: core_toggle,
    },
    Route {
        stage: KeyDownStage::PlayerMovement,
        on_repeat: false,
        handler: player_movement,
    },
    Route {
        stage: KeyDownStage::Hotkey,
        on_repeat: false,
        handler: hotkey,
    },
];

fn close_screen(
    session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    repeat: bool,
) -> bool {
    if session.quirks().escape_closes_on_key_up || key != ESCAPE {
        return false;
    }
    let Some(id) = ctx.screens.closable() else {
        return false;
    };

    // Holding escape must not flicker the menu open and closed.
    if !repeat {
        ctx.screens.remove(id);
        session.on_screens_changed(ctx);
    }
    true
}

fn is_shutdown(session: &InputSession, ctx: &InputContext<'_>, key: InputKey) -> bool {
    let modifiers = ctx.keys.modifiers();
    if key == InputKey::Key(KeyCode::F4) && modifiers.contains(Modifiers::ALT) {
        return true;
    }
    session.quirks().super_q_quits
        && key == InputKey::Key(KeyCode::KeyQ)
        && modifiers.contains(Modifiers::SUPER)
}

fn shutdown(
    session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    if !is_shutdown(session, ctx, key) {
        return false;
    }
    info!("Shutdown shortcut pressed, closing window");
    ctx.window.close();
    true
}

fn screenshot(
    _session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    if !ctx.binds.matches(KeyBind::Screenshot, key) {
        return false;
    }
    ctx.options.screenshot_requested = true;
    true
}

fn offer_to_screens(
    _session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    ctx.screens.offer(|screen| screen.handles_key_down(key))
}

fn pause(
    session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    if (key != ESCAPE && key != PAUSE) || ctx.grabs_input() {
        return false;
    }

    // Opening the menu releases pointer lock, which sends an escape key-up that
    // would close the menu straight away.
    if session.quirks().escape_closes_on_key_up {
        session.suppress_escape = true;
    }
    let screen = ctx.factory.pause_screen();
    ctx.screens.add(screen, priority::MENU);
    session.on_screens_changed(ctx);
    true
}

fn block_action(
    session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    if ctx.grabs_input() {
        return false;
    }
    let Some(&(_, button)) = BLOCK_ACTIONS
        .iter()
        .find(|(bind, _)| ctx.binds.matches(*bind, key))
    else {
        return false;
    };

    session.clicks.press(ctx, button);
    dispatch(ctx, button);
    true
}

/// Flips an option and tells the player which key flips it back.
fn toggle(
    ctx: &mut InputContext<'_>,
    key: InputKey,
    label: &str,
    field: fn(&mut GameOptions) -> &mut bool,
) {
    let enabled = {
        let value = field(ctx.options);
        *value = !*value;
        *value
    };

    let message = if enabled {
        format!("{label} is enabled. Press {key} to disable.")
    } else {
        format!("{label} is disabled. Press {key} to re-enable.")
    };
    info!("{label} toggled: {enabled}");
    ctx.chat.add_message(&message);
}

fn cycle_view_distance(ctx: &mut InputContext<'_>) {
    let ladder = ctx.options.view_distances();
    let current = ctx.options.view_distance;
    let dist = if ctx.keys.modifiers().contains(Modifiers::SHIFT) {
        prev_view_distance(ladder, current)
    } else {
        next_view_distance(ladder, current)
    };

    debug!("view distance {current} -> {dist}");
    ctx.options.view_distance = dist;
    ctx.raise(UserEvent::ViewDistanceChanged(dist));
}

fn toggle_fullscreen(ctx: &mut InputContext<'_>) {
    match ctx.window.state() {
        WindowState::Fullscreen => ctx.window.exit_fullscreen(),
        WindowState::Normal => ctx.window.enter_fullscreen(),
        WindowState::Minimised => {}
    }
}

fn drop_held_block(ctx: &mut InputContext<'_>) {
    if !check_change_selected(ctx) || ctx.inventory.selected_block() == BlockId::AIR {
        return;
    }
    // Clear the slot in place so the selection doesn't jump to another empty slot.
    ctx.inventory.set_selected_block(BlockId::AIR);
    ctx.raise(UserEvent::HeldBlockChanged);
}

fn toggle_tex_ids_overlay(session: &mut InputSession, ctx: &mut InputContext<'_>) {
    if !ctx.screens.remove_kind(ScreenKind::TexIdsOverlay) {
        let overlay = ctx.factory.tex_ids_overlay();
        ctx.screens.add(overlay, priority::TEX_IDS);
    }
    session.on_screens_changed(ctx);
}

const CORE_TOGGLES: [KeyBind; 3] = [KeyBind::HideFps, KeyBind::Fullscreen, KeyBind::ViewDistance];

const EXTENDED_TOGGLES: [KeyBind; 8] = [
    KeyBind::HideGui,
    KeyBind::SmoothCamera,
    KeyBind::AxisLines,
    KeyBind::AutoRotate,
    KeyBind::ThirdPerson,
    KeyBind::DropBlock,
    KeyBind::IdOverlay,
    KeyBind::BreakLiquids,
];

fn core_toggle(
    session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    match ctx.binds.find(&CORE_TOGGLES, key) {
        Some(KeyBind::HideFps) => {
            ctx.options.show_fps = !ctx.options.show_fps;
            return true;
        }
        Some(KeyBind::Fullscreen) => {
            toggle_fullscreen(ctx);
            return true;
        }
        Some(KeyBind::ViewDistance) => {
            cycle_view_distance(ctx);
            return true;
        }
        _ => {}
    }

    if ctx.options.classic_mode {
        if key != InputKey::Key(KeyCode::F5) {
            return false;
        }
        ctx.options.weather = ctx.options.weather.toggled();
        info!("Weather set to {:?}", ctx.options.weather);
        return true;
    }

    let Some(bind) = ctx.binds.find(&EXTENDED_TOGGLES, key) else {
        return false;
    };
    match bind {
        KeyBind::HideGui => ctx.options.hide_gui = !ctx.options.hide_gui,
        KeyBind::SmoothCamera => toggle(ctx, key, "Smooth camera", |o| &mut o.smooth_camera),
        KeyBind::AxisLines => toggle(ctx, key, "Axis lines", |o| &mut o.axis_lines),
        KeyBind::AutoRotate => toggle(ctx, key, "Auto rotate", |o| &mut o.auto_rotate),
        KeyBind::BreakLiquids => {
            toggle(ctx, key, "Breakable liquids", |o| &mut o.breakable_liquids)
        }
        KeyBind::ThirdPerson => ctx.camera.cycle_active(),
        KeyBind::DropBlock => drop_held_block(ctx),
        KeyBind::IdOverlay => toggle_tex_ids_overlay(session, ctx),
        _ => return false,
    }
    true
}

fn player_movement(
    _session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    ctx.player.handles_key(key)
}

fn hotkey(
    session: &mut InputSession,
    ctx: &mut InputContext<'_>,
    key: InputKey,
    _repeat: bool,
) -> bool {
    let Some(hotkey) = ctx.hotkeys.find_partial(key, ctx.keys.modifiers()) else {
        return false;
    };
    let (text, stays_open) = (hotkey.text.clone(), hotkey.stays_open);

    if !stays_open {
        ctx.chat.send_message(&text);
    } else if !ctx.grabs_input() {
        let input = ctx.factory.chat_input(&text);
        ctx.screens.add(input, priority::CHAT);
        session.on_screens_changed(ctx);
    }
    true
}

impl InputSession {
    /// Routes a key-down through the stages in order. Returns the stage that
    /// consumed it, or `None` if nothing did.
    pub fn on_key_down(
        &mut self,
        ctx: &mut InputContext<'_>,
        key: InputKey,
        repeat: bool,
    ) -> Option<KeyDownStage> {
        let stage = KEY_DOWN_ROUTES
            .iter()
            .filter(|route| route.on_repeat || !repeat)
            .find(|route| (route.handler)(self, ctx, key, repeat))
            .map(|route| route.stage);

        if let Some(stage) = stage {
            debug!("{key} handled by {stage:?}");
        }
        stage
    }

    pub fn on_key_up(&mut self, ctx: &mut InputContext<'_>, key: InputKey) {
        if ctx.binds.matches(KeyBind::ZoomScroll, key) {
            let default_fov = ctx.options.default_fov;
            crate::scroll::apply_fov(ctx, default_fov);
        }

        if self.quirks().escape_closes_on_key_up && key == ESCAPE {
            if let Some(id) = ctx.screens.closable() {
                if self.suppress_escape {
                    self.suppress_escape = false;
                    return;
                }
                ctx.screens.remove(id);
                self.on_screens_changed(ctx);
                return;
            }
        }

        if ctx.screens.offer(|screen| screen.handles_key_up(key)) {
            return;
        }
        if ctx.grabs_input() {
            return;
        }

        for (bind, button) in BLOCK_ACTIONS {
            if ctx.binds.matches(bind, key) {
                self.clicks.release(ctx, button);
            }
        }
    }

    /// Typed characters only ever go to screens.
    pub fn on_key_press(&mut self, ctx: &mut InputContext<'_>, ch: char) -> bool {
        ctx.screens.offer(|screen| screen.handles_key_press(ch))
    }

    pub fn on_pointer_move(&mut self, ctx: &mut InputContext<'_>, x: i32, y: i32) -> bool {
        ctx.screens.offer(|screen| screen.handles_pointer_move(x, y))
    }

    pub fn on_pointer_down(
        &mut self,
        ctx: &mut InputContext<'_>,
        x: i32,
        y: i32,
        button: MouseButton,
    ) -> bool {
        ctx.screens
            .offer(|screen| screen.handles_pointer_down(x, y, button))
    }

    pub fn on_pointer_up(
        &mut self,
        ctx: &mut InputContext<'_>,
        x: i32,
        y: i32,
        button: MouseButton,
    ) -> bool {
        ctx.screens.offer(|screen| screen.handles_pointer_up(x, y, button))
    }
}
