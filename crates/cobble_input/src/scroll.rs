use tracing::debug;

use crate::context::InputContext;
use crate::events::UserEvent;
use crate::keybinds::KeyBind;
use crate::keys::Modifiers;
use crate::session::InputSession;

/// FOV degrees per unit of scroll while zooming.
const ZOOM_SPEED: f32 = 5.0;

/// Who ended up handling a scroll.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    Screen,
    Camera,
    FovZoom,
    Hotbar,
    /// Nothing could use the scroll, e.g. the held block is locked.
    Ignored,
}

/// Sets the current FOV, raising a change event if it differs.
pub(crate) fn apply_fov(ctx: &mut InputContext<'_>, fov: i32) {
    if ctx.options.fov == fov {
        return;
    }
    ctx.options.fov = fov;
    ctx.raise(UserEvent::FovChanged(fov));
}

/// Adds `delta` to `accumulator` and returns the whole steps taken, keeping the
/// fraction. Changing direction throws away what was accumulated.
fn accumulate_wheel_delta(accumulator: &mut f32, delta: f32) -> i32 {
    if (*accumulator < 0.0 && delta > 0.0) || (*accumulator > 0.0 && delta < 0.0) {
        *accumulator = 0.0;
    }
    *accumulator += delta;
    let steps = accumulator.trunc();
    *accumulator -= steps;
    steps as i32
}

impl InputSession {
    pub fn on_scroll(&mut self, ctx: &mut InputContext<'_>, delta: f32) -> ScrollTarget {
        if ctx.screens.offer(|screen| screen.handles_mouse_scroll(delta)) {
            return ScrollTarget::Screen;
        }

        let hotbar = ctx
            .keys
            .modifiers()
            .intersects(Modifiers::ALT | Modifiers::CTRL | Modifiers::SHIFT);
        if !hotbar && ctx.camera.zoom(delta) {
            return ScrollTarget::Camera;
        }
        if self.fov_zoom(ctx, delta) {
            return ScrollTarget::FovZoom;
        }
        if !ctx.inventory.can_change_selected {
            return ScrollTarget::Ignored;
        }

        self.scroll_hotbar(ctx, delta);
        ScrollTarget::Hotbar
    }

    fn scroll_hotbar(&mut self, ctx: &mut InputContext<'_>, delta: f32) {
        let steps = accumulate_wheel_delta(&mut self.hotbar_scroll, delta);
        if steps == 0 {
            return;
        }

        let held = ctx.inventory.selected_block();
        if ctx.keys.modifiers().contains(Modifiers::ALT) {
            ctx.inventory.scroll_page(steps);
        } else {
            ctx.inventory.scroll_selected(steps);
        }
        if ctx.inventory.selected_block() != held {
            ctx.raise(UserEvent::HeldBlockChanged);
        }
    }

    /// Zooms the view while the zoom bind is held, if the server allows it.
    pub fn fov_zoom(&mut self, ctx: &mut InputContext<'_>, delta: f32) -> bool {
        if !ctx.binds.is_pressed(KeyBind::ZoomScroll, ctx.keys) {
            return false;
        }
        if !ctx.player.hacks().third_person_allowed() {
            return false;
        }

        let zoom = self.zoom.get_or_insert(ctx.options.zoom_fov as f32);
        *zoom -= delta * ZOOM_SPEED;
        *zoom = zoom.min(ctx.options.default_fov as f32).max(1.0);
        let fov = *zoom as i32;
        self.set_fov(ctx, fov)
    }

    /// Sets both the zoom and current FOV. Needs third person camera permission.
    pub fn set_fov(&mut self, ctx: &mut InputContext<'_>, fov: i32) -> bool {
        if !ctx.player.hacks().third_person_allowed() {
            return false;
        }

        ctx.options.zoom_fov = fov;
        apply_fov(ctx, fov);
        true
    }

    /// Undoes any zoom once the server revokes third person camera permission.
    pub fn on_hack_permissions_changed(&mut self, ctx: &mut InputContext<'_>) {
        if ctx.player.hacks().third_person_allowed() {
            return;
        }

        debug!("zoom no longer permitted, restoring default FOV");
        self.zoom = None;
        let default_fov = ctx.options.default_fov;
        apply_fov(ctx, default_fov);
    }
}
