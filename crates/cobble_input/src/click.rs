use tracing::trace;

use crate::context::{EntityId, InputContext, PlayerClick};

/// Logical gameplay buttons, in wire order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClickButton {
    Delete = 0,
    Place = 1,
    Pick = 2,
}

impl ClickButton {
    pub const ALL: [ClickButton; 3] = [ClickButton::Delete, ClickButton::Place, ClickButton::Pick];

    pub fn wire_id(self) -> u8 {
        self as u8
    }
}

/// Which gameplay buttons are down, as last reported to the server.
#[derive(Debug, Default, Clone)]
pub struct ClickState {
    down: [bool; 3],
    /// Entity targeted by the current click sequence, looked up lazily.
    picking_id: Option<EntityId>,
    last_click: u64,
}

impl ClickState {
    pub fn is_down(&self, button: ClickButton) -> bool {
        self.down[button as usize]
    }

    pub fn last_click(&self) -> u64 {
        self.last_click
    }

    pub(crate) fn set_last_click(&mut self, now_ms: u64) {
        self.last_click = now_ms;
    }

    pub(crate) fn invalidate_target(&mut self) {
        self.picking_id = None;
    }

    /// Records the logical state and reports it to the server.
    pub fn update_button(&mut self, ctx: &mut InputContext<'_>, button: ClickButton, pressed: bool) {
        let target_entity = *self
            .picking_id
            .get_or_insert_with(|| ctx.entities.closest_to_player());
        self.down[button as usize] = pressed;

        let click = PlayerClick {
            button,
            pressed,
            target_entity,
            selection: *ctx.selection,
            heading: ctx.player.heading(),
            pitch: ctx.player.pitch(),
        };
        trace!("player click {button:?} pressed={pressed} entity={target_entity}");
        ctx.net.send_player_click(&click);
    }

    /// Presses are always reported; releases only when the button was down.
    pub fn set_button(&mut self, ctx: &mut InputContext<'_>, button: ClickButton, pressed: bool) {
        if pressed {
            self.update_button(ctx, button, true);
        } else if self.is_down(button) {
            self.update_button(ctx, button, false);
        }
    }

    /// Starts a new click sequence.
    pub fn press(&mut self, ctx: &mut InputContext<'_>, button: ClickButton) {
        self.last_click = ctx.now_ms();
        self.picking_id = None;
        self.set_button(ctx, button, true);
    }

    pub fn release(&mut self, ctx: &mut InputContext<'_>, button: ClickButton) {
        self.picking_id = None;
        self.set_button(ctx, button, false);
    }

    /// Opening or closing a screen ends any click sequence in progress.
    pub fn on_screens_changed(&mut self, ctx: &mut InputContext<'_>) {
        self.last_click = ctx.now_ms();
        if !ctx.net.supports_player_click() {
            return;
        }

        self.picking_id = None;
        for button in ClickButton::ALL {
            self.set_button(ctx, button, false);
        }
    }
}
