use cobble_shared::block::{BlockId, PlacementAim};
use glam::IVec3;
use tracing::debug;

use crate::click::ClickButton;
use crate::context::InputContext;
use crate::events::UserEvent;
use crate::keybinds::KeyBind;
use crate::placement::is_free;
use crate::session::InputSession;

const HELD_BLOCK_LOCKED: &str = "The server has forbidden you from changing your held block.";

fn change_block(ctx: &mut InputContext<'_>, pos: IVec3, old: BlockId, new: BlockId) {
    debug!("block at {pos} changed from {old:?} to {new:?}");
    ctx.world.set_block(pos, new);
    ctx.raise(UserEvent::BlockChanged { pos, old, new });
}

/// Tells the player when the server has locked their held block.
pub fn check_change_selected(ctx: &mut InputContext<'_>) -> bool {
    if !ctx.inventory.can_change_selected {
        ctx.chat.add_message(HELD_BLOCK_LOCKED);
        return false;
    }
    true
}

pub fn delete_block(ctx: &mut InputContext<'_>) {
    // The swing plays even when nothing gets deleted.
    ctx.held_block.click_anim(true);

    let pos = ctx.selection.block_pos;
    if !ctx.selection.valid || !ctx.world.contains(pos) {
        return;
    }

    let old = ctx.world.block(pos);
    if ctx.blocks.is_gas(old) || !ctx.blocks.can_delete(old) {
        return;
    }
    change_block(ctx, pos, old, BlockId::AIR);
}

pub fn place_block(ctx: &mut InputContext<'_>) {
    let pos = ctx.selection.translated_pos;
    if !ctx.selection.valid || !ctx.world.contains(pos) {
        return;
    }

    let old = ctx.world.block(pos);
    let mut block = ctx.inventory.selected_block();
    if ctx.options.auto_rotate {
        let aim = PlacementAim {
            heading: ctx.player.heading(),
            face: ctx.selection.closest,
            height_in_cell: ctx.selection.intersect.y - pos.y as f32,
        };
        block = ctx.blocks.auto_rotate(block, aim);
    }

    if ctx.blocks.can_pick(old, ctx.options.breakable_liquids) || !ctx.blocks.can_place(block) {
        return;
    }
    // Air-like blocks may only replace other air-like blocks.
    if ctx.blocks.is_gas(block) && !ctx.blocks.is_gas(old) {
        return;
    }
    if !is_free(ctx, block) {
        debug!("placing {block:?} at {pos} blocked");
        return;
    }
    change_block(ctx, pos, old, block);
}

pub fn pick_block(ctx: &mut InputContext<'_>) {
    let pos = ctx.selection.block_pos;
    if !ctx.world.contains(pos) {
        return;
    }

    let cur = ctx.world.block(pos);
    if ctx.blocks.is_gas(cur) {
        return;
    }
    if !(ctx.blocks.can_place(cur) || ctx.blocks.can_delete(cur)) {
        return;
    }
    if !check_change_selected(ctx) {
        return;
    }
    if ctx.inventory.pick_block(cur) {
        ctx.raise(UserEvent::HeldBlockChanged);
    }
}

pub fn dispatch(ctx: &mut InputContext<'_>, button: ClickButton) {
    match button {
        ClickButton::Delete => delete_block(ctx),
        ClickButton::Place => place_block(ctx),
        ClickButton::Pick => pick_block(ctx),
    }
}

impl InputSession {
    /// Repeats held block actions. Call once per frame.
    pub fn poll_actions(&mut self, ctx: &mut InputContext<'_>) {
        let now = ctx.now_ms();
        if now.saturating_sub(self.clicks.last_click()) < self.poll_interval_ms() {
            return;
        }
        self.clicks.set_last_click(now);
        if ctx.grabs_input() {
            return;
        }

        let delete = ctx.binds.is_pressed(KeyBind::DeleteBlock, ctx.keys);
        let place = ctx.binds.is_pressed(KeyBind::PlaceBlock, ctx.keys);
        let pick = ctx.binds.is_pressed(KeyBind::PickBlock, ctx.keys);

        if ctx.net.supports_player_click() {
            self.clicks.invalidate_target();
            self.clicks.set_button(ctx, ClickButton::Delete, delete);
            self.clicks.set_button(ctx, ClickButton::Place, place);
            self.clicks.set_button(ctx, ClickButton::Pick, pick);
        }

        if delete {
            delete_block(ctx);
        } else if place {
            place_block(ctx);
        } else if pick {
            pick_block(ctx);
        }
    }
}
