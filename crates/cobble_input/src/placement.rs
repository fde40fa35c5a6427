//! Whether a block may go where the player is aiming, nudging the player out of
//! the way when the server allows it.

use cobble_shared::block::{BlockId, BlockRegistry};
use cobble_shared::physics::{Face, AABB};
use glam::{IVec3, Vec3};
use tracing::debug;

use crate::context::{InputContext, World, SELF_ID};

/// Gap left between the player and a surface they were moved onto.
pub const ENTITY_ADJUSTMENT: f32 = 0.001;

/// Entities standing exactly on the ground must not block placing next to them.
const ENTITY_GROUND_TOLERANCE: f32 = 1.0 / 32.0;

const PUSHBACK_CLEARANCE: f32 = 0.5;

/// Height within a block the player can be nudged up onto when placing under
/// their own feet.
const STEP_UP_HEIGHT: f32 = 0.25;

fn block_box(blocks: &BlockRegistry, pos: Vec3, block: BlockId) -> AABB {
    let (min_bb, max_bb) = blocks.bounds(block);
    AABB::block(pos, min_bb, max_bb)
}

/// True when `block` at `pos` would overlap any entity other than the local player.
pub fn intersects_others(ctx: &InputContext<'_>, pos: Vec3, block: BlockId) -> bool {
    let block_bb = block_box(ctx.blocks, pos, block);

    (0..SELF_ID).any(|id| {
        ctx.entities.bounds(id).is_some_and(|mut entity_bb| {
            entity_bb.min.y += ENTITY_GROUND_TOLERANCE;
            entity_bb.touches(&block_bb)
        })
    })
}

/// True when `bounds` overlaps a solid block inside the world.
pub fn touches_solid(world: &dyn World, blocks: &BlockRegistry, bounds: &AABB) -> bool {
    let max_cell = world.dimensions() - IVec3::ONE;
    let min = bounds.min.floor().as_ivec3().max(IVec3::ZERO);
    let max = bounds.max.floor().as_ivec3().min(max_cell);

    for y in min.y..=max.y {
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                let cell = IVec3::new(x, y, z);
                let block = world.block(cell);
                if !blocks.is_solid(block) {
                    continue;
                }
                if block_box(blocks, cell.as_vec3(), block).touches(bounds) {
                    return true;
                }
            }
        }
    }
    false
}

/// Moves the player just outside `block_bb` on the side the player is aiming at.
pub fn pushback_place(ctx: &mut InputContext<'_>, block_bb: &AABB) -> bool {
    let size = ctx.player.size();
    let mut pos = ctx.player.position();

    match ctx.selection.closest {
        Face::PosX => pos.x = block_bb.max.x + PUSHBACK_CLEARANCE,
        Face::PosZ => pos.z = block_bb.max.z + PUSHBACK_CLEARANCE,
        Face::NegX => pos.x = block_bb.min.x - PUSHBACK_CLEARANCE,
        Face::NegZ => pos.z = block_bb.min.z - PUSHBACK_CLEARANCE,
        Face::PosY => pos.y = block_bb.min.y + 1.0 + ENTITY_ADJUSTMENT,
        Face::NegY => pos.y = block_bb.min.y - size.y - ENTITY_ADJUSTMENT,
    }

    // Standing on the exact map edge gets the player stuck outside; above the map is fine.
    let dims = ctx.world.dimensions().as_vec3();
    let inside_map =
        pos.x > 0.0 && pos.y >= 0.0 && pos.z > 0.0 && pos.x < dims.x && pos.z < dims.z;
    if !inside_map {
        debug!("pushback to {pos} rejected: outside the map");
        return false;
    }

    let player_bb = AABB::from_position_size(pos, size);
    if !ctx.player.hacks().noclip() && touches_solid(&*ctx.world, ctx.blocks, &player_bb) {
        debug!("pushback to {pos} rejected: would be inside a block");
        return false;
    }

    ctx.player.teleport(pos);
    true
}

/// Checks whether `block` can be placed at the selection's placement cell.
pub fn is_free(ctx: &mut InputContext<'_>, block: BlockId) -> bool {
    // Water, flowers and the like can always be placed on players.
    if !ctx.blocks.is_solid(block) {
        return true;
    }

    let pos = ctx.selection.translated_pos.as_vec3();
    if intersects_others(ctx, pos, block) {
        return false;
    }

    let mut next_pos = ctx.player.next_position();
    let block_bb = block_box(ctx.blocks, pos, block);

    // Collision runs against the next position, so test it too or the player
    // falls through the block at their feet.
    let mut player_bb = ctx.player.bounds();
    player_bb.min.y = player_bb.min.y.min(next_pos.y);

    let hacks = ctx.player.hacks();
    if hacks.noclip() || !player_bb.touches(&block_bb) {
        return true;
    }
    if hacks.pushback_placing() {
        return pushback_place(ctx, &block_bb);
    }

    player_bb.min.y += STEP_UP_HEIGHT + ENTITY_ADJUSTMENT;
    if player_bb.touches(&block_bb) {
        return false;
    }

    // Placing under a jumping player lifts them on top of the new block.
    let (_, max_bb) = ctx.blocks.bounds(block);
    next_pos.y = pos.y + max_bb.y + ENTITY_ADJUSTMENT;
    ctx.player.teleport(next_pos);
    true
}
