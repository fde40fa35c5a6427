use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::Face;

#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Pod,
    Zeroable,
)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: Self = Self(0);
    pub const STONE: Self = Self(1);
    pub const GRASS: Self = Self(2);
    pub const DIRT: Self = Self(3);
    pub const COBBLESTONE: Self = Self(4);
    pub const PLANKS: Self = Self(5);
    pub const SAPLING: Self = Self(6);
    pub const BEDROCK: Self = Self(7);
    pub const WATER: Self = Self(8);
    pub const LAVA: Self = Self(9);
    pub const SAND: Self = Self(10);
    pub const GLASS: Self = Self(11);
    pub const DANDELION: Self = Self(12);
    pub const SLAB_DOWN: Self = Self(13);
    pub const SLAB_UP: Self = Self(14);
    pub const LOG_UD: Self = Self(15);
    pub const LOG_WE: Self = Self(16);
    pub const LOG_NS: Self = Self(17);
    pub const STAIRS_N: Self = Self(18);
    pub const STAIRS_E: Self = Self(19);
    pub const STAIRS_S: Self = Self(20);
    pub const STAIRS_W: Self = Self(21);
}

/// How the collision pass treats a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollideType {
    Gas,
    Liquid,
    Solid,
}

/// How the renderer draws a block. `Gas` renders as nothing and doubles as "empty".
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawType {
    Opaque,
    Transparent,
    Translucent,
    Gas,
    Sprite,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockProperties {
    pub name: String,
    pub collide: CollideType,
    pub draw: DrawType,
    #[serde(default = "default_true")]
    pub can_place: bool,
    #[serde(default = "default_true")]
    pub can_delete: bool,
    #[serde(default = "default_min_bb")]
    pub min_bb: Vec3,
    #[serde(default = "default_max_bb")]
    pub max_bb: Vec3,
}

fn default_true() -> bool {
    true
}

fn default_min_bb() -> Vec3 {
    Vec3::ZERO
}

fn default_max_bb() -> Vec3 {
    Vec3::ONE
}

/// Where the player is aiming when a directional block gets placed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementAim {
    /// Degrees clockwise from north (-Z), so east (+X) is 90.
    pub heading: f32,
    pub face: Face,
    /// Height of the hit point above the placement cell's floor.
    pub height_in_cell: f32,
}

#[derive(Default, Debug, Clone)]
pub struct BlockRegistry {
    properties: Vec<BlockProperties>,
    by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn register(&mut self, props: BlockProperties) -> BlockId {
        if let Some(existing) = self.by_name.get(props.name.as_str()) {
            return *existing;
        }

        let next_index = self.properties.len();
        let id = BlockId(
            u16::try_from(next_index).expect("block registry exceeded BlockId capacity (u16::MAX)"),
        );

        self.by_name.insert(props.name.clone(), id);
        self.properties.push(props);
        id
    }

    pub fn get_properties(&self, id: BlockId) -> &BlockProperties {
        self.properties
            .get(id.0 as usize)
            .or_else(|| self.properties.get(BlockId::AIR.0 as usize))
            .expect("block registry is empty; call register_default_blocks() first")
    }

    pub fn get_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn is_gas(&self, id: BlockId) -> bool {
        self.get_properties(id).draw == DrawType::Gas
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get_properties(id).collide == CollideType::Solid
    }

    pub fn can_place(&self, id: BlockId) -> bool {
        self.get_properties(id).can_place
    }

    pub fn can_delete(&self, id: BlockId) -> bool {
        self.get_properties(id).can_delete
    }

    /// Whether the block under the crosshair can be interacted with directly.
    /// Liquids only count when the player has made them breakable.
    pub fn can_pick(&self, id: BlockId, breakable_liquids: bool) -> bool {
        let props = self.get_properties(id);
        match props.draw {
            DrawType::Gas => false,
            DrawType::Sprite => true,
            _ => props.collide != CollideType::Liquid || breakable_liquids,
        }
    }

    pub fn bounds(&self, id: BlockId) -> (Vec3, Vec3) {
        let props = self.get_properties(id);
        (props.min_bb, props.max_bb)
    }

    /// Swaps a directional block for the variant facing the way the player aims.
    ///
    /// Variants are found by name suffix: `-N/-E/-S/-W` follow the player's heading,
    /// `-UD/-WE/-NS` follow the axis of the clicked face, and `-U/-D` follow which
    /// half of the cell was clicked. Blocks without a known suffix, or whose sibling
    /// variant isn't registered, come back unchanged.
    pub fn auto_rotate(&self, block: BlockId, aim: PlacementAim) -> BlockId {
        let name = self.get_properties(block).name.as_str();
        let Some(split) = name.rfind('-') else {
            return block;
        };
        let (base, suffix) = name.split_at(split);

        let wanted = match suffix.to_ascii_uppercase().as_str() {
            "-U" | "-D" => {
                if aim.height_in_cell >= 0.5 {
                    "-U"
                } else {
                    "-D"
                }
            }
            "-N" | "-E" | "-S" | "-W" => heading_suffix(aim.heading),
            "-UD" | "-WE" | "-NS" => match aim.face {
                Face::PosY | Face::NegY => "-UD",
                Face::PosX | Face::NegX => "-WE",
                Face::PosZ | Face::NegZ => "-NS",
            },
            _ => return block,
        };

        self.get_by_name(&format!("{base}{wanted}"))
            .unwrap_or(block)
    }
}

fn heading_suffix(heading: f32) -> &'static str {
    let heading = heading.rem_euclid(360.0);
    if (45.0..135.0).contains(&heading) {
        "-E"
    } else if (135.0..225.0).contains(&heading) {
        "-S"
    } else if (225.0..315.0).contains(&heading) {
        "-W"
    } else {
        "-N"
    }
}

pub fn register_default_blocks() -> BlockRegistry {
    fn block(name: &str, collide: CollideType, draw: DrawType) -> BlockProperties {
        shaped(name, collide, draw, Vec3::ZERO, Vec3::ONE)
    }

    fn shaped(
        name: &str,
        collide: CollideType,
        draw: DrawType,
        min_bb: Vec3,
        max_bb: Vec3,
    ) -> BlockProperties {
        BlockProperties {
            name: name.to_string(),
            collide,
            draw,
            can_place: true,
            can_delete: true,
            min_bb,
            max_bb,
        }
    }

    use CollideType::{Gas, Liquid, Solid};

    let mut registry = BlockRegistry::new();

    let half = Vec3::new(1.0, 0.5, 1.0);
    let defaults = [
        block("air", Gas, DrawType::Gas),
        block("stone", Solid, DrawType::Opaque),
        block("grass", Solid, DrawType::Opaque),
        block("dirt", Solid, DrawType::Opaque),
        block("cobblestone", Solid, DrawType::Opaque),
        block("planks", Solid, DrawType::Opaque),
        shaped("sapling", Gas, DrawType::Sprite, Vec3::ZERO, Vec3::new(1.0, 0.8, 1.0)),
        BlockProperties {
            can_place: false,
            can_delete: false,
            ..block("bedrock", Solid, DrawType::Opaque)
        },
        block("water", Liquid, DrawType::Translucent),
        block("lava", Liquid, DrawType::Transparent),
        block("sand", Solid, DrawType::Opaque),
        block("glass", Solid, DrawType::Transparent),
        shaped("dandelion", Gas, DrawType::Sprite, Vec3::ZERO, Vec3::new(1.0, 0.6, 1.0)),
        shaped("slab-D", Solid, DrawType::Opaque, Vec3::ZERO, half),
        shaped("slab-U", Solid, DrawType::Opaque, Vec3::new(0.0, 0.5, 0.0), Vec3::ONE),
        block("log-UD", Solid, DrawType::Opaque),
        block("log-WE", Solid, DrawType::Opaque),
        block("log-NS", Solid, DrawType::Opaque),
        block("stairs-N", Solid, DrawType::Opaque),
        block("stairs-E", Solid, DrawType::Opaque),
        block("stairs-S", Solid, DrawType::Opaque),
        block("stairs-W", Solid, DrawType::Opaque),
    ];

    for props in defaults {
        registry.register(props);
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::{register_default_blocks, BlockId, CollideType, DrawType, PlacementAim};
    use crate::physics::Face;

    fn aim(heading: f32, face: Face, height_in_cell: f32) -> PlacementAim {
        PlacementAim {
            heading,
            face,
            height_in_cell,
        }
    }

    #[test]
    fn registry_ids_match_named_constants() {
        let registry = register_default_blocks();

        assert_eq!(registry.get_by_name("air"), Some(BlockId::AIR));
        assert_eq!(registry.get_by_name("stone"), Some(BlockId::STONE));
        assert_eq!(registry.get_by_name("water"), Some(BlockId::WATER));
        assert_eq!(registry.get_by_name("slab-D"), Some(BlockId::SLAB_DOWN));
        assert_eq!(registry.get_by_name("log-NS"), Some(BlockId::LOG_NS));
        assert_eq!(registry.get_by_name("stairs-W"), Some(BlockId::STAIRS_W));

        let air = registry.get_properties(BlockId::AIR);
        assert_eq!(air.collide, CollideType::Gas);
        assert_eq!(air.draw, DrawType::Gas);
    }

    #[test]
    fn pick_rules_follow_draw_and_collide_types() {
        let registry = register_default_blocks();

        assert!(!registry.can_pick(BlockId::AIR, true));
        assert!(registry.can_pick(BlockId::DANDELION, false));
        assert!(registry.can_pick(BlockId::STONE, false));
        assert!(!registry.can_pick(BlockId::WATER, false));
        assert!(registry.can_pick(BlockId::WATER, true));
    }

    #[test]
    fn unknown_ids_fall_back_to_air_properties() {
        let registry = register_default_blocks();
        assert_eq!(registry.get_properties(BlockId(9000)).name, "air");
        assert!(registry.is_gas(BlockId(9000)));
    }

    #[test]
    fn stairs_rotate_to_player_heading() {
        let registry = register_default_blocks();

        let rotated = |heading| registry.auto_rotate(BlockId::STAIRS_N, aim(heading, Face::PosY, 0.0));
        assert_eq!(rotated(0.0), BlockId::STAIRS_N);
        assert_eq!(rotated(90.0), BlockId::STAIRS_E);
        assert_eq!(rotated(180.0), BlockId::STAIRS_S);
        assert_eq!(rotated(270.0), BlockId::STAIRS_W);
        assert_eq!(rotated(-30.0), BlockId::STAIRS_N);
        assert_eq!(rotated(-90.0), BlockId::STAIRS_W);
    }

    #[test]
    fn logs_rotate_to_clicked_face_axis() {
        let registry = register_default_blocks();

        assert_eq!(
            registry.auto_rotate(BlockId::LOG_UD, aim(0.0, Face::PosX, 0.3)),
            BlockId::LOG_WE
        );
        assert_eq!(
            registry.auto_rotate(BlockId::LOG_UD, aim(0.0, Face::NegZ, 0.3)),
            BlockId::LOG_NS
        );
        assert_eq!(
            registry.auto_rotate(BlockId::LOG_WE, aim(0.0, Face::PosY, 0.0)),
            BlockId::LOG_UD
        );
    }

    #[test]
    fn slabs_rotate_to_clicked_half() {
        let registry = register_default_blocks();

        assert_eq!(
            registry.auto_rotate(BlockId::SLAB_DOWN, aim(0.0, Face::PosX, 0.75)),
            BlockId::SLAB_UP
        );
        assert_eq!(
            registry.auto_rotate(BlockId::SLAB_UP, aim(0.0, Face::PosX, 0.25)),
            BlockId::SLAB_DOWN
        );
    }

    #[test]
    fn non_directional_blocks_are_not_rotated() {
        let registry = register_default_blocks();
        assert_eq!(
            registry.auto_rotate(BlockId::STONE, aim(90.0, Face::PosX, 0.9)),
            BlockId::STONE
        );
    }
}
