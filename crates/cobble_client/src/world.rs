use cobble_input::context::World;
use cobble_shared::block::BlockId;
use glam::IVec3;

/// Largest world the client will allocate, in blocks.
pub const MAX_BLOCKS: usize = 1 << 28;
pub const DEFAULT_WORLD_SIZE: IVec3 = IVec3::new(128, 64, 128);

/// Number of blocks in a world of `size`, if it is non-empty and fits in memory.
fn volume(size: IVec3) -> Option<usize> {
    let width = usize::try_from(size.x).ok()?;
    let height = usize::try_from(size.y).ok()?;
    let length = usize::try_from(size.z).ok()?;
    width
        .checked_mul(height)?
        .checked_mul(length)
        .filter(|&blocks| blocks > 0 && blocks <= MAX_BLOCKS)
}

/// Whole world held in memory, indexed `(y * length + z) * width + x`.
pub struct ClientWorld {
    size: IVec3,
    blocks: Vec<BlockId>,
}

impl Default for ClientWorld {
    /// Flat world for playing without a server.
    fn default() -> Self {
        let volume = (DEFAULT_WORLD_SIZE.x * DEFAULT_WORLD_SIZE.y * DEFAULT_WORLD_SIZE.z) as usize;
        let mut world = Self {
            size: DEFAULT_WORLD_SIZE,
            blocks: vec![BlockId::AIR; volume],
        };
        world.fill_flat(DEFAULT_WORLD_SIZE.y / 2);
        world
    }
}

impl ClientWorld {
    /// Empty world, or `None` for sizes that are empty or too large to hold.
    pub fn new(size: IVec3) -> Option<Self> {
        let volume = volume(size)?;
        Some(Self {
            size,
            blocks: vec![BlockId::AIR; volume],
        })
    }

    /// Bedrock floor, stone, then dirt capped with grass below `ground_height`.
    pub fn fill_flat(&mut self, ground_height: i32) {
        let ground = ground_height.clamp(1, self.size.y);

        for y in 0..ground {
            let block = if y == 0 {
                BlockId::BEDROCK
            } else if y == ground - 1 {
                BlockId::GRASS
            } else if y >= ground - 4 {
                BlockId::DIRT
            } else {
                BlockId::STONE
            };
            for z in 0..self.size.z {
                for x in 0..self.size.x {
                    self.set_block(IVec3::new(x, y, z), block);
                }
            }
        }
    }

    fn index(&self, pos: IVec3) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(((pos.y * self.size.z + pos.z) * self.size.x + pos.x) as usize)
    }

    /// Top solid surface at a column, used for spawning.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        (0..self.size.y)
            .rev()
            .find(|&y| self.block(IVec3::new(x, y, z)) != BlockId::AIR)
            .map_or(0, |y| y + 1)
    }
}

impl World for ClientWorld {
    fn dimensions(&self) -> IVec3 {
        self.size
    }

    fn block(&self, pos: IVec3) -> BlockId {
        self.index(pos)
            .and_then(|idx| self.blocks.get(idx).copied())
            .unwrap_or(BlockId::AIR)
    }

    fn set_block(&mut self, pos: IVec3, block: BlockId) {
        if let Some(idx) = self.index(pos) {
            self.blocks[idx] = block;
        }
    }
}
