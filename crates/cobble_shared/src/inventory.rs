use serde::{Deserialize, Serialize};

use crate::block::BlockId;

pub const BLOCKS_PER_HOTBAR: usize = 9;
pub const HOTBAR_PAGES: usize = 9;

const DEFAULT_HOTBAR: [BlockId; BLOCKS_PER_HOTBAR] = [
    BlockId::STONE,
    BlockId::COBBLESTONE,
    BlockId::DIRT,
    BlockId::PLANKS,
    BlockId::LOG_UD,
    BlockId::GLASS,
    BlockId::SAND,
    BlockId::SLAB_DOWN,
    BlockId::STAIRS_N,
];

/// Paged block hotbar. Only the active page is visible to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<BlockId>,
    selected_index: usize,
    page: usize,
    /// Servers may lock the held block.
    pub can_change_selected: bool,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
    pub fn new() -> Self {
        let mut slots = vec![BlockId::AIR; BLOCKS_PER_HOTBAR * HOTBAR_PAGES];
        slots[..BLOCKS_PER_HOTBAR].copy_from_slice(&DEFAULT_HOTBAR);
        Self {
            slots,
            selected_index: 0,
            page: 0,
            can_change_selected: true,
        }
    }

    fn offset(&self) -> usize {
        self.page * BLOCKS_PER_HOTBAR
    }

    /// Block in slot `idx` of the active page.
    pub fn get(&self, idx: usize) -> BlockId {
        self.slots
            .get(self.offset() + idx % BLOCKS_PER_HOTBAR)
            .copied()
            .unwrap_or(BlockId::AIR)
    }

    pub fn set(&mut self, idx: usize, block: BlockId) {
        let slot = self.offset() + idx % BLOCKS_PER_HOTBAR;
        self.slots[slot] = block;
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn selected_block(&self) -> BlockId {
        self.get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, idx: usize) {
        self.selected_index = idx % BLOCKS_PER_HOTBAR;
    }

    pub fn set_selected_block(&mut self, block: BlockId) {
        self.set(self.selected_index, block);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page % HOTBAR_PAGES;
    }

    /// Moves the selection `steps` slots toward the start of the hotbar, wrapping.
    pub fn scroll_selected(&mut self, steps: i32) {
        let index = (self.selected_index as i32 - steps).rem_euclid(BLOCKS_PER_HOTBAR as i32);
        self.selected_index = index as usize;
    }

    /// Moves the visible page `steps` pages back, wrapping.
    pub fn scroll_page(&mut self, steps: i32) {
        let page = (self.page as i32 - steps).rem_euclid(HOTBAR_PAGES as i32);
        self.page = page as usize;
    }

    pub fn find_in_hotbar(&self, block: BlockId) -> Option<usize> {
        (0..BLOCKS_PER_HOTBAR).find(|&idx| self.get(idx) == block)
    }

    /// Makes `block` the held block, preferring to reuse what's already on the hotbar.
    ///
    /// Order: select an existing slot holding it, then fill the selected slot if
    /// it is empty, then fill the first empty slot and select it, then overwrite
    /// the selected slot. Returns false when the selection is locked or already
    /// holds `block`.
    pub fn pick_block(&mut self, block: BlockId) -> bool {
        if !self.can_change_selected || self.selected_block() == block {
            return false;
        }

        if let Some(idx) = self.find_in_hotbar(block) {
            self.set_selected_index(idx);
            return true;
        }

        if self.selected_block() != BlockId::AIR {
            if let Some(idx) = self.find_in_hotbar(BlockId::AIR) {
                self.set_selected_index(idx);
            }
        }
        self.set_selected_block(block);
        true
    }
}
