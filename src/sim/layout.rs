//! Layout templates and their instantiated form
//!
//! A template is immutable catalog data. Instantiating one builds the blocks
//! and the turret for a single session and records, up front, which blocks
//! must be destroyed to win.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::{BlockId, BreakableBlock, DamageOutcome};
use super::turret::Turret;

/// One block in a layout template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub center: Vec2,
    pub size: Vec2,
    pub health: i32,
    #[serde(default)]
    pub invincible: bool,
}

impl BlockSpec {
    pub fn new(center: Vec2, size: Vec2, health: i32) -> Self {
        Self {
            center,
            size,
            health,
            invincible: false,
        }
    }

    pub fn invincible(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            health: 1,
            invincible: true,
        }
    }
}

/// A playable arrangement of blocks plus a turret spawn point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    pub name: String,
    pub turret_spawn: Vec2,
    pub blocks: Vec<BlockSpec>,
}

impl LayoutTemplate {
    /// Number of blocks that count toward clearing the layout
    pub fn breakable_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.invincible).count()
    }
}

/// A layout instantiated for one session
#[derive(Debug, Clone)]
pub struct ActiveLayout {
    /// Catalog index the layout came from
    pub catalog_index: usize,
    pub name: String,
    /// Session generation that owns this instance
    pub generation: u64,
    pub turret: Turret,
    blocks: Vec<BreakableBlock>,
    breakable_ids: Vec<BlockId>,
}

impl ActiveLayout {
    pub fn instantiate(catalog_index: usize, template: &LayoutTemplate, generation: u64) -> Self {
        let blocks: Vec<BreakableBlock> = template
            .blocks
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                BreakableBlock::new(i as BlockId, spec.center, spec.size, spec.health, spec.invincible)
            })
            .collect();
        let breakable_ids = blocks
            .iter()
            .filter(|b| b.counts_for_clear())
            .map(|b| b.id)
            .collect();

        Self {
            catalog_index,
            name: template.name.clone(),
            generation,
            turret: Turret::new(template.turret_spawn),
            blocks,
            breakable_ids,
        }
    }

    /// Breakable (non-invincible) block count at instantiation
    pub fn breakable_count(&self) -> usize {
        self.breakable_ids.len()
    }

    pub fn breakable_ids(&self) -> &[BlockId] {
        &self.breakable_ids
    }

    pub fn is_breakable(&self, id: BlockId) -> bool {
        self.breakable_ids.contains(&id)
    }

    /// All blocks, including destroyed ones
    pub fn blocks(&self) -> &[BreakableBlock] {
        &self.blocks
    }

    /// Blocks still taking part in the simulation
    pub fn live_blocks(&self) -> impl Iterator<Item = &BreakableBlock> {
        self.blocks.iter().filter(|b| !b.is_destroyed())
    }

    pub fn block(&self, id: BlockId) -> Option<&BreakableBlock> {
        self.blocks.get(id as usize)
    }

    /// Damage a block; unknown ids are ignored
    pub fn deal_damage(&mut self, id: BlockId, amount: i32) -> DamageOutcome {
        match self.blocks.get_mut(id as usize) {
            Some(block) => block.deal_damage(amount),
            None => DamageOutcome::Ignored,
        }
    }
}
