//! Breakable blocks
//!
//! Each block latches `destroyed` the first time its health reaches zero and
//! reports that transition exactly once. Later hits in the same tick are ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_BLOCK_HEALTH, MIN_BLOCK_HEALTH};

/// Block identifier, unique within one instantiated layout
pub type BlockId = u32;

/// What a call to [`BreakableBlock::deal_damage`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible, already destroyed, or no damage dealt
    Ignored,
    /// Health dropped but the block survives
    Damaged { remaining: i32 },
    /// Health reached zero on this call
    Destroyed,
}

/// A destructible (or invincible) obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakableBlock {
    pub id: BlockId,
    /// Box center in world units
    pub center: Vec2,
    /// Half of the box width/height
    pub half_extents: Vec2,
    health: i32,
    invincible: bool,
    destroyed: bool,
}

impl BreakableBlock {
    /// Create a block, clamping health into the valid range
    ///
    /// Out-of-range health is a content problem, not a crash: it is logged and
    /// the clamped value is used.
    pub fn new(id: BlockId, center: Vec2, size: Vec2, health: i32, invincible: bool) -> Self {
        if !health_in_range(health) {
            log::warn!(
                "Block {id}: health {health} outside {MIN_BLOCK_HEALTH}..={MAX_BLOCK_HEALTH}, clamping"
            );
        }
        Self {
            id,
            center,
            half_extents: size * 0.5,
            health: health.clamp(MIN_BLOCK_HEALTH, MAX_BLOCK_HEALTH),
            invincible,
            destroyed: false,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Returns true if this block must be destroyed to win the session
    pub fn counts_for_clear(&self) -> bool {
        !self.invincible
    }

    /// Apply damage and report whether this call destroyed the block
    pub fn deal_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.invincible || self.destroyed || amount <= 0 {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.destroyed = true;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Damaged {
                remaining: self.health,
            }
        }
    }
}

/// True when `health` lies in the configured block health range
pub fn health_in_range(health: i32) -> bool {
    (MIN_BLOCK_HEALTH..=MAX_BLOCK_HEALTH).contains(&health)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block(health: i32, invincible: bool) -> BreakableBlock {
        BreakableBlock::new(7, Vec2::ZERO, Vec2::ONE, health, invincible)
    }

    #[test]
    fn test_damage_then_destroy() {
        let mut b = block(3, false);
        assert_eq!(b.deal_damage(1), DamageOutcome::Damaged { remaining: 2 });
        assert_eq!(b.deal_damage(1), DamageOutcome::Damaged { remaining: 1 });
        assert_eq!(b.deal_damage(1), DamageOutcome::Destroyed);
        assert!(b.is_destroyed());
        assert_eq!(b.health(), 0);
    }

    #[test]
    fn test_overkill_clamps_to_zero() {
        let mut b = block(2, false);
        assert_eq!(b.deal_damage(10), DamageOutcome::Destroyed);
        assert_eq!(b.health(), 0);
    }

    #[test]
    fn test_hits_after_destruction_are_ignored() {
        let mut b = block(1, false);
        assert_eq!(b.deal_damage(1), DamageOutcome::Destroyed);
        assert_eq!(b.deal_damage(1), DamageOutcome::Ignored);
        assert_eq!(b.deal_damage(5), DamageOutcome::Ignored);
        assert!(b.is_destroyed());
    }

    #[test]
    fn test_invincible_ignores_damage() {
        let mut b = block(1, true);
        for _ in 0..10 {
            assert_eq!(b.deal_damage(100), DamageOutcome::Ignored);
        }
        assert!(!b.is_destroyed());
        assert!(!b.counts_for_clear());
    }

    #[test]
    fn test_out_of_range_health_is_clamped() {
        assert_eq!(block(0, false).health(), MIN_BLOCK_HEALTH);
        assert_eq!(block(-4, false).health(), MIN_BLOCK_HEALTH);
        assert_eq!(block(9, false).health(), MAX_BLOCK_HEALTH);
    }

    #[test]
    fn test_non_positive_damage_is_ignored() {
        let mut b = block(2, false);
        assert_eq!(b.deal_damage(0), DamageOutcome::Ignored);
        assert_eq!(b.deal_damage(-3), DamageOutcome::Ignored);
        assert_eq!(b.health(), 2);
    }

    proptest! {
        #[test]
        fn destroyed_exactly_when_damage_reaches_health(
            health in 1i32..=5,
            hits in proptest::collection::vec(1i32..4, 0..20),
        ) {
            let mut b = block(health, false);
            let mut dealt = 0;
            let mut destroyed_reports = 0;
            for hit in hits {
                let was_destroyed = dealt >= health;
                dealt += hit;
                if b.deal_damage(hit) == DamageOutcome::Destroyed {
                    destroyed_reports += 1;
                    prop_assert!(!was_destroyed);
                }
                prop_assert_eq!(b.is_destroyed(), dealt >= health);
            }
            prop_assert_eq!(destroyed_reports, if b.is_destroyed() { 1 } else { 0 });
        }

        #[test]
        fn invincible_never_destroyed(
            health in 1i32..=5,
            hits in proptest::collection::vec(0i32..100, 0..30),
        ) {
            let mut b = block(health, true);
            for hit in hits {
                prop_assert_eq!(b.deal_damage(hit), DamageOutcome::Ignored);
            }
            prop_assert!(!b.is_destroyed());
            prop_assert_eq!(b.health(), health);
        }
    }
}
