//! Structured gameplay events emitted by the session

use std::fmt;

use serde::{Deserialize, Serialize};

use super::block::BlockId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEventKind {
    SessionStarted { layout: String },
    ProjectileFired { projectile: u32 },
    ProjectileHitBlock { projectile: u32, block: BlockId },
    BlockDestroyed { block: BlockId },
    /// Last breakable block destroyed; the ending delay has started
    SessionWon,
    GameOver { projectiles_launched: u32, elapsed: f32 },
}

/// An event stamped with session-clock seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub time: f32,
    pub kind: SessionEventKind,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SessionEventKind::SessionStarted { layout } => write!(f, "Session started on {layout}")?,
            SessionEventKind::ProjectileFired { projectile } => write!(f, "Projectile {projectile} fired")?,
            SessionEventKind::ProjectileHitBlock { projectile, block } => {
                write!(f, "Projectile {projectile} hit block {block}")?
            }
            SessionEventKind::BlockDestroyed { block } => write!(f, "Block {block} destroyed")?,
            SessionEventKind::SessionWon => write!(f, "All blocks destroyed")?,
            SessionEventKind::GameOver {
                projectiles_launched,
                elapsed,
            } => write!(f, "Game over: {projectiles_launched} projectiles in {elapsed:.2}s")?,
        }
        write!(f, " - {:.2}", self.time)
    }
}
