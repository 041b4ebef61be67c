//! Deterministic session engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by slot / block ID)
//! - No rendering, physics engine, or platform dependencies

pub mod block;
pub mod events;
pub mod layout;
pub mod projectile;
pub mod reflect;
pub mod rotation;
pub mod schedule;
pub mod session;
pub mod tick;
pub mod turret;

pub use block::{BlockId, BreakableBlock, DamageOutcome};
pub use events::{SessionEvent, SessionEventKind};
pub use layout::{ActiveLayout, BlockSpec, LayoutTemplate};
pub use projectile::{Projectile, ProjectileHandle, ProjectilePool};
pub use reflect::{Bounce, bounce, reflect};
pub use rotation::{LayoutRotation, ProgressionMode};
pub use session::{ContactOutcome, GameSession, SessionState, SessionSummary};
pub use tick::{BodyKind, ContactEvent, TickInput, tick};
pub use turret::Turret;
