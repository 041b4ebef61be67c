//! Fixed timestep simulation tick
//!
//! One call advances the session deterministically: requests, aim, firing,
//! collision contacts reported by physics, projectile integration, then any
//! scheduled actions that came due.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockId;
use super::projectile::ProjectileHandle;
use super::session::GameSession;

/// What a projectile touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Wall,
    Block(BlockId),
}

/// A collision reported by the physics collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub projectile: ProjectileHandle,
    pub other: BodyKind,
    /// Contact normals (pointing away from the surface), first contact first
    pub normals: Vec<Vec2>,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave the title screen
    pub start: bool,
    /// Leave the game-over screen for the next layout
    pub continue_game: bool,
    /// Pointer position in world space
    pub pointer: Option<Vec2>,
    /// Fire button pressed this tick
    pub fire: bool,
    /// Contacts from the last physics step
    pub contacts: Vec<ContactEvent>,
}

/// Advance the session by one fixed timestep
///
/// Events emitted during the tick stay queued until the host calls
/// [`GameSession::take_events`]; the queue is cleared on every session start.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    if input.start {
        session.request_start();
    }
    if input.continue_game {
        session.request_continue();
    }

    if let Some(pointer) = input.pointer {
        session.set_pointer(pointer);
    }
    if input.fire {
        session.fire();
    }

    for contact in &input.contacts {
        session.handle_contact(contact);
    }

    session.step(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::consts::SIM_DT;
    use crate::sim::session::SessionState;

    fn session() -> GameSession {
        GameSession::new(SessionConfig {
            seed: Some(5),
            ..Default::default()
        })
    }

    #[test]
    fn test_tick_title_to_playing() {
        let mut s = session();
        tick(&mut s, &TickInput::default(), SIM_DT);
        assert_eq!(s.current_state(), SessionState::Title);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut s, &input, SIM_DT);
        assert_eq!(s.current_state(), SessionState::Playing);
        assert!((s.elapsed_time() - SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_tick_fire_and_move() {
        let mut s = session();
        tick(
            &mut s,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );

        let input = TickInput {
            pointer: Some(Vec2::new(0.0, 4.0)),
            fire: true,
            ..Default::default()
        };
        tick(&mut s, &input, SIM_DT);
        assert_eq!(s.projectiles_launched(), 1);

        let (_, p) = s.pool().iter_active().next().unwrap();
        let expected = s.layout().unwrap().turret.muzzle(s.config().projectile.spawn_offset)
            + Vec2::Y * s.config().projectile.move_speed * SIM_DT;
        assert!((p.pos - expected).length() < 1e-4);
    }

    #[test]
    fn test_tick_contacts_bounce_before_moving() {
        let mut s = session();
        s.request_start();
        let h = s.launch_projectile(Vec2::ZERO, Vec2::Y).unwrap();

        let input = TickInput {
            contacts: vec![ContactEvent {
                projectile: h,
                other: BodyKind::Wall,
                normals: vec![Vec2::NEG_Y],
            }],
            ..Default::default()
        };
        tick(&mut s, &input, SIM_DT);

        let p = s.pool().get(h).unwrap();
        assert!((p.heading - Vec2::NEG_Y).length() < 1e-6);
        assert!(p.pos.y < 0.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameSession::new(SessionConfig {
            seed: Some(99),
            progression: crate::sim::ProgressionMode::Shuffled,
            ..Default::default()
        });
        let mut b = GameSession::new(a.config().clone());

        let inputs = [
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                pointer: Some(Vec2::new(1.0, 2.0)),
                fire: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                pointer: Some(Vec2::new(-3.0, 1.0)),
                fire: true,
                ..Default::default()
            },
        ];

        for input in &inputs {
            tick(&mut a, input, SIM_DT);
            tick(&mut b, input, SIM_DT);
        }

        assert_eq!(a.layout().unwrap().catalog_index, b.layout().unwrap().catalog_index);
        let pa: Vec<_> = a.pool().iter_active().map(|(_, p)| p.pos).collect();
        let pb: Vec<_> = b.pool().iter_active().map(|(_, p)| p.pos).collect();
        assert_eq!(pa, pb);
    }
}
