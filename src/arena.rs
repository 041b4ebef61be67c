//! Reference contact source
//!
//! A tiny stand-in for a physics engine: rectangular arena walls and
//! axis-aligned block boxes tested against circular projectiles. It produces
//! [`ContactEvent`]s for the session the same way a real physics backend
//! would report collision callbacks.

use glam::Vec2;

use crate::sim::{ActiveLayout, BodyKind, ContactEvent, ProjectilePool};

/// Result of a circle-vs-shape test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Surface normal at the contact (pointing away from the surface)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

/// Axis-aligned rectangular play field centered on the origin
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub half_size: Vec2,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            half_size: Vec2::new(8.0, 5.0),
        }
    }
}

impl Arena {
    pub fn new(half_size: Vec2) -> Self {
        Self { half_size }
    }

    /// Wall contact for a circle, if it touches a wall it is moving toward
    pub fn wall_collision(&self, pos: Vec2, radius: f32, heading: Vec2) -> Option<CollisionResult> {
        let walls = [
            (Vec2::NEG_X, pos.x + radius - self.half_size.x),
            (Vec2::X, -self.half_size.x - (pos.x - radius)),
            (Vec2::NEG_Y, pos.y + radius - self.half_size.y),
            (Vec2::Y, -self.half_size.y - (pos.y - radius)),
        ];
        walls
            .into_iter()
            .filter(|&(normal, penetration)| penetration > 0.0 && heading.dot(normal) < 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(normal, penetration)| CollisionResult { normal, penetration })
    }

    /// Collect contacts for every active projectile against walls and live blocks
    pub fn contacts(&self, pool: &ProjectilePool, layout: &ActiveLayout, radius: f32) -> Vec<ContactEvent> {
        let mut contacts = Vec::new();
        for (handle, p) in pool.iter_active() {
            let block_hit = layout
                .live_blocks()
                .find_map(|b| {
                    circle_box_collision(p.pos, radius, b.center, b.half_extents)
                        .filter(|hit| p.heading.dot(hit.normal) < 0.0)
                        .map(|hit| (b.id, hit))
                });

            if let Some((id, hit)) = block_hit {
                contacts.push(ContactEvent {
                    projectile: handle,
                    other: BodyKind::Block(id),
                    normals: vec![hit.normal],
                });
            } else if let Some(hit) = self.wall_collision(p.pos, radius, p.heading) {
                contacts.push(ContactEvent {
                    projectile: handle,
                    other: BodyKind::Wall,
                    normals: vec![hit.normal],
                });
            }
        }
        contacts
    }
}

/// Circle vs axis-aligned box
pub fn circle_box_collision(pos: Vec2, radius: f32, center: Vec2, half_extents: Vec2) -> Option<CollisionResult> {
    let local = pos - center;
    let closest = local.clamp(-half_extents, half_extents);
    let delta = local - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some(CollisionResult {
            normal: delta / dist,
            penetration: radius - dist,
        });
    }

    // Center inside the box: push out along the shallowest axis
    let depth = half_extents - local.abs();
    let normal = if depth.x < depth.y {
        Vec2::new(local.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, local.y.signum())
    };
    Some(CollisionResult {
        normal,
        penetration: depth.x.min(depth.y) + radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::consts::SIM_DT;
    use crate::sim::{GameSession, SessionState, TickInput, tick};

    #[test]
    fn test_circle_box_side_hit() {
        let hit = circle_box_collision(Vec2::new(0.0, -0.6), 0.2, Vec2::ZERO, Vec2::new(1.0, 0.5)).unwrap();
        assert_eq!(hit.normal, Vec2::NEG_Y);
        assert!((hit.penetration - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_circle_box_miss() {
        assert!(circle_box_collision(Vec2::new(0.0, -1.0), 0.2, Vec2::ZERO, Vec2::new(1.0, 0.5)).is_none());
    }

    #[test]
    fn test_wall_only_when_moving_outward() {
        let arena = Arena::default();
        let edge = Vec2::new(7.95, 0.0);
        let hit = arena.wall_collision(edge, 0.1, Vec2::X).unwrap();
        assert_eq!(hit.normal, Vec2::NEG_X);
        assert!(arena.wall_collision(edge, 0.1, Vec2::NEG_X).is_none());
    }

    /// Full loop: aim at each block in turn until the layout is cleared
    #[test]
    fn test_autoplay_clears_default_layout() {
        let config = SessionConfig {
            seed: Some(3),
            ..Default::default()
        };
        let radius = config.projectile.radius;
        let mut session = GameSession::new(config);
        let arena = Arena::default();

        tick(&mut session, &TickInput { start: true, ..Default::default() }, SIM_DT);

        for step in 0..20_000 {
            if session.current_state() != SessionState::Playing {
                break;
            }
            let layout = session.layout().unwrap();
            let target = layout
                .live_blocks()
                .find(|b| !b.is_invincible())
                .map(|b| b.center);
            let contacts = arena.contacts(session.pool(), layout, radius);
            let input = TickInput {
                pointer: target,
                fire: step % 10 == 0,
                contacts,
                ..Default::default()
            };
            tick(&mut session, &input, SIM_DT);
        }

        assert_eq!(session.current_state(), SessionState::Ending);
        assert_eq!(session.remaining_breakable_count(), 0);
    }
}
