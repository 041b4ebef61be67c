//! Collision response for bouncing projectiles
//!
//! Pure functions: mirror an incoming heading about a contact normal and
//! express the result as a world orientation. No state.

use glam::Vec2;

use crate::angle_from_up;

/// Outgoing heading and orientation after a bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    /// Unit heading after reflection
    pub heading: Vec2,
    /// Signed angle (radians) from world up to `heading`
    pub angle: f32,
}

/// Mirror `dir` about the surface `normal`: `r = d - 2(d·n)n`
///
/// The result is re-normalized to keep repeated bounces from drifting.
/// A degenerate result (zero-length input) leaves the heading unchanged.
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    let r = dir - 2.0 * dir.dot(normal) * normal;
    let r = r.normalize_or_zero();
    if r == Vec2::ZERO { dir } else { r }
}

/// Bounce off the first reported contact normal
///
/// Returns `None` when the collision carried no contact points; the
/// projectile then keeps its prior heading.
pub fn bounce(heading: Vec2, normals: &[Vec2]) -> Option<Bounce> {
    let normal = normals.first()?.normalize_or_zero();
    if normal == Vec2::ZERO {
        return None;
    }
    let heading = reflect(heading, normal);
    Some(Bounce {
        heading,
        angle: angle_from_up(heading),
    })
}
