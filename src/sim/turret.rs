//! The stationary player turret

use glam::Vec2;

use crate::angle_from_up;

/// Turret fixed at the layout's spawn point, aiming at the pointer
#[derive(Debug, Clone)]
pub struct Turret {
    pub position: Vec2,
    /// Unit aim direction
    heading: Vec2,
    /// Last pointer position in world space
    pointer: Option<Vec2>,
}

impl Turret {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            heading: Vec2::Y,
            pointer: None,
        }
    }

    /// Track a pointer position; a pointer sitting on the turret keeps the old aim
    pub fn aim_at(&mut self, pointer: Vec2) {
        self.pointer = Some(pointer);
        if let Some(dir) = (pointer - self.position).try_normalize() {
            self.heading = dir;
        }
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Aim angle from world up, for orienting the sprite
    pub fn angle(&self) -> f32 {
        angle_from_up(self.heading)
    }

    /// Where a projectile leaves the barrel
    pub fn muzzle(&self, offset: f32) -> Vec2 {
        self.position + self.heading * offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_follows_pointer() {
        let mut t = Turret::new(Vec2::new(0.0, -4.0));
        assert_eq!(t.heading(), Vec2::Y);

        t.aim_at(Vec2::new(3.0, -4.0));
        assert!((t.heading() - Vec2::X).length() < 1e-6);
        assert!((t.muzzle(0.5) - Vec2::new(0.5, -4.0)).length() < 1e-6);
    }

    #[test]
    fn test_pointer_on_turret_keeps_aim() {
        let mut t = Turret::new(Vec2::ZERO);
        t.aim_at(Vec2::new(-1.0, 0.0));
        t.aim_at(Vec2::ZERO);
        assert!((t.heading() - Vec2::NEG_X).length() < 1e-6);
        assert_eq!(t.pointer(), Some(Vec2::ZERO));
    }
}
