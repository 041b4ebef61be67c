//! Projectiles and their object pool
//!
//! Projectiles are never created or destroyed during play. The pool hands out
//! inactive slots, grows by one when every slot is busy, and takes slots back
//! on expiry or session teardown.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::reflect::{Bounce, bounce};
use crate::angle_from_up;
use crate::config::ProjectileTuning;

/// Stable reference to a pooled projectile
///
/// The generation changes every time the slot is handed out again, so a
/// handle kept past its projectile's release can never touch the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileHandle {
    index: u32,
    generation: u32,
}

impl ProjectileHandle {
    /// Slot index inside the pool (also used as a display name)
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// A pooled projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Unit forward direction
    pub heading: Vec2,
    pub move_speed: f32,
    /// Seconds before the projectile returns to the pool
    pub lifetime: f32,
    pub time_alive: f32,
    pub damage: i32,
    active: bool,
    generation: u32,
}

impl Projectile {
    fn new(tuning: &ProjectileTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            heading: Vec2::Y,
            move_speed: tuning.move_speed,
            lifetime: tuning.lifetime,
            time_alive: 0.0,
            damage: tuning.damage,
            active: false,
            generation: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// World orientation as a signed angle from up
    pub fn angle(&self) -> f32 {
        angle_from_up(self.heading)
    }
}

/// Grow-on-demand projectile pool
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    projectiles: Vec<Projectile>,
    tuning: ProjectileTuning,
    capacity: usize,
}

impl ProjectilePool {
    /// Pre-populate `capacity` inactive projectiles
    pub fn new(capacity: usize, tuning: ProjectileTuning) -> Self {
        let projectiles = (0..capacity).map(|_| Projectile::new(&tuning)).collect();
        Self {
            projectiles,
            tuning,
            capacity,
        }
    }

    /// Configured capacity (the pool may have grown past it)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total pooled projectiles, active or not
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.projectiles.iter().filter(|p| p.active).count()
    }

    pub fn inactive_count(&self) -> usize {
        self.len() - self.active_count()
    }

    /// Hand out the first inactive projectile, activated with a fresh timer
    ///
    /// When every slot is busy the pool grows by exactly one.
    pub fn acquire(&mut self) -> ProjectileHandle {
        let index = match self.projectiles.iter().position(|p| !p.active) {
            Some(i) => i,
            None => {
                log::warn!(
                    "Projectile pool exhausted ({} in use, capacity {}), growing by one",
                    self.projectiles.len(),
                    self.capacity
                );
                self.projectiles.push(Projectile::new(&self.tuning));
                self.projectiles.len() - 1
            }
        };

        let p = &mut self.projectiles[index];
        p.generation = p.generation.wrapping_add(1);
        p.time_alive = 0.0;
        p.active = true;
        p.move_speed = self.tuning.move_speed;
        p.lifetime = self.tuning.lifetime;
        p.damage = self.tuning.damage;

        ProjectileHandle {
            index: index as u32,
            generation: p.generation,
        }
    }

    /// Acquire a projectile and place it at `origin` facing `heading`
    pub fn launch(&mut self, origin: Vec2, heading: Vec2) -> ProjectileHandle {
        let handle = self.acquire();
        let p = &mut self.projectiles[handle.index as usize];
        p.pos = origin;
        p.heading = heading.try_normalize().unwrap_or(Vec2::Y);
        handle
    }

    /// Return a projectile to the pool (no-op if already inactive or stale)
    pub fn release(&mut self, handle: ProjectileHandle) {
        if let Some(p) = self.slot_mut(handle) {
            p.active = false;
            p.time_alive = 0.0;
        }
    }

    /// Release every pooled projectile
    pub fn deactivate_all(&mut self) {
        for p in &mut self.projectiles {
            p.active = false;
            p.time_alive = 0.0;
        }
    }

    /// Active projectile behind `handle`
    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.projectiles
            .get(handle.index as usize)
            .filter(|p| p.active && p.generation == handle.generation)
    }

    /// Mutable access for the physics collaborator (position/velocity writes)
    pub fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        self.slot_mut(handle)
    }

    fn slot_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        self.projectiles
            .get_mut(handle.index as usize)
            .filter(|p| p.active && p.generation == handle.generation)
    }

    /// Active projectiles in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (ProjectileHandle, &Projectile)> {
        self.projectiles
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .map(|(i, p)| {
                (
                    ProjectileHandle {
                        index: i as u32,
                        generation: p.generation,
                    },
                    p,
                )
            })
    }

    /// Reflect an active projectile off the first contact normal
    pub fn apply_bounce(&mut self, handle: ProjectileHandle, normals: &[Vec2]) -> Option<Bounce> {
        let p = self.slot_mut(handle)?;
        let b = bounce(p.heading, normals)?;
        p.heading = b.heading;
        Some(b)
    }

    /// Advance every active projectile by one fixed tick
    ///
    /// Returns the projectiles whose lifetime ran out; they are already back
    /// in the pool.
    pub fn update(&mut self, dt: f32) -> Vec<ProjectileHandle> {
        let mut expired = Vec::new();
        for (i, p) in self.projectiles.iter_mut().enumerate() {
            if !p.active {
                continue;
            }
            p.pos += p.heading * p.move_speed * dt;
            p.time_alive += dt;
            if p.time_alive >= p.lifetime {
                p.active = false;
                p.time_alive = 0.0;
                expired.push(ProjectileHandle {
                    index: i as u32,
                    generation: p.generation,
                });
            }
        }
        expired
    }
}
