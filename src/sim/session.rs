//! Game session state machine
//!
//! Title -> Playing -> Ending -> GameOver -> Playing -> ...
//!
//! The session owns the active layout, the projectile pool and the layout
//! rotation, and counts unique breakable-block destructions. Clearing the
//! layout starts a fixed delay (a scheduled action keyed to the session
//! generation) after which the layout is torn down and the summary shown.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::{BlockId, DamageOutcome};
use super::events::{SessionEvent, SessionEventKind};
use super::layout::ActiveLayout;
use super::projectile::{ProjectileHandle, ProjectilePool};
use super::reflect::Bounce;
use super::rotation::{LayoutRotation, ProgressionMode};
use super::schedule::Schedule;
use super::tick::{BodyKind, ContactEvent};
use crate::config::{ConfigFault, SessionConfig};

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Title screen, waiting for a start request
    Title,
    /// Layout live, blocks left to break
    Playing,
    /// Layout cleared; simulation continues until the ending delay elapses
    Ending,
    /// Summary screen, waiting for a continue request
    GameOver,
}

/// Deferred session actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionAction {
    ShowGameOver,
}

/// Shown on the game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub layout: Option<String>,
    pub projectiles_launched: u32,
    /// Seconds from session start until the last block broke
    pub elapsed: f32,
}

/// What a collision contact did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactOutcome {
    /// New heading, if the contact carried a normal
    pub bounce: Option<Bounce>,
    /// Damage result for block contacts (`Ignored` for walls)
    pub damage: DamageOutcome,
}

impl ContactOutcome {
    fn ignored() -> Self {
        Self {
            bounce: None,
            damage: DamageOutcome::Ignored,
        }
    }
}

/// Top-level orchestrator for a group of play sessions
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    state: SessionState,
    rotation: LayoutRotation,
    pool: ProjectilePool,
    layout: Option<ActiveLayout>,
    remaining_breakable: u32,
    /// Breakable blocks already counted this session
    counted: HashSet<BlockId>,
    projectiles_launched: u32,
    /// Simulation clock in microseconds since construction
    clock_us: u64,
    session_start_us: u64,
    session_end_us: Option<u64>,
    /// Bumped on every session start; stale scheduled actions compare against it
    generation: u64,
    schedule: Schedule<SessionAction>,
    summary: Option<SessionSummary>,
    events: Vec<SessionEvent>,
    faults: Vec<ConfigFault>,
    /// Faults from rejected requests; kept across revalidation
    rejected_requests: Vec<ConfigFault>,
}

fn to_micros(seconds: f32) -> u64 {
    (f64::from(seconds.max(0.0)) * 1e6).round() as u64
}

fn to_seconds(micros: u64) -> f32 {
    (micros as f64 / 1e6) as f32
}

impl GameSession {
    /// Build the rotation and pool from `config`
    pub fn new(config: SessionConfig) -> Self {
        let rotation = LayoutRotation::new(
            config.progression,
            config.layouts.len(),
            config.resolve_seed(),
        );
        let pool = ProjectilePool::new(config.pool_capacity, config.projectile);
        Self::with_parts(config, rotation, pool)
    }

    /// Assemble a session from separately constructed collaborators
    pub fn with_parts(config: SessionConfig, rotation: LayoutRotation, pool: ProjectilePool) -> Self {
        let mut session = Self {
            config,
            state: SessionState::Title,
            rotation,
            pool,
            layout: None,
            remaining_breakable: 0,
            counted: HashSet::new(),
            projectiles_launched: 0,
            clock_us: 0,
            session_start_us: 0,
            session_end_us: None,
            generation: 0,
            schedule: Schedule::default(),
            summary: None,
            events: Vec::new(),
            faults: Vec::new(),
            rejected_requests: Vec::new(),
        };
        session.report_faults();
        session
    }

    pub fn current_state(&self) -> SessionState {
        self.state
    }

    pub fn remaining_breakable_count(&self) -> u32 {
        self.remaining_breakable
    }

    pub fn projectiles_launched(&self) -> u32 {
        self.projectiles_launched
    }

    /// Seconds since the session started, frozen once the layout is cleared
    pub fn elapsed_time(&self) -> f32 {
        if self.state == SessionState::Title {
            return 0.0;
        }
        to_seconds(self.session_end_us.unwrap_or(self.clock_us) - self.session_start_us)
    }

    /// Seconds since construction
    pub fn clock(&self) -> f32 {
        to_seconds(self.clock_us)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn layout(&self) -> Option<&ActiveLayout> {
        self.layout.as_ref()
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    /// Position/heading writes from the physics collaborator
    pub fn pool_mut(&mut self) -> &mut ProjectilePool {
        &mut self.pool
    }

    pub fn rotation(&self) -> &LayoutRotation {
        &self.rotation
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Faults from the last configuration validation plus every rejected request
    pub fn faults(&self) -> &[ConfigFault] {
        &self.faults
    }

    /// Summary of the finished session (GameOver only)
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Drain queued gameplay events
    ///
    /// The queue only holds the current session: undrained events are
    /// discarded when the next session starts.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Title -> Playing
    pub fn request_start(&mut self) -> bool {
        if self.state != SessionState::Title {
            log::debug!("Start requested in {:?}, ignoring", self.state);
            return false;
        }
        self.begin_session();
        true
    }

    /// GameOver -> Playing on the next layout
    pub fn request_continue(&mut self) -> bool {
        if self.state != SessionState::GameOver {
            log::debug!("Continue requested in {:?}, ignoring", self.state);
            return false;
        }
        self.begin_session();
        true
    }

    /// Pin every future session to one catalog entry (debug only), or unpin with `None`
    pub fn request_debug_override_layout(&mut self, index: Option<usize>) -> bool {
        if let Some(i) = index {
            let catalog_len = self.config.layouts.len();
            if i >= catalog_len {
                let fault = ConfigFault::InvalidLayoutOverride { index: i, catalog_len };
                log::warn!("Config fault: {fault}");
                self.faults.push(fault.clone());
                self.rejected_requests.push(fault);
                return false;
            }
        }
        log::info!("Debug layout override set to {index:?}");
        self.config.debug_layout_override = index;
        true
    }

    /// Change the progression policy; rotation starts over
    pub fn set_progression_mode(&mut self, mode: ProgressionMode) {
        self.config.progression = mode;
        self.rotation.set_mode(mode);
    }

    fn report_faults(&mut self) {
        self.faults = self.config.validate();
        for fault in &self.faults {
            log::warn!("Config fault: {fault}");
        }
        self.faults.extend(self.rejected_requests.iter().cloned());
    }

    fn next_layout_index(&mut self) -> Option<usize> {
        if let Some(i) = self.config.debug_layout_override {
            if i < self.config.layouts.len() {
                return Some(i);
            }
            log::warn!("Ignoring out-of-range layout override {i}");
        }
        self.rotation
            .next()
            .filter(|&i| i < self.config.layouts.len())
    }

    fn begin_session(&mut self) {
        self.generation += 1;
        if !self.events.is_empty() {
            log::debug!("Discarding {} undrained events", self.events.len());
            self.events.clear();
        }
        self.teardown_layout();
        self.pool.deactivate_all();
        self.report_faults();

        let generation = self.generation;
        self.layout = self
            .next_layout_index()
            .map(|i| ActiveLayout::instantiate(i, &self.config.layouts[i], generation));

        self.remaining_breakable = self
            .layout
            .as_ref()
            .map_or(0, |l| l.breakable_count() as u32);
        self.counted.clear();
        self.projectiles_launched = 0;
        self.session_start_us = self.clock_us;
        self.session_end_us = None;
        self.summary = None;
        self.state = SessionState::Playing;

        let name = match &self.layout {
            Some(layout) => {
                if self.remaining_breakable == 0 {
                    log::warn!("Layout '{}' has no breakable blocks; session cannot end", layout.name);
                }
                layout.name.clone()
            }
            None => {
                log::warn!("No layout available; session stalled");
                String::new()
            }
        };
        log::info!(
            "Session {} started on '{}' ({} breakable blocks)",
            self.generation,
            name,
            self.remaining_breakable
        );
        self.emit(SessionEventKind::SessionStarted { layout: name });
    }

    /// Drop the active layout; no-op if there is none
    fn teardown_layout(&mut self) -> bool {
        match self.layout.take() {
            Some(layout) => {
                log::debug!("Tearing down layout '{}' (session {})", layout.name, layout.generation);
                true
            }
            None => false,
        }
    }

    /// Count a breakable block's destruction; repeats and live blocks are ignored
    pub fn notify_block_destroyed(&mut self, id: BlockId) -> bool {
        if !matches!(self.state, SessionState::Playing | SessionState::Ending) {
            return false;
        }
        let Some(layout) = &self.layout else {
            return false;
        };
        if !layout.is_breakable(id) || !layout.block(id).is_some_and(|b| b.is_destroyed()) {
            return false;
        }
        if !self.counted.insert(id) {
            return false;
        }

        self.remaining_breakable = self.remaining_breakable.saturating_sub(1);
        log::debug!("Block {id} counted, {} remaining", self.remaining_breakable);
        if self.remaining_breakable == 0 && self.state == SessionState::Playing {
            self.enter_ending();
        }
        true
    }

    fn enter_ending(&mut self) {
        self.state = SessionState::Ending;
        self.session_end_us = Some(self.clock_us);
        let fire_at = self.clock_us + to_micros(self.config.effective_ending_delay());
        self.schedule
            .schedule(fire_at, self.generation, SessionAction::ShowGameOver);
        log::info!(
            "Layout cleared after {:.2}s, game over at {:.2}",
            self.elapsed_time(),
            to_seconds(fire_at)
        );
        self.emit(SessionEventKind::SessionWon);
    }

    fn run_due_actions(&mut self) {
        for (generation, action) in self.schedule.take_due(self.clock_us) {
            if generation != self.generation {
                log::debug!("Dropping {action:?} from stale session {generation}");
                continue;
            }
            match action {
                SessionAction::ShowGameOver => self.finish_session(),
            }
        }
    }

    fn finish_session(&mut self) {
        if self.state != SessionState::Ending {
            return;
        }
        if let Some(layout) = &self.layout {
            if layout.generation != self.generation {
                return;
            }
        }

        let layout = self.layout.as_ref().map(|l| l.name.clone());
        self.teardown_layout();
        self.pool.deactivate_all();

        let summary = SessionSummary {
            layout,
            projectiles_launched: self.projectiles_launched,
            elapsed: self.elapsed_time(),
        };
        log::info!(
            "Game over: {} projectiles, {:.2}s",
            summary.projectiles_launched,
            summary.elapsed
        );
        self.emit(SessionEventKind::GameOver {
            projectiles_launched: summary.projectiles_launched,
            elapsed: summary.elapsed,
        });
        self.summary = Some(summary);
        self.state = SessionState::GameOver;
    }

    /// Launch a projectile while Playing
    pub fn launch_projectile(&mut self, origin: Vec2, heading: Vec2) -> Option<ProjectileHandle> {
        if self.state != SessionState::Playing {
            return None;
        }
        let handle = self.pool.launch(origin, heading);
        self.projectiles_launched += 1;
        self.emit(SessionEventKind::ProjectileFired {
            projectile: handle.index(),
        });
        Some(handle)
    }

    /// Update the turret's aim from a world-space pointer position
    pub fn set_pointer(&mut self, pointer: Vec2) {
        if let Some(layout) = self.layout.as_mut() {
            layout.turret.aim_at(pointer);
        }
    }

    /// Fire from the turret muzzle along its aim
    pub fn fire(&mut self) -> Option<ProjectileHandle> {
        let turret = &self.layout.as_ref()?.turret;
        let origin = turret.muzzle(self.config.projectile.spawn_offset);
        let heading = turret.heading();
        self.launch_projectile(origin, heading)
    }

    /// Resolve one collision reported by physics: bounce, then damage blocks
    pub fn handle_contact(&mut self, contact: &ContactEvent) -> ContactOutcome {
        if !matches!(self.state, SessionState::Playing | SessionState::Ending) {
            return ContactOutcome::ignored();
        }
        let Some(damage) = self.pool.get(contact.projectile).map(|p| p.damage) else {
            return ContactOutcome::ignored();
        };

        let bounce = self.pool.apply_bounce(contact.projectile, &contact.normals);
        if bounce.is_none() {
            log::debug!("Contact without normals for projectile {}", contact.projectile.index());
        }

        let BodyKind::Block(id) = contact.other else {
            return ContactOutcome {
                bounce,
                damage: DamageOutcome::Ignored,
            };
        };

        let Some(layout) = self.layout.as_mut() else {
            return ContactOutcome {
                bounce,
                damage: DamageOutcome::Ignored,
            };
        };
        let live = layout.block(id).is_some_and(|b| !b.is_destroyed());
        let outcome = layout.deal_damage(id, damage);

        if live {
            self.emit(SessionEventKind::ProjectileHitBlock {
                projectile: contact.projectile.index(),
                block: id,
            });
            if self.config.release_on_block_hit {
                self.pool.release(contact.projectile);
            }
        }
        if outcome == DamageOutcome::Destroyed {
            self.emit(SessionEventKind::BlockDestroyed { block: id });
            self.notify_block_destroyed(id);
        }

        ContactOutcome {
            bounce,
            damage: outcome,
        }
    }

    /// Advance the clock by one fixed tick
    pub fn step(&mut self, dt: f32) {
        self.clock_us += to_micros(dt);

        if matches!(self.state, SessionState::Playing | SessionState::Ending) {
            for handle in self.pool.update(dt) {
                log::trace!("Projectile {} expired", handle.index());
            }
        }

        self.run_due_actions();
    }

    fn emit(&mut self, kind: SessionEventKind) {
        self.events.push(SessionEvent {
            time: self.clock(),
            kind,
        });
    }
}
