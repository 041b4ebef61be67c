//! Ricochet headless runner
//!
//! Plays sessions automatically against the reference arena: the turret aims
//! at the nearest live breakable block and fires on a fixed cadence.
//!
//! Usage: `ricochet [config.json] [--sessions N] [--mode sequential|shuffled]`

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use ricochet::arena::Arena;
use ricochet::consts::*;
use ricochet::sim::{GameSession, ProgressionMode, SessionState, TickInput, tick};
use ricochet::{GameLog, SessionConfig};

/// Ticks between automatic shots
const FIRE_INTERVAL_TICKS: u64 = 12;
/// Give up on a session that has not ended after this many simulated seconds
const MAX_SESSION_SECS: f32 = 300.0;

/// Command-line arguments for the headless runner
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Session configuration (JSON); built-in layouts are used when omitted
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Number of sessions to play back to back
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sessions: u32,
    /// Layout progression, overriding the configuration file
    #[arg(long, value_enum, value_name = "MODE")]
    mode: Option<ProgressionMode>,
}

/// Runner holding the session and its collaborators
struct Runner {
    session: GameSession,
    arena: Arena,
    log: GameLog,
    ticks: u64,
}

impl Runner {
    fn new(config: SessionConfig) -> Self {
        let log = GameLog::new(config.log);
        Self {
            session: GameSession::new(config),
            arena: Arena::default(),
            log,
            ticks: 0,
        }
    }

    /// Nearest live breakable block to the turret
    fn target(&self) -> Option<Vec2> {
        let layout = self.session.layout()?;
        let origin = layout.turret.position;
        layout
            .live_blocks()
            .filter(|b| !b.is_invincible())
            .map(|b| b.center)
            .min_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)))
    }

    fn step(&mut self, mut input: TickInput) {
        if let Some(layout) = self.session.layout() {
            let radius = self.session.config().projectile.radius;
            input.contacts = self.arena.contacts(self.session.pool(), layout, radius);
        }
        tick(&mut self.session, &input, SIM_DT);
        self.ticks += 1;

        let events = self.session.take_events();
        self.log.extend(&events);
    }

    /// Play the current session through to the game-over screen
    fn play_session(&mut self) -> bool {
        let max_ticks = (MAX_SESSION_SECS / SIM_DT) as u64;
        for _ in 0..max_ticks {
            match self.session.current_state() {
                SessionState::GameOver => return true,
                SessionState::Playing => {
                    let input = TickInput {
                        pointer: self.target(),
                        fire: self.ticks % FIRE_INTERVAL_TICKS == 0,
                        ..Default::default()
                    };
                    self.step(input);
                }
                _ => self.step(TickInput::default()),
            }
        }
        log::warn!(
            "Session did not finish within {MAX_SESSION_SECS}s ({} blocks left)",
            self.session.remaining_breakable_count()
        );
        false
    }

    fn run(&mut self, sessions: u32) {
        for round in 0..sessions {
            let input = if round == 0 {
                TickInput {
                    start: true,
                    ..Default::default()
                }
            } else {
                TickInput {
                    continue_game: true,
                    ..Default::default()
                }
            };
            self.step(input);

            if !self.play_session() {
                break;
            }
            if let Some(summary) = self.session.summary() {
                log::info!(
                    "Session {} on '{}': {} projectiles, {:.2}s",
                    round + 1,
                    summary.layout.as_deref().unwrap_or("-"),
                    summary.projectiles_launched,
                    summary.elapsed
                );
            }
        }

        for message in self.log.messages() {
            log::debug!("log: {message}");
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path).unwrap_or_else(|e| {
            log::error!("{}: {e}; using default configuration", path.display());
            SessionConfig::default()
        }),
        None => SessionConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.progression = mode;
    }

    log::info!(
        "Ricochet: {} layouts, {} mode, {} sessions",
        config.layouts.len(),
        config.progression.as_str(),
        args.sessions
    );
    Runner::new(config).run(args.sessions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["ricochet"]).unwrap();
        assert!(args.config.is_none());
        assert_eq!(args.sessions, 3);
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_cli_config_and_flags() {
        let args =
            CliArgs::try_parse_from(["ricochet", "levels.json", "--sessions", "5", "--mode", "shuffled"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("levels.json")));
        assert_eq!(args.sessions, 5);
        assert_eq!(args.mode, Some(ProgressionMode::Shuffled));
    }

    #[test]
    fn test_cli_rejects_unknown_and_invalid_values() {
        assert!(CliArgs::try_parse_from(["ricochet", "--seed", "5"]).is_err());
        assert!(CliArgs::try_parse_from(["ricochet", "--sessions", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["ricochet", "--mode", "loop"]).is_err());
    }
}
