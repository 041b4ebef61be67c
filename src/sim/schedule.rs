//! Deferred actions keyed to a session generation
//!
//! Actions are never cancelled. Each one remembers the generation that
//! scheduled it and the owner drops it on delivery if that generation has
//! moved on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Scheduled<A> {
    fire_at: u64,
    generation: u64,
    action: A,
}

/// Time-ordered queue of pending actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule<A> {
    pending: Vec<Scheduled<A>>,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> Schedule<A> {
    /// Queue `action` to fire once the clock reaches `fire_at` (integer clock units)
    pub fn schedule(&mut self, fire_at: u64, generation: u64, action: A) {
        self.pending.push(Scheduled {
            fire_at,
            generation,
            action,
        });
        // Stable sort keeps same-time actions in scheduling order
        self.pending.sort_by_key(|s| s.fire_at);
    }

    /// Remove and return every action due at `now`, with its generation
    pub fn take_due(&mut self, now: u64) -> Vec<(u64, A)> {
        let due = self.pending.iter().take_while(|s| s.fire_at <= now).count();
        self.pending
            .drain(..due)
            .map(|s| (s.generation, s.action))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
