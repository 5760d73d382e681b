//! Shared run state: score, best, lives, and the terminal/lives machine
//!
//! Every core owns one `Session`. The session is created on start/restart
//! and replaced wholesale on restart; only the best score survives across
//! runs (the host reloads it from persistence).

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::events::GameEvent;
use crate::consts::LIFE_LOST_SECS;

/// Run phase. `Over` is terminal until the host restarts the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Waiting for the first input (serve / "press to start")
    Ready,
    Playing,
    /// Transient banner after a non-final life loss; counts down in sim time
    LifeLost { secs_left: f32 },
    Over { won: bool },
}

#[derive(Debug, Clone)]
pub struct Session {
    /// Non-negative, monotonically non-decreasing within a run
    pub score: u32,
    /// Maximum score ever observed, including the current run
    pub best: u32,
    pub lives: u32,
    pub phase: Phase,
    /// Orthogonal to phase: while set the tick body is skipped entirely,
    /// but rendering continues
    pub paused: bool,
    pub rng: Pcg32,
    /// Best changed and has not been persisted yet
    best_dirty: bool,
    new_best_announced: bool,
}

impl Session {
    pub fn new(seed: u64, lives: u32, best: u32) -> Self {
        Self {
            score: 0,
            best,
            lives,
            phase: Phase::Ready,
            paused: false,
            rng: Pcg32::seed_from_u64(seed),
            best_dirty: false,
            new_best_announced: false,
        }
    }

    /// Whether the tick body should run at all this frame
    pub fn active(&self) -> bool {
        !self.paused && !matches!(self.phase, Phase::Over { .. })
    }

    /// Add points and fold them into the best immediately. Emits `NewBest`
    /// the first time this run exceeds the stored best.
    pub fn add_score(&mut self, points: u32, events: &mut Vec<GameEvent>) {
        self.score += points;
        if self.score > self.best {
            self.best = self.score;
            self.best_dirty = true;
            if !self.new_best_announced {
                self.new_best_announced = true;
                events.push(GameEvent::NewBest);
            }
        }
    }

    /// Terminal collision: decrement lives, enter the transient banner or
    /// end the run when none remain.
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::LifeLost);
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = Phase::Over { won: false };
            events.push(GameEvent::GameOver { won: false });
        } else {
            self.phase = Phase::LifeLost {
                secs_left: LIFE_LOST_SECS,
            };
        }
    }

    /// End the run outright (win condition or single-life game over)
    pub fn end_run(&mut self, won: bool, events: &mut Vec<GameEvent>) {
        self.phase = Phase::Over { won };
        events.push(GameEvent::GameOver { won });
    }

    /// Advance the life-lost banner. Returns true exactly once, when the
    /// countdown expires and the core should respawn its actors.
    pub fn tick_life_lost(&mut self, dt: f32) -> bool {
        if let Phase::LifeLost { secs_left } = &mut self.phase {
            *secs_left -= dt;
            if *secs_left <= 0.0 {
                self.phase = Phase::Playing;
                return true;
            }
        }
        false
    }

    /// Take the persist-needed flag; the host writes the best score through
    /// when this is set.
    pub fn take_best_dirty(&mut self) -> bool {
        std::mem::take(&mut self.best_dirty)
    }
}
