//! Snake core: continuous-direction grid movement with staged turns
//!
//! The body is a deque of cells, head first. Direction changes are staged
//! by input and applied atomically at the next whole-tick advance; a
//! request opposite current travel is rejected. A move that would leave
//! the board or strike the body is never executed.

use std::collections::VecDeque;

use super::events::GameEvent;
use super::grid::{Dir, GridPos, StepTimer, random_free_cell};
use super::session::{Phase, Session};

#[derive(Debug, Clone)]
pub struct SnakeConfig {
    pub cols: i32,
    pub rows: i32,
    pub start_len: usize,
    /// Time-per-cell budget at score 0
    pub base_interval: f32,
    /// Interval floor the speed-up can never pass
    pub min_interval: f32,
    /// Every this many points the interval shrinks
    pub speedup_every: u32,
    pub speedup_factor: f32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            cols: 24,
            rows: 24,
            start_len: 3,
            base_interval: 0.14,
            min_interval: 0.05,
            speedup_every: 5,
            speedup_factor: 0.92,
        }
    }
}

/// Food respawn target when no free cell remains (board nearly full)
const FOOD_FALLBACK: GridPos = GridPos::new(0, 0);

#[derive(Debug, Clone)]
pub struct SnakeGame {
    pub cfg: SnakeConfig,
    pub session: Session,
    /// Head first
    pub body: VecDeque<GridPos>,
    pub dir: Dir,
    queued_dir: Option<Dir>,
    pub food: GridPos,
    timer: StepTimer,
}

impl SnakeGame {
    pub fn new(seed: u64, best: u32) -> Self {
        Self::with_config(SnakeConfig::default(), seed, best)
    }

    pub fn with_config(cfg: SnakeConfig, seed: u64, best: u32) -> Self {
        // Snake is a single-life game: any terminal collision ends the run
        let mut session = Session::new(seed, 1, best);

        let mid = GridPos::new(cfg.cols / 2, cfg.rows / 2);
        let body: VecDeque<GridPos> = (0..cfg.start_len as i32)
            .map(|i| GridPos::new(mid.col - i, mid.row))
            .collect();

        let food = random_free_cell(
            &mut session.rng,
            cfg.cols,
            cfg.rows,
            |c| body.contains(&c),
            FOOD_FALLBACK,
        );

        let timer = StepTimer::new(cfg.base_interval);
        Self {
            cfg,
            session,
            body,
            dir: Dir::Right,
            queued_dir: None,
            food,
            timer,
        }
    }

    pub fn head(&self) -> GridPos {
        *self.body.front().unwrap_or(&FOOD_FALLBACK)
    }

    /// Stage a direction change for the next whole-tick advance. The first
    /// move request also starts the run. Reversal is rejected here and
    /// again at apply time, so a fast double-tap cannot sneak a 180
    /// through the staging slot.
    pub fn queue_dir(&mut self, dir: Dir) {
        if self.session.phase == Phase::Ready {
            if dir != self.dir.opposite() {
                self.dir = dir;
            }
            self.session.phase = Phase::Playing;
            return;
        }
        if dir != self.dir.opposite() {
            self.queued_dir = Some(dir);
        }
    }

    pub fn tick(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if !self.session.active() || self.session.phase != Phase::Playing {
            return;
        }

        let steps = self.timer.advance(dt);
        for _ in 0..steps {
            self.step_once(events);
            if matches!(self.session.phase, Phase::Over { .. }) {
                break;
            }
        }
    }

    fn step_once(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(queued) = self.queued_dir.take() {
            if queued != self.dir.opposite() {
                self.dir = queued;
            }
        }

        let next = self.head().step(self.dir);
        let growing = next == self.food;

        if !next.in_bounds(self.cfg.cols, self.cfg.rows) || self.hits_body(next, growing) {
            self.session.end_run(false, events);
            return;
        }

        self.body.push_front(next);

        if growing {
            self.session.add_score(1, events);
            events.push(GameEvent::FoodEaten);

            if self.session.score % self.cfg.speedup_every == 0 {
                let interval = (self.timer.interval() * self.cfg.speedup_factor)
                    .max(self.cfg.min_interval);
                self.timer.set_interval(interval);
            }

            if self.body.len() as i32 >= self.cfg.cols * self.cfg.rows {
                self.session.end_run(true, events);
                return;
            }

            let body = &self.body;
            self.food = random_free_cell(
                &mut self.session.rng,
                self.cfg.cols,
                self.cfg.rows,
                |c| body.contains(&c),
                FOOD_FALLBACK,
            );
        } else {
            self.body.pop_back();
        }
    }

    /// Body collision test. When not growing, the tail cell vacates this
    /// same step, so moving into it is legal.
    fn hits_body(&self, cell: GridPos, growing: bool) -> bool {
        let skip_tail = if growing { 0 } else { 1 };
        self.body
            .iter()
            .take(self.body.len().saturating_sub(skip_tail))
            .any(|&b| b == cell)
    }

    /// Current time-per-cell budget (shrinks as the score climbs)
    pub fn interval(&self) -> f32 {
        self.timer.interval()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing_game(seed: u64) -> SnakeGame {
        let mut game = SnakeGame::new(seed, 0);
        game.session.phase = Phase::Playing;
        game
    }

    #[test]
    fn test_eat_food_grows_and_scores() {
        let mut game = playing_game(42);
        game.body = VecDeque::from([
            GridPos::new(3, 2),
            GridPos::new(2, 2),
            GridPos::new(1, 2),
        ]);
        game.dir = Dir::Right;
        game.food = GridPos::new(4, 2);

        let mut events = Vec::new();
        game.step_once(&mut events);

        assert_eq!(game.head(), GridPos::new(4, 2));
        assert_eq!(game.body.len(), 4);
        assert_eq!(game.session.score, 1);
        assert!(events.contains(&GameEvent::FoodEaten));
    }

    #[test]
    fn test_interval_shrinks_on_speedup_threshold() {
        let mut game = playing_game(42);
        let base = game.interval();

        // Walk the head onto a freshly placed food speedup_every times
        let mut events = Vec::new();
        for _ in 0..game.cfg.speedup_every {
            game.food = game.head().step(game.dir);
            game.step_once(&mut events);
        }
        assert_eq!(game.session.score, game.cfg.speedup_every);
        assert!(game.interval() < base);
        assert!(game.interval() >= game.cfg.min_interval);
    }

    #[test]
    fn test_reversal_rejected_while_moving() {
        let mut game = playing_game(42);
        assert_eq!(game.dir, Dir::Right);

        game.queue_dir(Dir::Left);
        let mut events = Vec::new();
        game.step_once(&mut events);
        assert_eq!(game.dir, Dir::Right);

        // A legal turn still goes through
        game.queue_dir(Dir::Up);
        game.step_once(&mut events);
        assert_eq!(game.dir, Dir::Up);
    }

    #[test]
    fn test_wall_hit_ends_run() {
        let mut game = playing_game(42);
        game.body = VecDeque::from([GridPos::new(game.cfg.cols - 1, 5)]);
        game.dir = Dir::Right;
        game.food = GridPos::new(0, 0);

        let mut events = Vec::new();
        game.step_once(&mut events);
        assert_eq!(game.session.phase, Phase::Over { won: false });
        assert!(events.contains(&GameEvent::GameOver { won: false }));
        // The illegal move was rejected pre-move, never executed
        assert_eq!(game.head(), GridPos::new(game.cfg.cols - 1, 5));
    }

    #[test]
    fn test_moving_into_vacating_tail_is_legal() {
        let mut game = playing_game(42);
        // A 2x2 loop: head can chase its own tail forever
        game.body = VecDeque::from([
            GridPos::new(5, 5),
            GridPos::new(6, 5),
            GridPos::new(6, 6),
            GridPos::new(5, 6),
        ]);
        game.dir = Dir::Down;
        game.food = GridPos::new(0, 0);

        let mut events = Vec::new();
        game.step_once(&mut events);
        assert_eq!(game.session.phase, Phase::Playing);
        assert_eq!(game.head(), GridPos::new(5, 6));
    }

    #[test]
    fn test_paused_skips_simulation() {
        let mut game = playing_game(42);
        let before = game.body.clone();
        game.session.paused = true;

        let mut events = Vec::new();
        game.tick(10.0, &mut events);
        assert_eq!(game.body, before);
        assert!(events.is_empty());
    }

    proptest! {
        /// For all sequences of staged turns, every recorded position stays
        /// inside the board at every step.
        #[test]
        fn prop_body_stays_in_bounds(seed in 0u64..1000, turns in proptest::collection::vec(0u8..4, 0..60)) {
            let mut game = playing_game(seed);
            let mut events = Vec::new();

            for t in turns {
                let dir = match t {
                    0 => Dir::Up,
                    1 => Dir::Down,
                    2 => Dir::Left,
                    _ => Dir::Right,
                };
                game.queue_dir(dir);
                game.tick(game.interval(), &mut events);

                for cell in &game.body {
                    prop_assert!(cell.in_bounds(game.cfg.cols, game.cfg.rows));
                }
                if matches!(game.session.phase, Phase::Over { .. }) {
                    break;
                }
            }
        }
    }
}
