//! Grid geometry and fixed-tick time accounting
//!
//! Shared by every grid-based core: integer cell coordinates, the four
//! travel directions, and the accumulator that converts real frame deltas
//! into whole cell steps.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCHUP_STEPS;

/// A cell coordinate on a fixed-size board. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Manhattan distance to another cell
    pub fn manhattan(self, other: Self) -> i32 {
        (self.col - other.col).abs() + (self.row - other.row).abs()
    }

    /// The neighboring cell one step in `dir`
    pub fn step(self, dir: Dir) -> Self {
        let (dc, dr) = dir.offset();
        Self::new(self.col + dc, self.row + dr)
    }

    pub fn in_bounds(self, cols: i32, rows: i32) -> bool {
        self.col >= 0 && self.col < cols && self.row >= 0 && self.row < rows
    }
}

/// One of the four cardinal travel directions (screen coordinates, +row down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Unit offset as (col delta, row delta)
    pub fn offset(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Negated components; a request for this while traveling is rejected
    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Accumulates real elapsed time against a per-cell budget and yields the
/// number of whole steps an actor should advance this frame.
///
/// Catch-up after a stall is capped: once the cap is hit the remaining
/// backlog is dropped so the actor never teleports across the board.
#[derive(Debug, Clone)]
pub struct StepTimer {
    interval: f32,
    acc: f32,
}

impl StepTimer {
    pub fn new(interval: f32) -> Self {
        Self { interval, acc: 0.0 }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Change the time-per-cell budget; accumulated time is kept so a
    /// speed-up does not stall the next step.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(1e-3);
    }

    /// Feed a frame delta; returns how many whole steps to advance.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.acc += dt;
        let mut steps = 0;
        while self.acc >= self.interval && steps < MAX_CATCHUP_STEPS {
            self.acc -= self.interval;
            steps += 1;
        }
        if steps == MAX_CATCHUP_STEPS {
            self.acc = 0.0;
        }
        steps
    }

    /// Drop any accumulated time (respawn, unpause)
    pub fn reset(&mut self) {
        self.acc = 0.0;
    }
}

/// Pick a uniformly random cell for which `occupied` is false. When the
/// board has no free cell left, returns `fallback` instead of failing.
pub fn random_free_cell<R: Rng>(
    rng: &mut R,
    cols: i32,
    rows: i32,
    occupied: impl Fn(GridPos) -> bool,
    fallback: GridPos,
) -> GridPos {
    let free: Vec<GridPos> = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| GridPos::new(col, row)))
        .filter(|&cell| !occupied(cell))
        .collect();

    if free.is_empty() {
        fallback
    } else {
        free[rng.random_range(0..free.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_opposite_is_negation() {
        for dir in Dir::ALL {
            let (dc, dr) = dir.offset();
            let (oc, or) = dir.opposite().offset();
            assert_eq!((dc, dr), (-oc, -or));
        }
    }

    #[test]
    fn test_step_timer_whole_steps() {
        let mut timer = StepTimer::new(0.1);
        assert_eq!(timer.advance(0.05), 0);
        assert_eq!(timer.advance(0.05), 1);
        assert_eq!(timer.advance(0.25), 2);
    }

    #[test]
    fn test_step_timer_caps_catchup() {
        let mut timer = StepTimer::new(0.1);
        // A 10-second stall yields at most the cap, and the backlog is gone
        assert_eq!(timer.advance(10.0), MAX_CATCHUP_STEPS);
        assert_eq!(timer.advance(0.05), 0);
    }

    #[test]
    fn test_random_free_cell_fallback() {
        let mut rng = Pcg32::seed_from_u64(7);
        let fallback = GridPos::new(0, 0);
        let cell = random_free_cell(&mut rng, 4, 4, |_| true, fallback);
        assert_eq!(cell, fallback);
    }

    #[test]
    fn test_random_free_cell_avoids_occupied() {
        let mut rng = Pcg32::seed_from_u64(7);
        let blocked = GridPos::new(1, 1);
        for _ in 0..50 {
            let cell = random_free_cell(&mut rng, 2, 2, |c| c == blocked, blocked);
            assert_ne!(cell, blocked);
            assert!(cell.in_bounds(2, 2));
        }
    }
}
