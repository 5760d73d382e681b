//! Maze pursuit core: pellets, power pellets, and reactive chasers
//!
//! The maze is a static ASCII layout. The player moves on the shared
//! fixed-tick timer with staged turns; pursuers re-decide their heading at
//! cell arrivals, scoring candidate directions by Manhattan distance to
//! the player (closest while hunting, farthest while frightened) with a
//! small random-turn probability so their movement is not fully
//! exploitable. Decision cadence and the randomness are tuned constants,
//! kept configurable rather than derived.

use std::collections::HashSet;

use super::events::GameEvent;
use super::grid::{Dir, GridPos, StepTimer};
use super::session::{Phase, Session};
use rand::Rng;

/// Wall/corridor layout plus item and spawn cells:
/// `#` wall, `.` pellet, `o` power pellet, `P` player spawn, `G` pursuer
/// spawn (corridor without a pellet).
const LAYOUT: &str = "\
###################
#........#........#
#o##.###.#.###.##o#
#.................#
#.##.#.#####.#.##.#
#....#...#...#....#
####.###.#.###.####
#....#..GGG..#....#
#.##.#.#####.#.##.#
#....#.......#....#
####.#.#####.#.####
#........#........#
#.##.###.#.###.##.#
#o...#...P...#...o#
###################";

const PELLET_SCORE: u32 = 10;
const POWER_SCORE: u32 = 50;
/// First frightened pursuer eaten; doubles per catch within one scare
const PURSUER_BASE_SCORE: u32 = 200;
const START_LIVES: u32 = 3;

#[derive(Debug, Clone)]
pub struct ChaseConfig {
    /// Pursuers re-decide every Nth cell arrival (tuned, not derived)
    pub decision_period: u32,
    /// Probability a decision takes a uniformly random legal turn instead
    pub random_turn_chance: f64,
    pub frightened_secs: f32,
    pub player_interval: f32,
    pub pursuer_interval: f32,
    /// Frightened pursuers crawl
    pub frightened_interval: f32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            decision_period: 2,
            random_turn_chance: 0.08,
            frightened_secs: 6.0,
            player_interval: 0.16,
            pursuer_interval: 0.19,
            frightened_interval: 0.30,
        }
    }
}

/// The static maze: walls, spawns, and the initial item sets
#[derive(Debug, Clone)]
pub struct Maze {
    pub cols: i32,
    pub rows: i32,
    walls: Vec<bool>,
    pub player_spawn: GridPos,
    pub pursuer_spawns: Vec<GridPos>,
    pub pellets: HashSet<GridPos>,
    pub power_pellets: HashSet<GridPos>,
}

impl Maze {
    /// Parse an ASCII layout. Unknown characters are treated as open
    /// corridor so a layout tweak cannot fail the run.
    pub fn parse(layout: &str) -> Self {
        let lines: Vec<&str> = layout.lines().collect();
        let rows = lines.len() as i32;
        let cols = lines.first().map_or(0, |l| l.chars().count()) as i32;

        let mut walls = vec![false; (cols * rows) as usize];
        let mut pellets = HashSet::new();
        let mut power_pellets = HashSet::new();
        let mut player_spawn = GridPos::new(1, 1);
        let mut pursuer_spawns = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let cell = GridPos::new(col as i32, row as i32);
                match ch {
                    '#' => walls[(row as i32 * cols + col as i32) as usize] = true,
                    '.' => {
                        pellets.insert(cell);
                    }
                    'o' => {
                        power_pellets.insert(cell);
                    }
                    'P' => player_spawn = cell,
                    'G' => pursuer_spawns.push(cell),
                    _ => {}
                }
            }
        }

        Self {
            cols,
            rows,
            walls,
            player_spawn,
            pursuer_spawns,
            pellets,
            power_pellets,
        }
    }

    pub fn standard() -> Self {
        Self::parse(LAYOUT)
    }

    /// An actor may occupy any in-bounds non-wall cell
    pub fn open(&self, cell: GridPos) -> bool {
        cell.in_bounds(self.cols, self.rows)
            && !self.walls[(cell.row * self.cols + cell.col) as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Pursuer {
    pub pos: GridPos,
    pub dir: Dir,
    pub frightened: bool,
    spawn: GridPos,
    timer: StepTimer,
    arrivals: u32,
}

impl Pursuer {
    fn new(spawn: GridPos, interval: f32) -> Self {
        Self {
            pos: spawn,
            dir: Dir::Left,
            frightened: false,
            spawn,
            timer: StepTimer::new(interval),
            arrivals: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChaseGame {
    pub cfg: ChaseConfig,
    pub session: Session,
    pub maze: Maze,
    /// Remaining items this run
    pub pellets: HashSet<GridPos>,
    pub power_pellets: HashSet<GridPos>,
    pub player: GridPos,
    pub player_dir: Dir,
    queued_dir: Option<Dir>,
    player_timer: StepTimer,
    pub pursuers: Vec<Pursuer>,
    /// Seconds of frightened mode remaining (0 when hunting)
    pub frightened_left: f32,
    fright_combo: u32,
}

impl ChaseGame {
    pub fn new(seed: u64, best: u32) -> Self {
        Self::with_config(ChaseConfig::default(), Maze::standard(), seed, best)
    }

    pub fn with_config(cfg: ChaseConfig, maze: Maze, seed: u64, best: u32) -> Self {
        let session = Session::new(seed, START_LIVES, best);
        let pursuers = maze
            .pursuer_spawns
            .iter()
            .map(|&s| Pursuer::new(s, cfg.pursuer_interval))
            .collect();
        let pellets = maze.pellets.clone();
        let power_pellets = maze.power_pellets.clone();
        let player = maze.player_spawn;
        let player_timer = StepTimer::new(cfg.player_interval);
        Self {
            cfg,
            session,
            maze,
            pellets,
            power_pellets,
            player,
            player_dir: Dir::Left,
            queued_dir: None,
            player_timer,
            pursuers,
            frightened_left: 0.0,
            fright_combo: 0,
        }
    }

    /// Stage a turn; taken at the next tick where the target cell is open.
    /// Reversal of current travel is rejected. The first request starts
    /// the run.
    pub fn queue_dir(&mut self, dir: Dir) {
        if self.session.phase == Phase::Ready {
            if self.maze.open(self.player.step(dir)) {
                self.player_dir = dir;
            }
            self.session.phase = Phase::Playing;
            return;
        }
        if dir != self.player_dir.opposite() {
            self.queued_dir = Some(dir);
        }
    }

    pub fn tick(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if !self.session.active() {
            return;
        }

        if self.session.tick_life_lost(dt) {
            self.respawn_actors();
            // Consume the respawn frame whole; feeding this dt into the
            // freshly reset timers would walk actors away from spawn
            return;
        }
        if self.session.phase != Phase::Playing {
            return;
        }

        if self.frightened_left > 0.0 {
            self.frightened_left -= dt;
            if self.frightened_left <= 0.0 {
                self.frightened_left = 0.0;
                self.fright_combo = 0;
                for p in &mut self.pursuers {
                    p.frightened = false;
                    p.timer.set_interval(self.cfg.pursuer_interval);
                }
            }
        }

        let steps = self.player_timer.advance(dt);
        for _ in 0..steps {
            self.step_player(events);
            if self.session.phase != Phase::Playing {
                return;
            }
        }

        for i in 0..self.pursuers.len() {
            let steps = self.pursuers[i].timer.advance(dt);
            for _ in 0..steps {
                self.step_pursuer(i);
                if self.resolve_contact(i, events) {
                    return;
                }
            }
        }
    }

    fn step_player(&mut self, events: &mut Vec<GameEvent>) {
        // Take the staged turn when its cell is open
        if let Some(queued) = self.queued_dir {
            if queued != self.player_dir.opposite() && self.maze.open(self.player.step(queued)) {
                self.player_dir = queued;
                self.queued_dir = None;
            }
        }

        // Walls stop the actor; the move is rejected pre-move
        let next = self.player.step(self.player_dir);
        if !self.maze.open(next) {
            return;
        }
        self.player = next;

        if self.pellets.remove(&next) {
            self.session.add_score(PELLET_SCORE, events);
            events.push(GameEvent::PelletEaten);
        }
        if self.power_pellets.remove(&next) {
            self.session.add_score(POWER_SCORE, events);
            events.push(GameEvent::PowerPelletEaten);
            self.frightened_left = self.cfg.frightened_secs;
            self.fright_combo = 0;
            for p in &mut self.pursuers {
                p.frightened = true;
                p.timer.set_interval(self.cfg.frightened_interval);
            }
        }

        if self.pellets.is_empty() && self.power_pellets.is_empty() {
            self.session.end_run(true, events);
            return;
        }

        // Walking into a pursuer counts the same as being caught
        for i in 0..self.pursuers.len() {
            if self.resolve_contact(i, events) {
                return;
            }
        }
    }

    fn step_pursuer(&mut self, idx: usize) {
        let player = self.player;
        let decide = {
            let p = &mut self.pursuers[idx];
            p.arrivals = p.arrivals.wrapping_add(1);
            // A zero period would divide by zero; treat it as every arrival
            p.arrivals % self.cfg.decision_period.max(1) == 0
        };

        let current_dir = self.pursuers[idx].dir;
        let blocked = !self.maze.open(self.pursuers[idx].pos.step(current_dir));
        if decide || blocked {
            let frightened = self.pursuers[idx].frightened;
            let pos = self.pursuers[idx].pos;
            if let Some(dir) = self.choose_direction(pos, current_dir, player, frightened) {
                self.pursuers[idx].dir = dir;
            }
        }

        let p = &mut self.pursuers[idx];
        let next = p.pos.step(p.dir);
        if self.maze.open(next) {
            p.pos = next;
        }
    }

    /// Enumerate non-reversing open neighbor directions; with the tuned
    /// probability take a uniform random one, otherwise the one that
    /// minimizes Manhattan distance to the target (maximizes while
    /// frightened). Reversal only as a dead-end fallback.
    fn choose_direction(
        &mut self,
        pos: GridPos,
        current: Dir,
        target: GridPos,
        frightened: bool,
    ) -> Option<Dir> {
        let candidates: Vec<Dir> = Dir::ALL
            .into_iter()
            .filter(|&d| d != current.opposite() && self.maze.open(pos.step(d)))
            .collect();

        if candidates.is_empty() {
            let back = current.opposite();
            return self.maze.open(pos.step(back)).then_some(back);
        }

        if self.session.rng.random_bool(self.cfg.random_turn_chance) {
            let idx = self.session.rng.random_range(0..candidates.len());
            return Some(candidates[idx]);
        }

        let score = |d: &Dir| pos.step(*d).manhattan(target);
        if frightened {
            candidates.into_iter().max_by_key(score)
        } else {
            candidates.into_iter().min_by_key(score)
        }
    }

    /// Exact cell-equality contact check. Returns true when the tick must
    /// stop (life lost or run over).
    fn resolve_contact(&mut self, idx: usize, events: &mut Vec<GameEvent>) -> bool {
        if self.pursuers[idx].pos != self.player {
            return false;
        }

        if self.pursuers[idx].frightened {
            self.fright_combo += 1;
            let points = PURSUER_BASE_SCORE << (self.fright_combo - 1).min(3);
            self.session.add_score(points, events);
            events.push(GameEvent::PursuerEaten);

            let p = &mut self.pursuers[idx];
            p.pos = p.spawn;
            p.frightened = false;
            p.timer.set_interval(self.cfg.pursuer_interval);
            p.timer.reset();
            false
        } else {
            self.session.lose_life(events);
            true
        }
    }

    /// Back to spawn cells after a life loss; score and board survive
    fn respawn_actors(&mut self) {
        self.player = self.maze.player_spawn;
        self.player_dir = Dir::Left;
        self.queued_dir = None;
        self.player_timer.reset();
        self.frightened_left = 0.0;
        self.fright_combo = 0;
        let interval = self.cfg.pursuer_interval;
        for p in &mut self.pursuers {
            p.pos = p.spawn;
            p.dir = Dir::Left;
            p.frightened = false;
            p.arrivals = 0;
            p.timer.set_interval(interval);
            p.timer.reset();
        }
    }

    /// Remaining pellet count (both kinds), for the HUD
    pub fn pellets_left(&self) -> usize {
        self.pellets.len() + self.power_pellets.len()
    }
}
