//! Paddle-and-ball core: continuous space, substepped integration
//!
//! The ball is a circle, the paddle and bricks are axis-aligned
//! rectangles. Integration runs on a fixed physics substep accumulated
//! from the frame delta, capped to avoid a spiral of death. Serve state
//! keeps the ball riding the paddle until launch.

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::collision::{Aabb, apply_bounce, bounce_axis, circle_rect_overlap};
use super::events::GameEvent;
use super::session::{Phase, Session};
use crate::consts::{CANVAS_H, CANVAS_W, MAX_SUBSTEPS, PHYS_DT};
use rand::Rng;

pub const PADDLE_W: f32 = 72.0;
pub const PADDLE_H: f32 = 12.0;
pub const PADDLE_Y: f32 = CANVAS_H - 40.0;
pub const PADDLE_SPEED: f32 = 420.0;
/// How far one move intent nudges the paddle target
pub const PADDLE_STEP: f32 = 36.0;

pub const BALL_RADIUS: f32 = 6.0;
pub const LAUNCH_SPEED: f32 = 360.0;
/// Launch angle is drawn within this half-cone around straight-up (radians)
pub const LAUNCH_CONE: f32 = 0.35;
pub const BALL_MIN_SPEED: f32 = 240.0;
pub const BALL_MAX_SPEED: f32 = 560.0;
/// Horizontal deflection factor from the paddle contact offset
const ENGLISH: f32 = 0.75;

pub const BRICK_COLS: usize = 10;
pub const BRICK_ROWS: usize = 6;
const BRICK_GAP: f32 = 4.0;
const BRICK_H: f32 = 18.0;
const BRICK_TOP: f32 = 70.0;
const BRICK_SCORE: u32 = 10;

const START_LIVES: u32 = 3;

/// Ball either rides the paddle (serve) or moves freely
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallState {
    /// Horizontal offset from the paddle center
    Attached { offset_x: f32 },
    Free,
}

#[derive(Debug, Clone)]
pub struct Brick {
    pub rect: Aabb,
    pub row: usize,
    pub hp: u8,
}

#[derive(Debug, Clone)]
pub struct BreakoutGame {
    pub session: Session,
    /// Paddle center x; y is fixed at `PADDLE_Y`
    pub paddle_x: f32,
    target_x: f32,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub ball_state: BallState,
    pub bricks: Vec<Brick>,
    launch_requested: bool,
    accumulator: f32,
}

impl BreakoutGame {
    pub fn new(seed: u64, best: u32) -> Self {
        let session = Session::new(seed, START_LIVES, best);
        let mut game = Self {
            session,
            paddle_x: CANVAS_W / 2.0,
            target_x: CANVAS_W / 2.0,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            ball_state: BallState::Attached { offset_x: 0.0 },
            bricks: brick_field(),
            launch_requested: false,
            accumulator: 0.0,
        };
        game.place_attached_ball();
        game
    }

    pub fn paddle_rect(&self) -> Aabb {
        Aabb::new(
            Vec2::new(self.paddle_x - PADDLE_W / 2.0, PADDLE_Y),
            Vec2::new(PADDLE_W, PADDLE_H),
        )
    }

    /// Nudge the paddle target left/right; the paddle glides toward it at
    /// a capped speed during the tick.
    pub fn nudge(&mut self, delta: f32) {
        let half = PADDLE_W / 2.0;
        self.target_x = (self.target_x + delta).clamp(half, CANVAS_W - half);
    }

    /// Request a launch; consumed at the next tick while serving
    pub fn request_launch(&mut self) {
        self.launch_requested = true;
    }

    pub fn tick(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if !self.session.active() {
            self.launch_requested = false;
            return;
        }

        if self.session.tick_life_lost(dt) {
            // Respawn into serve with the ball re-attached
            self.ball_state = BallState::Attached { offset_x: 0.0 };
            self.ball_vel = Vec2::ZERO;
            self.session.phase = Phase::Ready;
            self.accumulator = 0.0;
        }
        if matches!(self.session.phase, Phase::LifeLost { .. }) {
            return;
        }

        let launch = std::mem::take(&mut self.launch_requested);

        match self.session.phase {
            Phase::Ready => {
                self.move_paddle(dt);
                self.place_attached_ball();
                if launch {
                    self.launch(events);
                    self.session.phase = Phase::Playing;
                }
            }
            Phase::Playing => {
                self.accumulator += dt;
                let mut substeps = 0;
                while self.accumulator >= PHYS_DT && substeps < MAX_SUBSTEPS {
                    self.step_physics(PHYS_DT, events);
                    self.accumulator -= PHYS_DT;
                    substeps += 1;
                    if !matches!(self.session.phase, Phase::Playing) {
                        self.accumulator = 0.0;
                        break;
                    }
                }
                // At the cap, drop the backlog instead of carrying it into
                // the next frames as slow-motion drift
                if substeps == MAX_SUBSTEPS {
                    self.accumulator = 0.0;
                }
            }
            _ => {}
        }
    }

    fn move_paddle(&mut self, dt: f32) {
        let max_delta = PADDLE_SPEED * dt;
        let delta = (self.target_x - self.paddle_x).clamp(-max_delta, max_delta);
        self.paddle_x += delta;
    }

    fn place_attached_ball(&mut self) {
        if let BallState::Attached { offset_x } = self.ball_state {
            self.ball_pos = Vec2::new(
                self.paddle_x + offset_x,
                PADDLE_Y - BALL_RADIUS - 1.0,
            );
        }
    }

    /// Launch straight-up plus a seeded random tilt within the cone
    fn launch(&mut self, events: &mut Vec<GameEvent>) {
        let tilt: f32 = self.session.rng.random_range(-LAUNCH_CONE..=LAUNCH_CONE);
        let angle = -FRAC_PI_2 + tilt;
        self.ball_vel = Vec2::new(angle.cos(), angle.sin()) * LAUNCH_SPEED;
        self.ball_state = BallState::Free;
        events.push(GameEvent::BallLaunched);
    }

    fn step_physics(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.move_paddle(dt);

        let prev = self.ball_pos;
        self.ball_pos += self.ball_vel * dt;

        // Side walls and ceiling
        if self.ball_pos.x < BALL_RADIUS {
            self.ball_pos.x = BALL_RADIUS;
            self.ball_vel.x = self.ball_vel.x.abs();
            events.push(GameEvent::WallHit);
        } else if self.ball_pos.x > CANVAS_W - BALL_RADIUS {
            self.ball_pos.x = CANVAS_W - BALL_RADIUS;
            self.ball_vel.x = -self.ball_vel.x.abs();
            events.push(GameEvent::WallHit);
        }
        if self.ball_pos.y < BALL_RADIUS {
            self.ball_pos.y = BALL_RADIUS;
            self.ball_vel.y = self.ball_vel.y.abs();
            events.push(GameEvent::WallHit);
        }

        // Paddle: only deflects a descending ball, and the contact offset
        // adds horizontal english
        let paddle = self.paddle_rect();
        if self.ball_vel.y > 0.0
            && circle_rect_overlap(self.ball_pos, BALL_RADIUS, &paddle)
        {
            let speed = self.ball_vel.length();
            let offset = (self.ball_pos.x - self.paddle_x) / (PADDLE_W / 2.0);
            self.ball_vel.y = -self.ball_vel.y.abs();
            self.ball_vel.x += offset * ENGLISH * speed;
            self.ball_vel = self.ball_vel.normalize_or_zero()
                * speed.clamp(BALL_MIN_SPEED, BALL_MAX_SPEED);
            self.ball_pos.y = paddle.min.y - BALL_RADIUS;
            events.push(GameEvent::PaddleHit);
        }

        // Bricks: resolve at most one per substep
        if let Some(idx) = self
            .bricks
            .iter()
            .position(|b| circle_rect_overlap(self.ball_pos, BALL_RADIUS, &b.rect))
        {
            let axis = bounce_axis(prev, &self.bricks[idx].rect);
            self.ball_vel = apply_bounce(self.ball_vel, axis);

            let brick = &mut self.bricks[idx];
            brick.hp = brick.hp.saturating_sub(1);
            if brick.hp == 0 {
                self.bricks.swap_remove(idx);
                self.session.add_score(BRICK_SCORE, events);
                events.push(GameEvent::BrickBroken);
            }

            if self.bricks.is_empty() {
                self.session.end_run(true, events);
                return;
            }
        }

        // Floor: ball lost
        if self.ball_pos.y - BALL_RADIUS > CANVAS_H {
            self.session.lose_life(events);
        }
    }
}

/// Lay out the brick field at the top of the playfield
fn brick_field() -> Vec<Brick> {
    let brick_w = (CANVAS_W - BRICK_GAP * (BRICK_COLS as f32 + 1.0)) / BRICK_COLS as f32;
    let mut bricks = Vec::with_capacity(BRICK_COLS * BRICK_ROWS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            let x = BRICK_GAP + col as f32 * (brick_w + BRICK_GAP);
            let y = BRICK_TOP + row as f32 * (BRICK_H + BRICK_GAP);
            bricks.push(Brick {
                rect: Aabb::new(Vec2::new(x, y), Vec2::new(brick_w, BRICK_H)),
                row,
                hp: 1,
            });
        }
    }
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_speed_and_cone() {
        for seed in 0..20 {
            let mut game = BreakoutGame::new(seed, 0);
            game.request_launch();
            let mut events = Vec::new();
            game.tick(PHYS_DT, &mut events);

            assert_eq!(game.ball_state, BallState::Free);
            assert!(events.contains(&GameEvent::BallLaunched));

            let speed = game.ball_vel.length();
            assert!((speed - LAUNCH_SPEED).abs() < 1.0);

            // Angle within the cone around straight-up
            let angle = game.ball_vel.y.atan2(game.ball_vel.x);
            assert!((angle - (-FRAC_PI_2)).abs() <= LAUNCH_CONE + 1e-3);
        }
    }

    #[test]
    fn test_ball_rides_paddle_until_launch() {
        let mut game = BreakoutGame::new(1, 0);
        let mut events = Vec::new();

        game.nudge(PADDLE_STEP * 2.0);
        for _ in 0..30 {
            game.tick(1.0 / 60.0, &mut events);
        }
        assert_eq!(game.session.phase, Phase::Ready);
        assert!((game.ball_pos.x - game.paddle_x).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_bounce_inverts_vertical() {
        let mut game = BreakoutGame::new(1, 0);
        game.session.phase = Phase::Playing;
        game.ball_state = BallState::Free;
        game.ball_pos = Vec2::new(game.paddle_x, PADDLE_Y - BALL_RADIUS + 1.0);
        game.ball_vel = Vec2::new(0.0, 300.0);

        let mut events = Vec::new();
        game.step_physics(PHYS_DT, &mut events);

        assert!(game.ball_vel.y < 0.0);
        assert!(events.contains(&GameEvent::PaddleHit));
        let speed = game.ball_vel.length();
        assert!((BALL_MIN_SPEED..=BALL_MAX_SPEED).contains(&speed));
    }

    #[test]
    fn test_brick_break_scores_and_removes() {
        let mut game = BreakoutGame::new(1, 0);
        game.session.phase = Phase::Playing;
        game.ball_state = BallState::Free;

        let target = game.bricks[0].rect;
        game.ball_pos = target.center() + Vec2::new(0.0, target.size().y);
        game.ball_vel = Vec2::new(0.0, -200.0);

        let before = game.bricks.len();
        let mut events = Vec::new();
        // Walk upward until the overlap registers
        for _ in 0..200 {
            game.step_physics(PHYS_DT, &mut events);
            if events.contains(&GameEvent::BrickBroken) {
                break;
            }
        }
        assert!(events.contains(&GameEvent::BrickBroken));
        assert_eq!(game.bricks.len(), before - 1);
        assert_eq!(game.session.score, BRICK_SCORE);
        // Vertical face hit: the ball is descending again
        assert!(game.ball_vel.y > 0.0);
    }

    #[test]
    fn test_lost_ball_burns_a_life_then_serves() {
        let mut game = BreakoutGame::new(1, 0);
        game.session.phase = Phase::Playing;
        game.ball_state = BallState::Free;
        game.ball_pos = Vec2::new(CANVAS_W / 2.0, CANVAS_H + 50.0);
        game.ball_vel = Vec2::new(0.0, 100.0);

        let mut events = Vec::new();
        game.step_physics(PHYS_DT, &mut events);
        assert!(events.contains(&GameEvent::LifeLost));
        assert_eq!(game.session.lives, START_LIVES - 1);
        assert!(matches!(game.session.phase, Phase::LifeLost { .. }));

        // Banner expires, ball re-attaches for the next serve
        game.tick(crate::consts::LIFE_LOST_SECS + 0.1, &mut events);
        assert_eq!(game.session.phase, Phase::Ready);
        assert!(matches!(game.ball_state, BallState::Attached { .. }));
    }

    #[test]
    fn test_stall_drops_physics_backlog() {
        let mut game = BreakoutGame::new(1, 0);
        game.session.phase = Phase::Playing;
        game.ball_state = BallState::Free;
        // Mid-air, slow enough that nothing is struck during catch-up
        game.ball_pos = Vec2::new(CANVAS_W / 2.0, 400.0);
        game.ball_vel = Vec2::new(30.0, -30.0);

        let mut events = Vec::new();
        // A long stall advances at most the substep cap
        game.tick(1.0, &mut events);
        let caught_up = game.ball_pos;

        // The backlog is gone: a half-substep frame moves nothing
        game.tick(PHYS_DT / 2.0, &mut events);
        assert_eq!(game.ball_pos, caught_up);
    }

    #[test]
    fn test_clearing_all_bricks_wins() {
        let mut game = BreakoutGame::new(1, 0);
        game.session.phase = Phase::Playing;
        game.ball_state = BallState::Free;
        game.bricks.truncate(1);

        let target = game.bricks[0].rect;
        game.ball_pos = target.center() + Vec2::new(0.0, target.size().y);
        game.ball_vel = Vec2::new(0.0, -200.0);

        let mut events = Vec::new();
        for _ in 0..200 {
            game.step_physics(PHYS_DT, &mut events);
            if !matches!(game.session.phase, Phase::Playing) {
                break;
            }
        }
        assert_eq!(game.session.phase, Phase::Over { won: true });
        assert!(events.contains(&GameEvent::GameOver { won: true }));
    }
}
