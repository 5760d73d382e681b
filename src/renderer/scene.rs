//! Scene building: game state to draw commands
//!
//! A pure function of simulation state; nothing here touches the DOM, so
//! the whole visual layout is testable. The host replays the resulting
//! `Frame` on the canvas once per rendered frame.

use glam::Vec2;

use crate::consts::{CANVAS_H, CANVAS_W};
use crate::sim::blocks::{BlocksGame, PieceKind, WELL_COLS, WELL_ROWS};
use crate::sim::breakout::{BALL_RADIUS, BreakoutGame, PADDLE_H, PADDLE_W, PADDLE_Y};
use crate::sim::chase::ChaseGame;
use crate::sim::grid::GridPos;
use crate::sim::snake::SnakeGame;

/// CSS color usable as a canvas fill style
pub type Color = &'static str;

pub mod palette {
    use super::Color;

    pub const BG: Color = "#0b0e14";
    pub const GRID_LINE: Color = "#161b26";

    pub const SNAKE_BODY: Color = "#3fb950";
    pub const SNAKE_HEAD: Color = "#7ee787";
    pub const FOOD: Color = "#f85149";

    pub const WELL_WALL: Color = "#30363d";
    pub const PIECE_I: Color = "#39c5cf";
    pub const PIECE_O: Color = "#e3b341";
    pub const PIECE_T: Color = "#bc8cff";
    pub const PIECE_S: Color = "#56d364";
    pub const PIECE_Z: Color = "#ff7b72";
    pub const PIECE_J: Color = "#58a6ff";
    pub const PIECE_L: Color = "#f0883e";

    pub const PADDLE: Color = "#c9d1d9";
    pub const BALL: Color = "#f0f6fc";
    pub const BRICK_ROWS: [Color; 6] = [
        "#ff7b72", "#f0883e", "#e3b341", "#56d364", "#39c5cf", "#bc8cff",
    ];

    pub const MAZE_WALL: Color = "#1f3a8f";
    pub const PELLET: Color = "#f2cc8f";
    pub const POWER_PELLET: Color = "#ffd84d";
    pub const PLAYER: Color = "#ffe14d";
    pub const PURSUER: [Color; 3] = ["#ff6161", "#ff9ddb", "#66d9ff"];
    pub const PURSUER_FRIGHTENED: Color = "#4d6bff";
}

/// A single drawing instruction at the fixed logical resolution
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear { color: Color },
    Rect { pos: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
}

/// One rendered frame's worth of draw commands
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub cmds: Vec<DrawCmd>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear { color });
    }

    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.cmds.push(DrawCmd::Rect { pos, size, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }
}

/// Cell-to-pixel mapping for a centered grid playfield
struct GridLayout {
    cell: f32,
    origin: Vec2,
}

impl GridLayout {
    fn centered(cols: i32, rows: i32, cell: f32) -> Self {
        let w = cols as f32 * cell;
        let h = rows as f32 * cell;
        Self {
            cell,
            origin: Vec2::new((CANVAS_W - w) / 2.0, (CANVAS_H - h) / 2.0),
        }
    }

    fn cell_pos(&self, cell: GridPos) -> Vec2 {
        self.origin + Vec2::new(cell.col as f32, cell.row as f32) * self.cell
    }

    fn cell_center(&self, cell: GridPos) -> Vec2 {
        self.cell_pos(cell) + Vec2::splat(self.cell / 2.0)
    }
}

fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => palette::PIECE_I,
        PieceKind::O => palette::PIECE_O,
        PieceKind::T => palette::PIECE_T,
        PieceKind::S => palette::PIECE_S,
        PieceKind::Z => palette::PIECE_Z,
        PieceKind::J => palette::PIECE_J,
        PieceKind::L => palette::PIECE_L,
    }
}

pub fn draw_snake(game: &SnakeGame, frame: &mut Frame) {
    frame.clear(palette::BG);
    let layout = GridLayout::centered(game.cfg.cols, game.cfg.rows, 20.0);

    // Playfield backdrop
    frame.rect(
        layout.origin,
        Vec2::new(
            game.cfg.cols as f32 * layout.cell,
            game.cfg.rows as f32 * layout.cell,
        ),
        palette::GRID_LINE,
    );

    frame.circle(
        layout.cell_center(game.food),
        layout.cell * 0.4,
        palette::FOOD,
    );

    let inset = Vec2::splat(1.0);
    let size = Vec2::splat(layout.cell) - inset * 2.0;
    for (i, &cell) in game.body.iter().enumerate() {
        let color = if i == 0 {
            palette::SNAKE_HEAD
        } else {
            palette::SNAKE_BODY
        };
        frame.rect(layout.cell_pos(cell) + inset, size, color);
    }
}

pub fn draw_blocks(game: &BlocksGame, frame: &mut Frame) {
    frame.clear(palette::BG);
    let layout = GridLayout::centered(WELL_COLS as i32, WELL_ROWS as i32, 28.0);
    let well_size = Vec2::new(
        WELL_COLS as f32 * layout.cell,
        WELL_ROWS as f32 * layout.cell,
    );

    // Well border
    let border = Vec2::splat(3.0);
    frame.rect(
        layout.origin - border,
        well_size + border * 2.0,
        palette::WELL_WALL,
    );
    frame.rect(layout.origin, well_size, palette::BG);

    let inset = Vec2::splat(1.0);
    let size = Vec2::splat(layout.cell) - inset * 2.0;

    for (row, cells) in game.well.iter().enumerate() {
        for (col, slot) in cells.iter().enumerate() {
            if let Some(kind) = slot {
                let cell = GridPos::new(col as i32, row as i32);
                frame.rect(layout.cell_pos(cell) + inset, size, piece_color(*kind));
            }
        }
    }

    for cell in game.piece.cells() {
        frame.rect(
            layout.cell_pos(cell) + inset,
            size,
            piece_color(game.piece.kind),
        );
    }

    // Next-piece preview in the top-right margin
    let preview = GridLayout {
        cell: 14.0,
        origin: Vec2::new(CANVAS_W - 70.0, 24.0),
    };
    for cell in crate::sim::blocks::Piece::spawn(game.next_kind).cells() {
        let local = GridPos::new(cell.col - (WELL_COLS as i32 - 2) / 2, cell.row);
        frame.rect(
            preview.cell_pos(local) + inset,
            Vec2::splat(preview.cell) - inset * 2.0,
            piece_color(game.next_kind),
        );
    }
}

pub fn draw_breakout(game: &BreakoutGame, frame: &mut Frame) {
    frame.clear(palette::BG);

    for brick in &game.bricks {
        frame.rect(
            brick.rect.min,
            brick.rect.size(),
            palette::BRICK_ROWS[brick.row % palette::BRICK_ROWS.len()],
        );
    }

    frame.rect(
        Vec2::new(game.paddle_x - PADDLE_W / 2.0, PADDLE_Y),
        Vec2::new(PADDLE_W, PADDLE_H),
        palette::PADDLE,
    );

    frame.circle(game.ball_pos, BALL_RADIUS, palette::BALL);
}

pub fn draw_chase(game: &ChaseGame, frame: &mut Frame) {
    frame.clear(palette::BG);
    let layout = GridLayout::centered(game.maze.cols, game.maze.rows, 24.0);

    let wall_inset = Vec2::splat(2.0);
    for row in 0..game.maze.rows {
        for col in 0..game.maze.cols {
            let cell = GridPos::new(col, row);
            if !game.maze.open(cell) {
                frame.rect(
                    layout.cell_pos(cell) + wall_inset,
                    Vec2::splat(layout.cell) - wall_inset * 2.0,
                    palette::MAZE_WALL,
                );
            }
        }
    }

    for &cell in &game.pellets {
        frame.circle(layout.cell_center(cell), 2.5, palette::PELLET);
    }
    for &cell in &game.power_pellets {
        frame.circle(layout.cell_center(cell), 6.0, palette::POWER_PELLET);
    }

    for (i, pursuer) in game.pursuers.iter().enumerate() {
        let color = if pursuer.frightened {
            palette::PURSUER_FRIGHTENED
        } else {
            palette::PURSUER[i % palette::PURSUER.len()]
        };
        frame.circle(layout.cell_center(pursuer.pos), layout.cell * 0.42, color);
    }

    frame.circle(
        layout.cell_center(game.player),
        layout.cell * 0.42,
        palette::PLAYER,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::breakout::{BRICK_COLS, BRICK_ROWS};

    #[test]
    fn test_scenes_start_with_clear() {
        let mut frame = Frame::new();
        draw_snake(&SnakeGame::new(1, 0), &mut frame);
        assert!(matches!(frame.cmds.first(), Some(DrawCmd::Clear { .. })));

        frame.cmds.clear();
        draw_breakout(&BreakoutGame::new(1, 0), &mut frame);
        assert!(matches!(frame.cmds.first(), Some(DrawCmd::Clear { .. })));
    }

    #[test]
    fn test_snake_scene_has_food_and_body() {
        let game = SnakeGame::new(1, 0);
        let mut frame = Frame::new();
        draw_snake(&game, &mut frame);

        let circles = frame
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
            .count();
        assert_eq!(circles, 1);

        // Clear + backdrop + one rect per body cell
        let rects = frame
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Rect { .. }))
            .count();
        assert_eq!(rects, 1 + game.body.len());
    }

    #[test]
    fn test_breakout_scene_tracks_brick_count() {
        let mut game = BreakoutGame::new(1, 0);
        let mut frame = Frame::new();
        draw_breakout(&game, &mut frame);
        let rects = frame
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Rect { .. }))
            .count();
        // Bricks + paddle
        assert_eq!(rects, BRICK_COLS * BRICK_ROWS + 1);

        game.bricks.clear();
        frame.cmds.clear();
        draw_breakout(&game, &mut frame);
        let rects = frame
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Rect { .. }))
            .count();
        assert_eq!(rects, 1);
    }

    #[test]
    fn test_chase_scene_draws_all_actors() {
        let game = ChaseGame::new(1, 0);
        let mut frame = Frame::new();
        draw_chase(&game, &mut frame);

        let circles = frame
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
            .count();
        // Pellets + power pellets + pursuers + player
        assert_eq!(
            circles,
            game.pellets.len() + game.power_pellets.len() + game.pursuers.len() + 1
        );
    }
}
