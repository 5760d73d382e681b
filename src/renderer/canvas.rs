//! Canvas 2D backend: replays a `Frame` against the drawing context

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::scene::{DrawCmd, Frame};
use crate::consts::{CANVAS_H, CANVAS_W};

/// Owns the 2D context for the cabinet canvas
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Replay one frame's draw commands in order
    pub fn paint(&self, frame: &Frame) {
        for cmd in &frame.cmds {
            match cmd {
                DrawCmd::Clear { color } => {
                    self.ctx.set_fill_style_str(color);
                    self.ctx
                        .fill_rect(0.0, 0.0, CANVAS_W as f64, CANVAS_H as f64);
                }
                DrawCmd::Rect { pos, size, color } => {
                    self.ctx.set_fill_style_str(color);
                    self.ctx
                        .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    self.ctx.set_fill_style_str(color);
                    self.ctx.begin_path();
                    let _ = self
                        .ctx
                        .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU);
                    self.ctx.fill();
                }
            }
        }
    }
}
