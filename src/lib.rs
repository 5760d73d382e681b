//! Retrocade - four classic arcade games on one canvas
//!
//! Core modules:
//! - `sim`: deterministic game cores (grid movement, collision, pursuit AI)
//! - `renderer`: pure state-to-draw-command translation + canvas executor
//! - `games`: router that switches the cabinet between the four cores
//! - `input`: raw key strings mapped to typed intents
//! - `bestscore`: one persisted best-score integer per game

pub mod bestscore;
pub mod games;
pub mod input;
pub mod renderer;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use games::{ActiveGame, GameKind};
pub use input::Intent;
pub use sim::GameEvent;

/// Cabinet-wide configuration constants
pub mod consts {
    /// Logical canvas resolution (pixels); the surface never resizes
    pub const CANVAS_W: f32 = 480.0;
    pub const CANVAS_H: f32 = 640.0;

    /// Frame delta cap so a stalled tab resumes without a catch-up burst
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Max whole grid steps one frame may advance a single actor
    pub const MAX_CATCHUP_STEPS: u32 = 4;

    /// Fixed substep for continuous-space integration (breakout)
    pub const PHYS_DT: f32 = 1.0 / 240.0;
    /// Maximum physics substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Duration of the transient life-lost banner, in sim seconds
    pub const LIFE_LOST_SECS: f32 = 1.5;
}
