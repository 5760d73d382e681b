//! Rendering pipeline
//!
//! `scene` turns game state into a flat draw-command list (pure, testable);
//! `canvas` replays that list against the 2D context on wasm.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::{Color, DrawCmd, Frame};
