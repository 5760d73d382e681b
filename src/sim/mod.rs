//! Deterministic simulation cores
//!
//! All gameplay logic lives here. This module must stay pure:
//! - advanced only by the time delta the host hands in
//! - seeded RNG only
//! - no rendering or platform dependencies
//!
//! Anything the presentation layer should react to (tones, HUD flashes)
//! surfaces as a `GameEvent` pushed onto a caller-supplied buffer.

pub mod blocks;
pub mod breakout;
pub mod chase;
pub mod collision;
pub mod events;
pub mod grid;
pub mod session;
pub mod snake;

pub use events::GameEvent;
pub use grid::{Dir, GridPos, StepTimer};
pub use session::{Phase, Session};
