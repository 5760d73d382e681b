//! Events emitted by simulation ticks
//!
//! The cores never call into audio or the DOM. Each tick pushes what
//! happened onto a caller-supplied buffer and the host decides how to
//! present it (tone cues, HUD flashes). Ordering within a tick follows
//! the order the sim observed the occurrences.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Snake ate the food item
    FoodEaten,
    /// A falling piece rotated successfully
    PieceRotated,
    /// A falling piece locked into the well
    PieceLocked,
    /// N full rows removed at once (1..=4)
    LinesCleared(u8),
    /// Ball bounced off the paddle
    PaddleHit,
    /// Ball bounced off a wall or the ceiling
    WallHit,
    /// A brick was destroyed
    BrickBroken,
    /// Ball left the serve position
    BallLaunched,
    /// Maze pellet eaten
    PelletEaten,
    /// Power pellet eaten; pursuers turn frightened
    PowerPelletEaten,
    /// A frightened pursuer was eaten
    PursuerEaten,
    /// A life was lost (terminal collision)
    LifeLost,
    /// Current score exceeded the stored best for the first time this run
    NewBest,
    /// Run ended; `won` distinguishes the win overlay from game over
    GameOver { won: bool },
}
