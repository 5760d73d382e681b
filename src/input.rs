//! Input mapping: raw key strings to typed intents
//!
//! Decouples physical keys from game semantics. The cores only ever see
//! `Intent`s; what a `Move` or `Primary` means is up to each game
//! (steer, shift, rotate, launch).

use crate::games::GameKind;
use crate::sim::grid::Dir;

/// A semantic input intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(Dir),
    /// The per-game action key: launch (breakout), hard drop (blocks)
    Primary,
    Pause,
    Restart,
    Mute,
    /// Switch the cabinet to another game
    Select(GameKind),
}

/// Map a DOM `KeyboardEvent::key()` value to an intent
pub fn map_key(key: &str) -> Option<Intent> {
    let intent = match key {
        "ArrowUp" | "w" | "W" => Intent::Move(Dir::Up),
        "ArrowDown" | "s" | "S" => Intent::Move(Dir::Down),
        "ArrowLeft" | "a" | "A" => Intent::Move(Dir::Left),
        "ArrowRight" | "d" | "D" => Intent::Move(Dir::Right),
        " " | "Enter" => Intent::Primary,
        "Escape" | "p" | "P" => Intent::Pause,
        "r" | "R" => Intent::Restart,
        "m" | "M" => Intent::Mute,
        "1" => Intent::Select(GameKind::Snake),
        "2" => Intent::Select(GameKind::Blocks),
        "3" => Intent::Select(GameKind::Breakout),
        "4" => Intent::Select(GameKind::Chase),
        _ => return None,
    };
    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_agree() {
        assert_eq!(map_key("ArrowUp"), map_key("w"));
        assert_eq!(map_key("ArrowDown"), map_key("S"));
        assert_eq!(map_key("ArrowLeft"), Some(Intent::Move(Dir::Left)));
        assert_eq!(map_key("d"), Some(Intent::Move(Dir::Right)));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(map_key(" "), Some(Intent::Primary));
        assert_eq!(map_key("Escape"), Some(Intent::Pause));
        assert_eq!(map_key("r"), Some(Intent::Restart));
        assert_eq!(map_key("m"), Some(Intent::Mute));
        assert_eq!(map_key("2"), Some(Intent::Select(GameKind::Blocks)));
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        assert_eq!(map_key("F5"), None);
        assert_eq!(map_key("Tab"), None);
    }
}
