//! Best-score persistence
//!
//! One integer per game, stored under a namespaced LocalStorage key as a
//! small JSON record. Read at session start, written only when a new best
//! is achieved. Missing or malformed values default to zero; storage
//! being unavailable is never fatal.

use serde::{Deserialize, Serialize};

use crate::games::GameKind;

/// Persisted record for one game's best score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestScore {
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Namespaced storage key for a game
pub fn storage_key(kind: GameKind) -> &'static str {
    match kind {
        GameKind::Snake => "retrocade.best.snake",
        GameKind::Blocks => "retrocade.best.blocks",
        GameKind::Breakout => "retrocade.best.breakout",
        GameKind::Chase => "retrocade.best.chase",
    }
}

/// Load the stored best for a game (WASM only); 0 on any failure
#[cfg(target_arch = "wasm32")]
pub fn load(kind: GameKind) -> u32 {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(Some(json)) = storage.get_item(storage_key(kind)) {
            match serde_json::from_str::<BestScore>(&json) {
                Ok(record) => return record.score,
                Err(e) => {
                    log::warn!("Malformed best score for {kind:?}, resetting: {e}");
                }
            }
        }
    }
    0
}

/// Write a new best for a game (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save(kind: GameKind, score: u32) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        let record = BestScore {
            score,
            timestamp: js_sys::Date::now(),
        };
        if let Ok(json) = serde_json::to_string(&record) {
            let _ = storage.set_item(storage_key(kind), &json);
            log::info!("Best score saved for {kind:?}: {score}");
        }
    }
}

/// Native stubs: best scores live only in memory for the session
#[cfg(not(target_arch = "wasm32"))]
pub fn load(_kind: GameKind) -> u32 {
    0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(_kind: GameKind, _score: u32) {
    // No-op for native
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct_and_namespaced() {
        let keys = [
            storage_key(GameKind::Snake),
            storage_key(GameKind::Blocks),
            storage_key(GameKind::Breakout),
            storage_key(GameKind::Chase),
        ];
        for (i, a) in keys.iter().enumerate() {
            assert!(a.starts_with("retrocade.best."));
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
