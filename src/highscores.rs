//! Best score tracking
//!
//! A single persisted integer. Persisted to LocalStorage in the browser; the
//! in-memory store backs native builds and tests.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Where the best score lives between sessions.
///
/// Storage is treated as always available: implementations swallow their own
/// failures and `load` falls back to 0.
pub trait ScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, score: u32);
}

/// Process-local store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Rc<Cell<u32>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously saved value
    pub fn with_value(score: u32) -> Self {
        let store = Self::default();
        store.value.set(score);
        store
    }

    pub fn value(&self) -> u32 {
        self.value.get()
    }

    /// How many times `save` was called
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.value.get()
    }

    fn save(&mut self, score: u32) {
        self.value.set(score);
        self.saves.set(self.saves.get() + 1);
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageScoreStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "memoryGameHighScore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageScoreStore {
    fn load(&self) -> u32 {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score starts at 0");
            return 0;
        };
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable best score {:?}", raw);
                0
            }),
            _ => 0,
        }
    }

    fn save(&mut self, score: u32) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score not saved");
            return;
        };
        if storage
            .set_item(Self::STORAGE_KEY, &score.to_string())
            .is_err()
        {
            log::warn!("Failed to save best score");
        } else {
            log::info!("Best score saved ({})", score);
        }
    }
}

/// Cached best score plus its backing store
pub struct BestScore {
    value: u32,
    store: Box<dyn ScoreStore>,
}

impl fmt::Debug for BestScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BestScore")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl BestScore {
    /// Read the stored value once at startup
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let value = store.load();
        log::info!("Loaded best score {}", value);
        Self { value, store }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Would `score` become the new best?
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a finished round's score. Returns true (and persists) only when it
    /// strictly beats the current best.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        self.store.save(score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_store() {
        let best = BestScore::load(Box::new(MemoryScoreStore::with_value(950)));
        assert_eq!(best.value(), 950);
        assert_eq!(BestScore::load(Box::new(MemoryScoreStore::new())).value(), 0);
    }

    #[test]
    fn test_submit_only_on_strict_improvement() {
        let store = MemoryScoreStore::with_value(1000);
        let mut best = BestScore::load(Box::new(store.clone()));

        assert!(!best.submit(999));
        assert!(!best.submit(1000));
        assert_eq!(store.save_count(), 0);

        assert!(best.submit(1001));
        assert_eq!(best.value(), 1001);
        assert_eq!(store.value(), 1001);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_value_never_decreases() {
        let mut best = BestScore::load(Box::new(MemoryScoreStore::new()));
        let mut last = best.value();
        for score in [300, 100, 700, 650, 700, 1200, 0] {
            best.submit(score);
            assert!(best.value() >= last);
            last = best.value();
        }
        assert_eq!(best.value(), 1200);
    }
}
