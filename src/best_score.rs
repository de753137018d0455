//! Best score
//!
//! A single integer persisted in the key-value store under `bestScore`.
//! It only ever goes up.

use crate::storage::{self, KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    /// Store key
    pub const STORAGE_KEY: &'static str = "bestScore";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether `score` would be a new best
    pub fn beaten_by(&self, score: u32) -> bool {
        score > self.value
    }

    /// Raise the best to `score` if it is strictly higher. Returns true if raised.
    pub fn record(&mut self, score: u32) -> bool {
        if !self.beaten_by(score) {
            return false;
        }
        self.value = score;
        true
    }

    /// Load from the store; missing or unreadable values count as 0
    pub fn load(store: &impl KeyValueStore) -> Self {
        match storage::load_json::<u32>(store, Self::STORAGE_KEY) {
            Some(value) => {
                log::info!("Loaded best score {}", value);
                Self { value }
            }
            None => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        storage::save_json(store, Self::STORAGE_KEY, &self.value)?;
        log::info!("Best score saved ({})", self.value);
        Ok(())
    }
}
