//! Game settings
//!
//! Arena size and simulation limits. Persisted as JSON in the same store as
//! the best score.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Arena;
use crate::storage::{self, KeyValueStore, StorageError};

/// Narrowest arena where the ball can still reach the outer bricks of a row
///
/// Rows are 400 wide and centred, so on narrower screens the outer bricks clip
/// off the edges. Below this width they would sit beyond the ball's reach and
/// a level could never be cleared.
pub const MIN_ARENA_WIDTH: f32 = 320.0;
/// Shortest arena that keeps the brick grid above the paddle
pub const MIN_ARENA_HEIGHT: f32 = 400.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Arena width in points
    pub arena_width: f32,
    /// Arena height in points
    pub arena_height: f32,
    /// Maximum fixed ticks per rendered frame
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Store key
    const STORAGE_KEY: &'static str = "settings";

    /// Settings for a given screen size
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self {
            arena_width: width,
            arena_height: height,
            ..Self::default()
        }
    }

    fn width_ok(&self) -> bool {
        self.arena_width.is_finite() && self.arena_width >= MIN_ARENA_WIDTH
    }

    fn height_ok(&self) -> bool {
        self.arena_height.is_finite() && self.arena_height >= MIN_ARENA_HEIGHT
    }

    /// Whether every value can host a game as-is
    pub fn is_valid(&self) -> bool {
        self.width_ok() && self.height_ok() && self.max_substeps > 0
    }

    /// Replace each unusable value with its default, keeping the rest
    pub fn validated(self) -> Self {
        if self.is_valid() {
            return self;
        }
        let defaults = Self::default();
        let settings = Self {
            arena_width: if self.width_ok() { self.arena_width } else { defaults.arena_width },
            arena_height: if self.height_ok() { self.arena_height } else { defaults.arena_height },
            max_substeps: if self.max_substeps > 0 { self.max_substeps } else { defaults.max_substeps },
        };
        log::warn!(
            "Invalid settings ({}x{}, {} substeps), using {}x{}, {} substeps",
            self.arena_width,
            self.arena_height,
            self.max_substeps,
            settings.arena_width,
            settings.arena_height,
            settings.max_substeps
        );
        settings
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Load settings from the store
    pub fn load(store: &impl KeyValueStore) -> Self {
        match storage::load_json::<Settings>(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.validated()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        storage::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
