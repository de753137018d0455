//! Presentation layer
//!
//! Owns the scene, turns its level/score/game-over state into overlay text,
//! and handles the "Play Again?" acknowledgment, which is the only place the
//! best score is written.

use crate::best_score::BestScore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameScene, Stepper, TickInput};
use crate::storage::KeyValueStore;

pub const GAME_OVER_BANNER: &str = "GAME OVER";
pub const PLAY_AGAIN_PROMPT: &str = "Play Again?";

/// Text shown over the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub level_line: String,
    pub score_line: String,
    /// Present only once the ball has passed the paddle
    pub game_over: Option<GameOverOverlay>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverOverlay {
    pub banner: String,
    /// Shown when the score beats the stored best (not yet saved)
    pub new_high_score: Option<String>,
    pub prompt: String,
}

impl Overlay {
    pub fn new(level: u32, score: u32, is_game_over: bool, best: BestScore) -> Self {
        let game_over = is_game_over.then(|| GameOverOverlay {
            banner: GAME_OVER_BANNER.to_string(),
            new_high_score: best
                .beaten_by(score)
                .then(|| format!("New High Score: {}", score)),
            prompt: PLAY_AGAIN_PROMPT.to_string(),
        });

        Self {
            level_line: format!("Level: {}", level),
            score_line: format!("Score: {}", score),
            game_over,
        }
    }
}

/// Game instance holding the scene, its clock, and the persisted best score
pub struct App<S: KeyValueStore> {
    scene: GameScene,
    stepper: Stepper,
    best: BestScore,
    settings: Settings,
    store: S,
}

impl<S: KeyValueStore> App<S> {
    /// Start a game using settings and best score from `store`
    pub fn new(store: S) -> Self {
        let settings = Settings::load(&store);
        Self::with_settings(store, settings)
    }

    /// Start a game with explicit settings (e.g. the host's screen size)
    pub fn with_settings(store: S, settings: Settings) -> Self {
        let settings = settings.validated();
        let best = BestScore::load(&store);
        let scene = GameScene::new(settings.arena());
        let stepper = Stepper::new(settings.max_substeps);
        Self {
            scene,
            stepper,
            best,
            settings,
            store,
        }
    }

    /// Advance by one rendered frame. Returns the number of fixed ticks run.
    pub fn frame(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        let ticks = self.stepper.advance(&mut self.scene, input, frame_dt);
        for event in self.scene.drain_events() {
            self.on_event(event);
        }
        ticks
    }

    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameOver { score, level } => {
                if self.best.beaten_by(score) {
                    log::info!("New high score {} on level {} (previous {})", score, level, self.best.value());
                }
            }
            GameEvent::LevelCleared { level } => {
                log::debug!("Overlay now shows level {}", level);
            }
            GameEvent::BrickDestroyed { .. } | GameEvent::NewGame => {}
        }
    }

    pub fn overlay(&self) -> Overlay {
        Overlay::new(
            self.scene.level(),
            self.scene.score(),
            self.scene.is_game_over(),
            self.best,
        )
    }

    /// "Play Again?" tapped: save a beaten best score, then restart
    ///
    /// Ignored (returns false) while a game is still running.
    pub fn play_again(&mut self) -> bool {
        if !self.scene.is_game_over() {
            return false;
        }

        if self.best.record(self.scene.score()) {
            if let Err(e) = self.best.save(&mut self.store) {
                log::warn!("Failed to persist best score {}: {}", self.best.value(), e);
            }
        }

        self.scene.start_new_game();
        self.stepper.reset();
        true
    }

    pub fn level(&self) -> u32 {
        self.scene.level()
    }

    pub fn score(&self) -> u32 {
        self.scene.score()
    }

    pub fn is_game_over(&self) -> bool {
        self.scene.is_game_over()
    }

    pub fn best_score(&self) -> u32 {
        self.best.value()
    }

    pub fn scene(&self) -> &GameScene {
        &self.scene
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn scene_mut(&mut self) -> &mut GameScene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::{Contact, EntityKind};
    use crate::storage::{MemoryStore, StorageError};

    fn end_game(app: &mut App<impl KeyValueStore>, score: u32) {
        let scene = app.scene_mut();
        scene.update_score(score);
        let ball = scene.ball().expect("live ball");
        let floor = scene.floor();
        scene.did_begin(Contact { a: ball, b: floor });
        assert!(app.is_game_over());
    }

    fn stored_best(store: &impl KeyValueStore) -> Option<String> {
        store.get(BestScore::STORAGE_KEY).unwrap()
    }

    #[test]
    fn test_overlay_during_play() {
        let app = App::new(MemoryStore::new());
        let overlay = app.overlay();
        assert_eq!(overlay.level_line, "Level: 1");
        assert_eq!(overlay.score_line, "Score: 0");
        assert!(overlay.game_over.is_none());
    }

    #[test]
    fn test_game_over_overlay_shows_unsaved_high_score() {
        let mut store = MemoryStore::new();
        BestScore::new(20).save(&mut store).unwrap();
        let mut app = App::new(store);
        assert_eq!(app.best_score(), 20);

        end_game(&mut app, 37);
        let overlay = app.overlay();
        assert_eq!(overlay.score_line, "Score: 37");
        let game_over = overlay.game_over.expect("game over overlay");
        assert_eq!(game_over.banner, "GAME OVER");
        assert_eq!(game_over.new_high_score.as_deref(), Some("New High Score: 37"));
        assert_eq!(game_over.prompt, "Play Again?");

        // Showing it does not persist it
        assert_eq!(stored_best(app.store()).as_deref(), Some("20"));
        assert_eq!(app.best_score(), 20);
    }

    #[test]
    fn test_play_again_saves_beaten_best_and_restarts() {
        let mut app = App::new(MemoryStore::new());
        end_game(&mut app, 37);

        assert!(app.play_again());
        assert_eq!(app.best_score(), 37);
        assert_eq!(stored_best(app.store()).as_deref(), Some("37"));
        assert!(!app.is_game_over());
        assert_eq!(app.level(), 1);
        assert_eq!(app.score(), 0);
        let world = app.scene().world();
        assert_eq!(world.count(|e| e.kind == EntityKind::Ball), 1);
        assert_eq!(app.scene().brick_count(), BRICKS_PER_LEVEL);
    }

    #[test]
    fn test_play_again_keeps_higher_best() {
        let mut store = MemoryStore::new();
        BestScore::new(50).save(&mut store).unwrap();
        let mut app = App::new(store);

        end_game(&mut app, 50);
        assert!(app.overlay().game_over.and_then(|g| g.new_high_score).is_none());
        assert!(app.play_again());
        assert_eq!(app.best_score(), 50);
        assert_eq!(stored_best(app.store()).as_deref(), Some("50"));
    }

    #[test]
    fn test_play_again_ignored_while_playing() {
        let mut app = App::new(MemoryStore::new());
        app.scene_mut().update_score(5);
        assert!(!app.play_again());
        assert_eq!(app.score(), 5);
        assert_eq!(stored_best(app.store()), None);
    }

    /// Store whose writes always fail
    #[derive(Default)]
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_play_again_survives_storage_failure() {
        let mut app = App::new(ReadOnlyStore::default());
        end_game(&mut app, 12);
        assert!(app.play_again());
        assert_eq!(app.best_score(), 12);
        assert!(!app.is_game_over());
    }

    #[test]
    fn test_frame_runs_fixed_ticks_until_game_over() {
        let mut app = App::with_settings(MemoryStore::new(), Settings::default());
        let input = TickInput {
            touch_x: Some(1000.0),
        };
        let mut frames = 0;
        while !app.is_game_over() && frames < 60 * 30 {
            let ticks = app.frame(1.0 / 60.0, &input);
            assert!(ticks <= MAX_SUBSTEPS);
            frames += 1;
        }
        assert!(app.is_game_over());
        assert!(app.overlay().game_over.is_some());
        // Frames after game over leave the score alone
        let score = app.score();
        app.frame(1.0 / 60.0, &input);
        assert_eq!(app.score(), score);
    }

    #[test]
    fn test_settings_from_store() {
        let mut store = MemoryStore::new();
        Settings::for_screen(430.0, 932.0).save(&mut store).unwrap();
        let app = App::new(store);
        assert_eq!(app.settings().arena_width, 430.0);
        assert_eq!(app.scene().world().arena().height, 932.0);
    }
}
