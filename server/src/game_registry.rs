use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::games::SessionRng;
use common::games::snake::{Direction, GameSnapshot, SnakeGame, SnakeGameSettings};
use common::{GameId, log, log_warn};
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
pub struct RegistrySettings {
    pub game: SnakeGameSettings,
    pub tick_interval: Duration,
    /// Games older than this are dropped on the next tick, ended or not.
    pub max_game_age: Duration,
    pub rng_seed: Option<u64>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            game: SnakeGameSettings::default(),
            tick_interval: Duration::from_millis(200),
            max_game_age: Duration::from_secs(600),
            rng_seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyExists(GameId),
    NotFound(GameId),
    GameEnded(GameId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyExists(id) => write!(f, "game {} already exists", id),
            RegistryError::NotFound(id) => write!(f, "game {} not found", id),
            RegistryError::GameEnded(id) => write!(f, "game {} has already ended", id),
        }
    }
}

impl std::error::Error for RegistryError {}

/// What one sweep over the registry did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub stepped: usize,
    pub ended: Vec<GameId>,
    pub expired: Vec<GameId>,
    pub failed: Vec<GameId>,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        self.ended.is_empty() && self.expired.is_empty() && self.failed.is_empty()
    }
}

struct RegistryState {
    games: HashMap<GameId, SnakeGame>,
    rng: SessionRng,
}

/// Owns every live game. Cloning shares the same underlying map.
///
/// Lookups take the read lock; creation, removal, direction changes and the
/// tick sweep take the write lock, so a turn never interleaves with a step.
#[derive(Clone)]
pub struct GameRegistry {
    state: Arc<RwLock<RegistryState>>,
    settings: Arc<RegistrySettings>,
}

impl GameRegistry {
    pub fn new(settings: RegistrySettings) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => SessionRng::new(seed),
            None => SessionRng::from_random(),
        };
        log!("Game registry seeded with {}", rng.seed());

        Self {
            state: Arc::new(RwLock::new(RegistryState {
                games: HashMap::new(),
                rng,
            })),
            settings: Arc::new(settings),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.settings.tick_interval
    }

    pub async fn create_game(&self, id: GameId) -> Result<GameSnapshot, RegistryError> {
        self.create_game_at(id, Utc::now()).await
    }

    async fn create_game_at(&self, id: GameId, now: DateTime<Utc>) -> Result<GameSnapshot, RegistryError> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        if state.games.contains_key(&id) {
            return Err(RegistryError::AlreadyExists(id));
        }

        let game = SnakeGame::new(id.clone(), self.settings.game.clone(), now, &mut state.rng);
        let snapshot = game.snapshot();
        state.games.insert(id.clone(), game);

        log!("Game created: {} ({} live)", id, state.games.len());
        Ok(snapshot)
    }

    pub async fn get_game(&self, id: &GameId) -> Result<GameSnapshot, RegistryError> {
        let state = self.state.read().await;
        state
            .games
            .get(id)
            .map(SnakeGame::snapshot)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Reversals are silently ignored by the game itself; only unknown or
    /// ended games are reported.
    pub async fn update_direction(&self, id: &GameId, direction: Direction) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        let game = state
            .games
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        if !game.is_running() {
            return Err(RegistryError::GameEnded(id.clone()));
        }

        game.change_direction(direction);
        Ok(())
    }

    pub async fn remove_game(&self, id: &GameId) -> bool {
        let mut state = self.state.write().await;
        let removed = state.games.remove(id).is_some();
        if removed {
            log!("Game removed: {} ({} live)", id, state.games.len());
        }
        removed
    }

    pub async fn game_count(&self) -> usize {
        self.state.read().await.games.len()
    }

    pub async fn tick(&self) -> TickReport {
        self.tick_at(Utc::now()).await
    }

    /// Steps every game once, then drops games past their maximum age and any
    /// game whose step panicked.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> TickReport {
        self.sweep(now, |game, rng| game.step(now, rng)).await
    }

    async fn sweep<F>(&self, now: DateTime<Utc>, mut step: F) -> TickReport
    where
        F: FnMut(&mut SnakeGame, &mut SessionRng),
    {
        let mut state = self.state.write().await;
        let RegistryState { games, rng } = &mut *state;
        let mut report = TickReport::default();
        let mut to_remove = Vec::new();

        for (id, game) in games.iter_mut() {
            let was_running = game.is_running();
            let result = catch_unwind(AssertUnwindSafe(|| step(game, rng)));

            match result {
                Ok(()) => {
                    report.stepped += 1;
                    if was_running && !game.is_running() {
                        report.ended.push(id.clone());
                    }
                }
                Err(_) => {
                    log_warn!("[game:{}] step panicked, dropping the game", id);
                    report.failed.push(id.clone());
                    to_remove.push(id.clone());
                    continue;
                }
            }

            let age = (now - game.created_at()).to_std().unwrap_or_default();
            if age > self.settings.max_game_age {
                report.expired.push(id.clone());
                to_remove.push(id.clone());
            }
        }

        for id in &to_remove {
            games.remove(id);
        }
        for id in &report.expired {
            log!("Game expired: {}", id);
        }

        report
    }
}
