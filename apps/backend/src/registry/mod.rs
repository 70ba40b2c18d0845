//! Concurrency-safe registry multiplexing game instances.
//!
//! The identifier map sits behind a `RwLock`: reads (`get_game`,
//! `list_games`, `game_count`) share the lock, structural writes
//! (`create_game`, `delete_game`, `cleanup_old_games`) exclude everyone
//! else. Each game is additionally wrapped in its own `Mutex`, so
//! mutating one game never serializes traffic on the map or on other
//! games. Lock order is always map before game; nothing takes them the
//! other way around.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::domain::deck::{Deck, DeckType};
use crate::domain::game::{Game, GameStatus, GameType, DEFAULT_MAX_PLAYERS};

/// Handle to one game, shared between the registry and callers.
pub type SharedGame = Arc<Mutex<Game>>;

/// Parameters for creating a game.
#[derive(Debug, Clone, Copy)]
pub struct CreateGameOptions {
    pub game_type: GameType,
    pub deck_type: DeckType,
    pub deck_count: usize,
    pub max_players: usize,
}

impl Default for CreateGameOptions {
    fn default() -> Self {
        Self {
            game_type: GameType::Blackjack,
            deck_type: DeckType::Standard,
            deck_count: 1,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

/// One row of `list_games` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: Uuid,
    pub game_type: GameType,
    pub status: GameStatus,
    pub players: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_used: OffsetDateTime,
}

/// The registry. One instance is threaded through constructors; there is
/// no process-wide singleton.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: RwLock<HashMap<Uuid, SharedGame>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game with a freshly shuffled deck and register it.
    pub fn create_game(&self, opts: CreateGameOptions) -> (Uuid, SharedGame) {
        let mut deck = Deck::with_decks_and_type(opts.deck_count, opts.deck_type);
        deck.shuffle();
        let game = Game::new(opts.game_type, deck, opts.max_players);
        let id = game.id;
        let shared = Arc::new(Mutex::new(game));
        self.games.write().insert(id, Arc::clone(&shared));
        (id, shared)
    }

    /// Fetch a game and refresh its last-used timestamp.
    ///
    /// The timestamp lives inside the per-game mutex, so the refresh
    /// happens after the map's read lock is released; the side effect
    /// never forces readers to exclude each other on the map.
    pub fn get_game(&self, id: Uuid) -> Option<SharedGame> {
        let shared = self.games.read().get(&id).cloned()?;
        shared.lock().touch();
        Some(shared)
    }

    /// Remove a game. False when the identifier is unknown.
    pub fn delete_game(&self, id: Uuid) -> bool {
        self.games.write().remove(&id).is_some()
    }

    /// Summaries of every registered game, in no particular order.
    pub fn list_games(&self) -> Vec<GameSummary> {
        self.games
            .read()
            .values()
            .map(|shared| {
                let game = shared.lock();
                GameSummary {
                    id: game.id,
                    game_type: game.game_type,
                    status: game.status(),
                    players: game.players.len(),
                    created_at: game.created_at,
                    last_used: game.last_used,
                }
            })
            .collect()
    }

    pub fn game_count(&self) -> usize {
        self.games.read().len()
    }

    /// Drop every game whose last-used timestamp is older than
    /// `now - max_age` and return how many went. The only mutation not
    /// requested by a specific game's owner.
    pub fn cleanup_old_games(&self, max_age: Duration) -> usize {
        let cutoff = OffsetDateTime::now_utc() - max_age;
        let mut games = self.games.write();
        let before = games.len();
        games.retain(|_, shared| shared.lock().last_used >= cutoff);
        let removed = before - games.len();
        if removed > 0 {
            tracing::info!(removed, "registry.cleanup");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_games_are_immediately_fetchable() {
        let registry = GameRegistry::new();
        let (id, _) = registry.create_game(CreateGameOptions::default());
        assert!(registry.get_game(id).is_some());
        assert_eq!(registry.game_count(), 1);
    }

    #[test]
    fn unknown_and_deleted_ids_report_not_found() {
        let registry = GameRegistry::new();
        assert!(registry.get_game(Uuid::new_v4()).is_none());

        let (id, _) = registry.create_game(CreateGameOptions::default());
        assert!(registry.delete_game(id));
        assert!(registry.get_game(id).is_none());
        assert!(!registry.delete_game(id));
    }

    #[test]
    fn get_game_refreshes_last_used() {
        let registry = GameRegistry::new();
        let (id, shared) = registry.create_game(CreateGameOptions::default());
        let created = shared.lock().last_used;
        registry.get_game(id);
        assert!(shared.lock().last_used >= created);
    }

    #[test]
    fn list_games_reports_one_summary_per_game() {
        let registry = GameRegistry::new();
        let (a, _) = registry.create_game(CreateGameOptions::default());
        let (b, _) = registry.create_game(CreateGameOptions {
            game_type: GameType::Cribbage,
            ..CreateGameOptions::default()
        });
        let summaries = registry.list_games();
        assert_eq!(summaries.len(), 2);
        let ids: Vec<Uuid> = summaries.iter().map(|s| s.id).collect();
        assert!(ids.contains(&a) && ids.contains(&b));
    }

    #[test]
    fn cleanup_removes_only_stale_games() {
        let registry = GameRegistry::new();
        let (stale, shared) = registry.create_game(CreateGameOptions::default());
        let (fresh, _) = registry.create_game(CreateGameOptions::default());

        shared.lock().last_used = OffsetDateTime::now_utc() - Duration::hours(2);
        let removed = registry.cleanup_old_games(Duration::hours(1));

        assert_eq!(removed, 1);
        assert!(registry.get_game(stale).is_none());
        assert!(registry.get_game(fresh).is_some());
    }

    #[test]
    fn zero_max_age_sweeps_everything_not_touched_now() {
        let registry = GameRegistry::new();
        let (_, shared) = registry.create_game(CreateGameOptions::default());
        shared.lock().last_used = OffsetDateTime::now_utc() - Duration::nanoseconds(1);
        let removed = registry.cleanup_old_games(Duration::ZERO);
        assert_eq!(removed, 1);
        assert_eq!(registry.game_count(), 0);
    }
}
