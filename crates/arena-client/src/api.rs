//! The remote operations the engine depends on.

use crate::RequestError;
use arena_types::{Battle, HistoryEntry, Persona, Scoreboard};
use async_trait::async_trait;

/// Default number of history entries per page.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Upper bound the service accepts for `limit`.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Pagination window for the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub limit: u32,
    pub offset: u32,
}

impl HistoryPage {
    #[must_use]
    pub const fn first(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self::first(DEFAULT_HISTORY_LIMIT)
    }
}

/// The six requests the arena service exposes.
///
/// Every method either yields the decoded payload or a [`RequestError`];
/// none of them retries.
#[async_trait]
pub trait ArenaApi: Send + Sync {
    /// `GET /arena/scoreboard`
    async fn fetch_scoreboard(&self) -> Result<Scoreboard, RequestError>;

    /// `POST /arena/battle` with `{matchup, topic}`
    async fn start_battle(&self, matchup: &str, topic: &str) -> Result<Battle, RequestError>;

    /// `POST /arena/dethrone` with `{topic}`
    async fn start_dethrone(&self, topic: &str) -> Result<Battle, RequestError>;

    /// `POST /arena/vote` with `{battle_id, winner}`
    async fn submit_vote(&self, battle_id: &str, winner: Persona) -> Result<(), RequestError>;

    /// `GET /arena/battles?limit=&offset=`, most recent first.
    async fn fetch_history(&self, page: HistoryPage) -> Result<Vec<HistoryEntry>, RequestError>;

    /// `GET /arena/battles/{id}`
    async fn fetch_battle(&self, id: &str) -> Result<Battle, RequestError>;
}
