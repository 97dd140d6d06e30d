//! ArenaEngine - orchestration over the remote client.
//!
//! The [`ArenaEngine`] owns every state slice and is the only writer.
//! Each operation is a chain of remote calls and state writes:
//!
//! ```text
//! handle_command ─▶ begin ─▶ start_battle/start_dethrone ─▶ battle set ─┬▶ loading cleared
//!                                                                        └▶ spawn history refresh
//! handle_vote ─▶ submitting ─▶ submit_vote ─▶ success ─▶ scoreboard refresh ─▶ spawn history refresh
//! select_from_history ─▶ loading ─▶ fetch_battle ─▶ battle set / error ─▶ loading cleared
//! ```
//!
//! # Writes and Teardown
//!
//! Every write goes through one commit point that takes the state lock
//! and checks the [`CancellationScope`]. [`ArenaEngine::teardown`] closes
//! the scope under the same lock, so once it returns no pending request
//! can change the state.
//!
//! # Races
//!
//! Independent operations are not ordered against each other. Two
//! concurrent commands both write the battle slice and the one whose
//! response resolves last wins.

use super::state::{ArenaState, VoteState};
use crate::config::ArenaConfig;
use crate::io::{Action, InputParser};
use crate::scope::CancellationScope;
use arena_client::{ArenaApi, HistoryPage};
use arena_types::{ErrorCode, Persona};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Tunables for [`ArenaEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    /// Page requested by every history refresh.
    pub history_page: HistoryPage,
}

impl EngineOptions {
    #[must_use]
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self {
            history_page: HistoryPage::first(config.api.history_limit),
        }
    }
}

struct Inner {
    api: Arc<dyn ArenaApi>,
    scope: CancellationScope,
    state: RwLock<ArenaState>,
    options: EngineOptions,
    /// Detached history refreshes, awaited by [`ArenaEngine::settle`].
    background: Mutex<Vec<JoinHandle<()>>>,
}

/// Orchestration engine.
///
/// Cheap to clone; clones share state and scope.
///
/// # Example
///
/// ```
/// use arena_client::testing::{battle, MockArenaApi};
/// use arena_runtime::{ArenaEngine, EngineOptions};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let api = Arc::new(MockArenaApi::new());
/// api.push_battle(Ok(battle("b-1", "pineapple pizza")));
///
/// let engine = ArenaEngine::new(api, EngineOptions::default());
/// engine.handle_command("pineapple pizza").await;
/// engine.settle().await;
///
/// let state = engine.snapshot();
/// assert_eq!(state.battle.active_id.as_deref(), Some("b-1"));
/// # }
/// ```
#[derive(Clone)]
pub struct ArenaEngine {
    inner: Arc<Inner>,
}

impl ArenaEngine {
    /// Creates an engine with a live scope and empty state.
    pub fn new(api: Arc<dyn ArenaApi>, options: EngineOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                scope: CancellationScope::new(),
                state: RwLock::new(ArenaState::default()),
                options,
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.scope.is_live()
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ArenaState {
        self.inner.state.read().clone()
    }

    /// Closes the scope. Later state writes are dropped.
    ///
    /// Returns `true` for the call that performed the teardown.
    pub fn teardown(&self) -> bool {
        let _state = self.inner.state.write();
        let closed = self.inner.scope.close();
        if closed {
            debug!("Engine torn down");
        }
        closed
    }

    /// Loads the scoreboard and the first history page concurrently.
    pub async fn initialize(&self) {
        tokio::join!(self.refresh_scoreboard(), self.refresh_history());
    }

    /// Parses `input` and dispatches the resulting action.
    ///
    /// Completes once the battle slice is written. The history refresh
    /// that follows a successful start runs in the background.
    pub async fn handle_command(&self, input: &str) {
        let result = match InputParser::parse(input) {
            Action::Empty => return,
            Action::Invalid { reason } => {
                debug!(reason = %reason, "Rejected command");
                self.commit("command_error", |s| s.command_error = Some(reason));
                return;
            }
            Action::StartBattle { matchup, topic } => {
                if !self.begin_command() {
                    return;
                }
                info!(matchup = %matchup, topic = %topic, "Starting battle");
                self.inner.api.start_battle(&matchup, &topic).await
            }
            Action::StartDethrone { topic } => {
                if !self.begin_command() {
                    return;
                }
                info!(topic = %topic, "Starting dethrone");
                self.inner.api.start_dethrone(&topic).await
            }
        };

        match result {
            Ok(battle) => {
                let id = battle.id.clone();
                let committed = self.commit("battle", |s| {
                    s.battle.active_id = non_empty(id);
                    s.battle.current = Some(battle);
                });
                if committed {
                    self.spawn_history_refresh();
                }
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "Battle request failed");
                self.commit("battle_error", |s| {
                    s.battle.current = None;
                    s.battle.error = Some(err.to_string());
                });
            }
        }

        self.commit("battle_loading", |s| s.battle.loading = false);
    }

    /// Submits a vote for `winner` on `battle_id`.
    ///
    /// An absent or empty id is a no-op. On success the scoreboard is
    /// refreshed before this returns; the history refresh that follows
    /// runs in the background.
    pub async fn handle_vote(&self, battle_id: Option<&str>, winner: Persona) {
        let Some(battle_id) = battle_id.filter(|id| !id.is_empty()) else {
            return;
        };

        if !self.commit("vote", |s| s.vote = VoteState::Submitting) {
            return;
        }
        info!(battle_id, winner = %winner, "Submitting vote");

        match self.inner.api.submit_vote(battle_id, winner).await {
            Ok(()) => {
                if !self.commit("vote", |s| s.vote = VoteState::Success { winner }) {
                    return;
                }
                self.refresh_scoreboard().await;
                self.spawn_history_refresh();
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "Vote failed");
                self.commit("vote", |s| {
                    s.vote = VoteState::Error {
                        message: err.to_string(),
                    };
                });
            }
        }
    }

    /// Opens a past battle by id.
    ///
    /// On failure the previously displayed battle stays visible.
    pub async fn select_from_history(&self, id: Option<&str>) {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return;
        };

        let begun = self.commit("battle_loading", |s| {
            s.battle.error = None;
            s.battle.loading = true;
        });
        if !begun {
            return;
        }
        debug!(battle_id = id, "Opening battle from history");

        match self.inner.api.fetch_battle(id).await {
            Ok(battle) => {
                self.commit("battle", |s| {
                    s.battle.current = Some(battle);
                    s.battle.active_id = Some(id.to_string());
                });
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, battle_id = id, "Battle fetch failed");
                self.commit("battle_error", |s| s.battle.error = Some(err.to_string()));
            }
        }

        self.commit("battle_loading", |s| s.battle.loading = false);
    }

    /// Clears the displayed battle so a new one can be started.
    pub fn new_battle(&self) {
        self.commit("battle", |s| {
            s.battle.current = None;
            s.battle.active_id = None;
            s.battle.error = None;
        });
    }

    /// Re-fetches the scoreboard.
    ///
    /// A failure keeps the previous scoreboard and records the error.
    pub async fn refresh_scoreboard(&self) {
        if !self.commit("scoreboard_loading", |s| s.scoreboard.loading = true) {
            return;
        }

        match self.inner.api.fetch_scoreboard().await {
            Ok(scoreboard) => {
                self.commit("scoreboard", |s| {
                    s.scoreboard.data = Some(scoreboard);
                    s.scoreboard.error = None;
                });
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "Scoreboard refresh failed");
                self.commit("scoreboard_error", |s| {
                    s.scoreboard.error = Some(err.to_string());
                });
            }
        }

        self.commit("scoreboard_loading", |s| s.scoreboard.loading = false);
    }

    /// Re-fetches the configured history page.
    pub async fn refresh_history(&self) {
        self.refresh_history_page(self.inner.options.history_page).await;
    }

    /// Re-fetches an explicit history page.
    ///
    /// A failure keeps the previous entries and records the error.
    pub async fn refresh_history_page(&self, page: HistoryPage) {
        if !self.commit("history_loading", |s| s.history.loading = true) {
            return;
        }

        match self.inner.api.fetch_history(page).await {
            Ok(entries) => {
                debug!(
                    count = entries.len(),
                    limit = page.limit,
                    offset = page.offset,
                    "History loaded"
                );
                self.commit("history", |s| {
                    s.history.entries = entries;
                    s.history.error = None;
                });
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "History refresh failed");
                self.commit("history_error", |s| s.history.error = Some(err.to_string()));
            }
        }

        self.commit("history_loading", |s| s.history.loading = false);
    }

    /// Waits for every background task spawned so far.
    ///
    /// Tasks spawned while waiting are awaited too.
    pub async fn settle(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.inner.background.lock());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    warn!(error = %e, "Background task failed");
                }
            }
        }
    }

    /// Clears both battle errors and resets the vote before a dispatch.
    fn begin_command(&self) -> bool {
        self.commit("battle_loading", |s| {
            s.command_error = None;
            s.battle.error = None;
            s.vote = VoteState::Idle;
            s.battle.loading = true;
        })
    }

    fn spawn_history_refresh(&self) {
        let engine = self.clone();
        let task = tokio::spawn(async move { engine.refresh_history().await });
        let mut tasks = self.inner.background.lock();
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    /// Applies `write` unless the scope is closed.
    ///
    /// Returns whether the write happened.
    fn commit(&self, slice: &'static str, write: impl FnOnce(&mut ArenaState)) -> bool {
        let mut state = self.inner.state.write();
        if !self.inner.scope.is_live() {
            trace!(slice, "Scope closed, dropping write");
            return false;
        }
        write(&mut state);
        true
    }
}

impl std::fmt::Debug for ArenaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaEngine")
            .field("live", &self.is_live())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

fn non_empty(id: String) -> Option<String> {
    (!id.is_empty()).then_some(id)
}

/// Id of the displayed battle, if it can take a vote.
#[must_use]
pub fn votable_battle_id(state: &ArenaState) -> Option<&str> {
    state
        .battle
        .current
        .as_ref()
        .filter(|b| b.is_votable())
        .map(|b| b.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BattleSlice;
    use arena_client::testing::{battle, failure, ApiCall, MockArenaApi};

    fn engine_with(api: &Arc<MockArenaApi>) -> ArenaEngine {
        ArenaEngine::new(api.clone(), EngineOptions::default())
    }

    #[tokio::test]
    async fn empty_command_is_noop() {
        let api = Arc::new(MockArenaApi::new());
        let engine = engine_with(&api);

        engine.handle_command("   ").await;

        assert!(api.calls().is_empty());
        assert_eq!(engine.snapshot(), ArenaState::default());
    }

    #[tokio::test]
    async fn invalid_command_sets_command_error_only() {
        let api = Arc::new(MockArenaApi::new());
        let engine = engine_with(&api);

        engine.handle_command("/dethrone").await;

        let state = engine.snapshot();
        assert_eq!(
            state.command_error.as_deref(),
            Some("Add a topic after /dethrone.")
        );
        assert_eq!(state.battle, BattleSlice::default());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_command_sets_battle_and_refreshes_history() {
        let api = Arc::new(MockArenaApi::new());
        api.push_battle(Ok(battle("b-1", "pineapple pizza")));
        let engine = engine_with(&api);

        engine.handle_command("pineapple pizza").await;
        engine.settle().await;

        let state = engine.snapshot();
        assert_eq!(state.battle.current.as_ref().map(|b| b.id.as_str()), Some("b-1"));
        assert_eq!(state.battle.active_id.as_deref(), Some("b-1"));
        assert!(!state.battle.loading);
        assert_eq!(
            api.calls(),
            vec![
                ApiCall::StartBattle {
                    matchup: "ffa".into(),
                    topic: "pineapple pizza".into()
                },
                ApiCall::FetchHistory(HistoryPage::default()),
            ]
        );
    }

    #[tokio::test]
    async fn dethrone_dispatches_dethrone() {
        let api = Arc::new(MockArenaApi::new());
        api.push_battle(Ok(battle("d-1", "gpt supremacy")));
        let engine = engine_with(&api);

        engine.handle_command("/dethrone gpt supremacy").await;

        assert_eq!(
            api.calls()[0],
            ApiCall::StartDethrone {
                topic: "gpt supremacy".into()
            }
        );
    }

    #[tokio::test]
    async fn failed_command_clears_battle() {
        let api = Arc::new(MockArenaApi::new());
        api.push_battle(Ok(battle("b-1", "first")));
        api.push_battle(Err(failure(500, "Request failed with 500")));
        let engine = engine_with(&api);

        engine.handle_command("first").await;
        engine.handle_command("second").await;

        let state = engine.snapshot();
        assert!(state.battle.current.is_none());
        assert_eq!(state.battle.error.as_deref(), Some("Request failed with 500"));
        assert!(!state.battle.loading);
    }

    #[tokio::test]
    async fn vote_without_id_is_noop() {
        let api = Arc::new(MockArenaApi::new());
        let engine = engine_with(&api);

        engine.handle_vote(None, Persona::Claude).await;
        engine.handle_vote(Some(""), Persona::Claude).await;

        assert!(api.calls().is_empty());
        assert_eq!(engine.snapshot().vote, VoteState::Idle);
    }

    #[tokio::test]
    async fn new_battle_clears_display() {
        let api = Arc::new(MockArenaApi::new());
        api.push_battle(Ok(battle("b-1", "x")));
        let engine = engine_with(&api);
        engine.handle_command("x").await;

        engine.new_battle();

        let state = engine.snapshot();
        assert!(state.battle.current.is_none());
        assert!(state.battle.active_id.is_none());
        assert!(state.battle.error.is_none());
    }

    #[tokio::test]
    async fn teardown_only_once() {
        let api = Arc::new(MockArenaApi::new());
        let engine = engine_with(&api);

        assert!(engine.is_live());
        assert!(engine.teardown());
        assert!(!engine.teardown());
        assert!(!engine.is_live());
    }

    #[test]
    fn votable_id_requires_closer_round() {
        let mut state = ArenaState::default();
        assert_eq!(votable_battle_id(&state), None);

        state.battle.current = Some(battle("b-9", "t"));
        assert_eq!(votable_battle_id(&state), Some("b-9"));

        if let Some(b) = state.battle.current.as_mut() {
            b.rounds.clear();
        }
        assert_eq!(votable_battle_id(&state), None);
    }

    #[test]
    fn options_follow_config_limit() {
        let mut config = ArenaConfig::default();
        config.api.history_limit = 50;
        assert_eq!(
            EngineOptions::from_config(&config).history_page,
            HistoryPage::first(50)
        );
    }
}
