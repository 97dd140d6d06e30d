//! State slices owned by the engine.
//!
//! Each slice is replaced field-by-field under the engine's write lock;
//! readers only ever see a cloned [`ArenaState`] snapshot.

use arena_types::{Battle, HistoryEntry, Persona, Record, Scoreboard, DEFAULT_CHAMPION};

/// Scoreboard as last fetched, with its request status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreboardSlice {
    /// Last successful fetch. Kept on later failures.
    pub data: Option<Scoreboard>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ScoreboardSlice {
    /// Current champion, `gpt` before the first fetch.
    #[must_use]
    pub fn champion(&self) -> Persona {
        self.data
            .as_ref()
            .map_or(DEFAULT_CHAMPION, Scoreboard::champion)
    }

    #[must_use]
    pub fn record(&self, persona: Persona) -> Record {
        self.data
            .as_ref()
            .map(|s| s.record(persona))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.data.as_ref().map_or(0, Scoreboard::streak)
    }
}

/// The battle on display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleSlice {
    pub current: Option<Battle>,
    /// Id of the battle most recently started or opened.
    pub active_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Recent battles, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySlice {
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Vote submission state machine.
///
/// ```text
/// Idle ──vote──▶ Submitting ──ok──▶ Success
///                     │
///                     └──err──▶ Error
/// ```
///
/// `Success` and `Error` only leave through another vote, or back to
/// `Idle` when a new command is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VoteState {
    #[default]
    Idle,
    Submitting,
    Success { winner: Persona },
    Error { message: String },
}

impl VoteState {
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArenaState {
    pub scoreboard: ScoreboardSlice,
    pub battle: BattleSlice,
    pub history: HistorySlice,
    pub vote: VoteState,
    /// Last parse/validation message from the prompt.
    pub command_error: Option<String>,
}

impl ArenaState {
    /// True while any request the engine issued is still pending.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.scoreboard.loading
            || self.battle.loading
            || self.history.loading
            || self.vote.is_submitting()
    }

    /// Whether a vote can be cast on the displayed battle.
    #[must_use]
    pub fn can_vote(&self) -> bool {
        self.battle.current.as_ref().is_some_and(Battle::is_votable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn scoreboard_defaults_before_first_fetch() {
        let slice = ScoreboardSlice::default();
        assert_eq!(slice.champion(), Persona::Gpt);
        assert_eq!(slice.record(Persona::Claude), Record::default());
        assert_eq!(slice.streak(), 0);
    }

    #[test]
    fn scoreboard_reads_fetched_data() {
        let mut records = BTreeMap::new();
        records.insert(Persona::Claude, Record { wins: 3, losses: 1 });
        let slice = ScoreboardSlice {
            data: Some(Scoreboard {
                champion: Some(Persona::Claude),
                records,
                streak: 2,
            }),
            ..ScoreboardSlice::default()
        };
        assert_eq!(slice.champion(), Persona::Claude);
        assert_eq!(slice.record(Persona::Claude).wins, 3);
        assert_eq!(slice.streak(), 2);
    }

    #[test]
    fn busy_tracks_every_slice() {
        let mut state = ArenaState::default();
        assert!(!state.is_busy());

        state.vote = VoteState::Submitting;
        assert!(state.is_busy());

        state.vote = VoteState::Idle;
        state.history.loading = true;
        assert!(state.is_busy());
    }

    #[test]
    fn cannot_vote_without_battle() {
        assert!(!ArenaState::default().can_vote());
    }
}
