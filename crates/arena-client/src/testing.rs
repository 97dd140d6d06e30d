//! Scriptable in-memory [`ArenaApi`] for tests.
//!
//! Each operation pops the next scripted reply from its own queue at
//! call time. A reply may be gated: the call stays pending until the
//! test releases the gate, which is how tests hold a response in flight
//! to exercise races and teardown.
//!
//! When a queue is empty the mock answers with a neutral default:
//! an empty scoreboard, an empty history, a successful vote, and a
//! `404` for battle-producing calls.
//!
//! # Example
//!
//! ```
//! use arena_client::testing::{battle, MockArenaApi};
//! use arena_client::ArenaApi;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let api = MockArenaApi::new();
//! api.push_battle(Ok(battle("b-1", "tabs vs spaces")));
//!
//! let got = api.start_battle("ffa", "tabs vs spaces").await.unwrap();
//! assert_eq!(got.id, "b-1");
//! assert_eq!(api.calls().len(), 1);
//! # }
//! ```

use crate::api::{ArenaApi, HistoryPage};
use crate::error::{RequestError, RequestErrorKind};
use arena_types::{Battle, HistoryEntry, Message, Persona, Phase, Round, Scoreboard};
use async_trait::async_trait;
use chrono::DateTime;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::oneshot;

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FetchScoreboard,
    StartBattle { matchup: String, topic: String },
    StartDethrone { topic: String },
    SubmitVote { battle_id: String, winner: Persona },
    FetchHistory(HistoryPage),
    FetchBattle { id: String },
}

/// Releases a gated reply.
///
/// Dropping the gate without calling [`Gate::release`] also releases it.
#[derive(Debug)]
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

struct Scripted<T> {
    result: Result<T, RequestError>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, RequestError> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.result
    }
}

/// In-memory arena service.
#[derive(Default)]
pub struct MockArenaApi {
    calls: Mutex<Vec<ApiCall>>,
    scoreboards: Mutex<VecDeque<Scripted<Scoreboard>>>,
    battles: Mutex<VecDeque<Scripted<Battle>>>,
    votes: Mutex<VecDeque<Scripted<()>>>,
    histories: Mutex<VecDeque<Scripted<Vec<HistoryEntry>>>>,
}

fn push<T>(queue: &Mutex<VecDeque<Scripted<T>>>, result: Result<T, RequestError>) {
    queue.lock().push_back(Scripted { result, gate: None });
}

fn push_gated<T>(queue: &Mutex<VecDeque<Scripted<T>>>, result: Result<T, RequestError>) -> Gate {
    let (tx, rx) = oneshot::channel();
    queue.lock().push_back(Scripted {
        result,
        gate: Some(rx),
    });
    Gate(tx)
}

impl MockArenaApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the next scoreboard reply.
    pub fn push_scoreboard(&self, result: Result<Scoreboard, RequestError>) {
        push(&self.scoreboards, result);
    }

    pub fn push_scoreboard_gated(&self, result: Result<Scoreboard, RequestError>) -> Gate {
        push_gated(&self.scoreboards, result)
    }

    /// Scripts the next reply of start, dethrone or fetch-by-id.
    ///
    /// These three share one queue because they all produce a battle.
    pub fn push_battle(&self, result: Result<Battle, RequestError>) {
        push(&self.battles, result);
    }

    pub fn push_battle_gated(&self, result: Result<Battle, RequestError>) -> Gate {
        push_gated(&self.battles, result)
    }

    pub fn push_vote(&self, result: Result<(), RequestError>) {
        push(&self.votes, result);
    }

    pub fn push_vote_gated(&self, result: Result<(), RequestError>) -> Gate {
        push_gated(&self.votes, result)
    }

    pub fn push_history(&self, result: Result<Vec<HistoryEntry>, RequestError>) {
        push(&self.histories, result);
    }

    pub fn push_history_gated(&self, result: Result<Vec<HistoryEntry>, RequestError>) -> Gate {
        push_gated(&self.histories, result)
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }

    fn next_battle(&self) -> Scripted<Battle> {
        self.battles.lock().pop_front().unwrap_or_else(|| Scripted {
            result: Err(RequestError::new(
                RequestErrorKind::Status(404),
                "Battle not found",
            )),
            gate: None,
        })
    }
}

#[async_trait]
impl ArenaApi for MockArenaApi {
    async fn fetch_scoreboard(&self) -> Result<Scoreboard, RequestError> {
        self.record(ApiCall::FetchScoreboard);
        let scripted = self.scoreboards.lock().pop_front();
        match scripted {
            Some(s) => s.resolve().await,
            None => Ok(Scoreboard::default()),
        }
    }

    async fn start_battle(&self, matchup: &str, topic: &str) -> Result<Battle, RequestError> {
        self.record(ApiCall::StartBattle {
            matchup: matchup.to_string(),
            topic: topic.to_string(),
        });
        self.next_battle().resolve().await
    }

    async fn start_dethrone(&self, topic: &str) -> Result<Battle, RequestError> {
        self.record(ApiCall::StartDethrone {
            topic: topic.to_string(),
        });
        self.next_battle().resolve().await
    }

    async fn submit_vote(&self, battle_id: &str, winner: Persona) -> Result<(), RequestError> {
        self.record(ApiCall::SubmitVote {
            battle_id: battle_id.to_string(),
            winner,
        });
        let scripted = self.votes.lock().pop_front();
        match scripted {
            Some(s) => s.resolve().await,
            None => Ok(()),
        }
    }

    async fn fetch_history(&self, page: HistoryPage) -> Result<Vec<HistoryEntry>, RequestError> {
        self.record(ApiCall::FetchHistory(page));
        let scripted = self.histories.lock().pop_front();
        match scripted {
            Some(s) => s.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_battle(&self, id: &str) -> Result<Battle, RequestError> {
        self.record(ApiCall::FetchBattle { id: id.to_string() });
        self.next_battle().resolve().await
    }
}

/// A three-round battle with canned messages.
#[must_use]
pub fn battle(id: &str, topic: &str) -> Battle {
    let rounds = [Phase::Opening, Phase::Rebuttal, Phase::Closer]
        .into_iter()
        .map(|phase| Round {
            phase,
            messages: Persona::ALL
                .into_iter()
                .map(|p| (p, Message::Text(format!("{p} on {topic}"))))
                .collect::<BTreeMap<_, _>>(),
        })
        .collect();
    Battle {
        id: id.to_string(),
        topic: topic.to_string(),
        matchup: "ffa".to_string(),
        rounds,
        winner: None,
        created_at: None,
    }
}

/// A history entry stamped at the Unix epoch plus `seq` seconds.
#[must_use]
pub fn history_entry(id: &str, seq: i64) -> HistoryEntry {
    HistoryEntry {
        id: id.to_string(),
        topic: format!("topic {id}"),
        matchup: "ffa".to_string(),
        winner: None,
        created_at: DateTime::from_timestamp(seq, 0).unwrap_or_default(),
    }
}

/// A non-success reply with the given message.
#[must_use]
pub fn failure(status: u16, message: &str) -> RequestError {
    RequestError::new(RequestErrorKind::Status(status), message)
}
