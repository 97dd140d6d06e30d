//! Remote client for the roast arena service.
//!
//! The orchestration engine depends only on the [`ArenaApi`] trait;
//! [`HttpArenaClient`] is the production transport and
//! [`testing::MockArenaApi`] the scripted one.
//!
//! # Endpoints
//!
//! | Operation | Method & path | Body | Success |
//! |-----------|---------------|------|---------|
//! | Scoreboard | `GET /arena/scoreboard` | - | `Scoreboard` |
//! | Start battle | `POST /arena/battle` | `{matchup, topic}` | `Battle` |
//! | Dethrone | `POST /arena/dethrone` | `{topic}` | `Battle` |
//! | Vote | `POST /arena/vote` | `{battle_id, winner}` | empty |
//! | History | `GET /arena/battles?limit=&offset=` | - | `[HistoryEntry]` |
//! | Battle by id | `GET /arena/battles/{id}` | - | `Battle` |
//!
//! # Errors
//!
//! Every failure is a [`RequestError`] whose display string is the
//! user-facing message. For non-2xx replies that message comes from the
//! `detail` field of the error body, or is `Request failed with <status>`.

mod api;
mod error;
mod http;
pub mod testing;

pub use api::{ArenaApi, HistoryPage, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use error::{RequestError, RequestErrorKind};
pub use http::{HttpArenaClient, DEFAULT_BASE_URL};
