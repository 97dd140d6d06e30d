//! Core types for the roast arena client.
//!
//! This crate holds the data model shared by every other layer: the
//! personas that fight, the battles they fight in, the scoreboard that
//! tracks them, and the [`ErrorCode`] interface all error types implement.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  arena-types    : Persona, Battle, Scoreboard  ◄── HERE     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-client   : ArenaApi, HttpArenaClient                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-runtime  : parser, scope, engine, config             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-app      : interactive loop, rendering               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-cli      : `arena` binary                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All types are received from the service and are immutable once
//! decoded; the client replaces them wholesale, never in place.
//!
//! # Example
//!
//! ```
//! use arena_types::{Battle, Persona, Phase};
//!
//! let json = r#"{
//!     "id": "b-1",
//!     "topic": "tabs vs spaces",
//!     "matchup": "ffa",
//!     "rounds": [{"phase": "closer", "claude": "a", "gpt": "b", "gemini": "c"}],
//!     "winner": null
//! }"#;
//! let battle: Battle = serde_json::from_str(json).unwrap();
//! assert_eq!(battle.rounds[0].phase, Phase::Closer);
//! assert_eq!(battle.rounds[0].message(Persona::Gpt).text, "b");
//! assert!(battle.is_votable());
//! ```

mod battle;
mod error;
mod history;
mod persona;
mod scoreboard;
pub mod timestamp;

pub use battle::{Battle, Message, MessageStatus, NormalizedMessage, Phase, PhaseParseError, Round};
pub use error::ErrorCode;
pub use history::HistoryEntry;
pub use persona::{Persona, PersonaParseError, DEFAULT_CHAMPION};
pub use scoreboard::{Record, Scoreboard};
