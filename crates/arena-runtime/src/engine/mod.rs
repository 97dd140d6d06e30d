//! Orchestration engine.
//!
//! ```text
//! ┌──────────────┐   parse    ┌──────────────┐  ArenaApi  ┌──────────────┐
//! │ prompt input │──────────▶│ ArenaEngine  │───────────▶│ arena service│
//! └──────────────┘            │              │◀───────────│              │
//!                             │  ArenaState  │            └──────────────┘
//!                             │  ├ scoreboard│
//!                             │  ├ battle    │
//!                             │  ├ history   │
//!                             │  └ vote      │
//!                             └──────┬───────┘
//!                                    │ snapshot()
//!                                    ▼
//!                              presentation
//! ```
//!
//! The engine is the only writer of [`ArenaState`]. Remote failures never
//! escape it: each one becomes an error field on the slice it concerns,
//! and the other slices stay usable.

#[allow(clippy::module_inception)]
mod engine;
mod state;

pub use engine::{votable_battle_id, ArenaEngine, EngineOptions};
pub use state::{ArenaState, BattleSlice, HistorySlice, ScoreboardSlice, VoteState};
