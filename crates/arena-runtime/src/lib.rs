//! Arena Runtime - parsing, orchestration and configuration.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Foundation Layer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-types  : Persona, Battle, Scoreboard, ErrorCode      │
//! │  arena-client : ArenaApi, HttpArenaClient, RequestError     │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  io/     : InputParser, Action, command hints               │
//! │  scope   : CancellationScope                                │
//! │  engine/ : ArenaEngine, ArenaState slices                   │
//! │  config/ : ArenaConfig, ConfigLoader, ConfigResolver        │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  (arena-app: ArenaApp + AppError)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (arena-cli)                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`io`] - Prompt Input
//!
//! - [`InputParser`](io::InputParser): text to [`Action`](io::Action)
//! - [`suggest`](io::suggest): command completion hints
//!
//! ## [`engine`] - Orchestration
//!
//! - [`ArenaEngine`](engine::ArenaEngine): owns and writes all state
//! - [`ArenaState`](engine::ArenaState): scoreboard, battle, history, vote
//!
//! ## [`config`] - Configuration Management
//!
//! Layered TOML + environment configuration, see the module docs.

pub mod config;
pub mod engine;
pub mod io;
mod scope;

pub use config::{ArenaConfig, ConfigError, ConfigLoader, ConfigResolver};
pub use engine::{ArenaEngine, ArenaState, EngineOptions, VoteState};
pub use io::{Action, InputParser};
pub use scope::CancellationScope;
