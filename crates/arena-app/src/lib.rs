//! Roast Arena Application Layer.
//!
//! This crate provides:
//!
//! - **ArenaApp**: one-shot and interactive modes over the engine
//! - **Renderer**: text rendering of engine snapshots
//! - **AppError**: Unified application-level error type
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  arena-types    : Persona, Battle, Scoreboard               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-client   : ArenaApi, HttpArenaClient                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-runtime  : parser, scope, engine, config             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-app      : interactive loop, rendering  ◄── HERE     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena-cli      : `arena` binary                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Error Handling Strategy
//!
//! ```text
//! Setup Errors (ConfigError, RequestError from client construction)
//!                    ↓ From impl
//!               AppError (this crate)
//!                    ↓ anyhow::Error / eprintln
//!               CLI output
//!
//! Session Errors (RequestError during a command)
//!                    ↓ engine
//!               state slice error ─▶ rendered, exit code 1 in one-shot mode
//! ```

mod app;
mod error;
mod printer_slot;
pub mod render;
pub mod repl;

pub use app::{ArenaApp, ArenaAppBuilder, LoopControl, Reply};
pub use error::AppError;
pub use printer_slot::{PrintResult, SharedPrinterSlot};
pub use render::Renderer;

pub use arena_runtime::{ArenaConfig, ConfigError, ConfigResolver};
pub use arena_types::ErrorCode;
