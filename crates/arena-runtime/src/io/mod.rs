//! User input handling.
//!
//! Raw text from the prompt is turned into an [`Action`] by the stateless
//! [`InputParser`]. Nothing in this module touches the network or engine
//! state; validation failures are reported as [`Action::Invalid`] and never
//! reach the remote client.
//!
//! ```text
//! "@arena 1v1 claude gpt"
//!          │
//!          ▼
//!   InputParser::parse
//!          │
//!          ▼
//! Action::StartBattle { matchup: "1v1", topic: "claude gpt" }
//! ```
//!
//! [`suggest`] provides the command hints used for tab completion.

mod action;
mod parser;
mod suggest;

pub use action::{Action, DEFAULT_MATCHUP};
pub use parser::{InputParser, MAX_INPUT_CHARS};
pub use suggest::{suggest, CommandHint, COMMAND_HINTS};
