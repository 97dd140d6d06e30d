//! Stateless input parser.
//!
//! Pure function for parsing prompt input into an [`Action`].
//!
//! # Example
//!
//! ```
//! use arena_runtime::io::{Action, InputParser};
//!
//! let action = InputParser::parse("@arena 1v1 claude gpt");
//! assert_eq!(
//!     action,
//!     Action::StartBattle {
//!         matchup: "1v1".into(),
//!         topic: "claude gpt".into(),
//!     }
//! );
//!
//! assert_eq!(InputParser::parse("   "), Action::Empty);
//! ```

use super::action::{Action, DEFAULT_MATCHUP};

/// Longest accepted input, in characters.
pub const MAX_INPUT_CHARS: usize = 256;

const DETHRONE: &str = "/dethrone";
const ARENA: &str = "@arena";

/// Stateless input parser.
pub struct InputParser;

impl InputParser {
    /// Parses a line of input.
    ///
    /// The same input always produces the same action.
    ///
    /// # Input Format
    ///
    /// | Input | Action |
    /// |-------|--------|
    /// | (blank) | `Empty` |
    /// | `/dethrone <topic>` | `StartDethrone` |
    /// | `@arena <topic>` | `StartBattle` with matchup `ffa` |
    /// | `@arena <matchup> <topic...>` | `StartBattle` |
    /// | anything else | `StartBattle` with matchup `ffa`, whole line as topic |
    ///
    /// Command prefixes match case-insensitively and only as a whole word.
    /// The topic and matchup are passed through as typed.
    #[must_use]
    pub fn parse(line: &str) -> Action {
        let line = line.trim();

        if line.is_empty() {
            return Action::Empty;
        }

        if line.chars().count() > MAX_INPUT_CHARS {
            return Action::invalid("Keep commands under 256 characters.");
        }

        if let Some(rest) = strip_command(line, DETHRONE) {
            if rest.is_empty() {
                return Action::invalid("Add a topic after /dethrone.");
            }
            return Action::StartDethrone {
                topic: rest.to_string(),
            };
        }

        let (matchup, topic) = match strip_command(line, ARENA) {
            Some("") => return Action::invalid("Add a topic after @arena."),
            Some(rest) => {
                let mut words = rest.split_whitespace();
                let first = words.next().unwrap_or_default();
                let remainder: Vec<&str> = words.collect();
                if remainder.is_empty() {
                    (DEFAULT_MATCHUP.to_string(), first.to_string())
                } else {
                    (first.to_string(), remainder.join(" "))
                }
            }
            None => (DEFAULT_MATCHUP.to_string(), line.to_string()),
        };

        if topic.is_empty() {
            return Action::invalid("Provide a topic for the battle.");
        }

        Action::StartBattle { matchup, topic }
    }
}

/// Strips a command prefix, returning the trimmed remainder.
///
/// Returns `None` unless `line` starts with `command` (ignoring ASCII case)
/// followed by whitespace or the end of input.
fn strip_command<'a>(line: &'a str, command: &str) -> Option<&'a str> {
    let head = line.get(..command.len())?;
    if !head.eq_ignore_ascii_case(command) {
        return None;
    }
    let rest = &line[command.len()..];
    match rest.chars().next() {
        None => Some(""),
        Some(c) if c.is_whitespace() => Some(rest.trim()),
        Some(_) => None,
    }
}
