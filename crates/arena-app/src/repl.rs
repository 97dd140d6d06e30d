//! REPL-local controls.
//!
//! Lines starting with `:` never reach the battle parser. Everything
//! else is a battle command for [`arena_runtime::InputParser`].

use arena_types::Persona;

/// How `:open` names a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    /// 1-based position in the displayed history list.
    Index(usize),
    Id(String),
}

/// A parsed `:` control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Vote(Persona),
    Open(OpenTarget),
    New,
    Scores,
    History,
    Refresh,
    Help,
    Quit,
}

/// Names offered by tab completion.
pub const REPL_COMMANDS: &[&str] = &[
    ":vote", ":open", ":new", ":scores", ":history", ":refresh", ":help", ":quit",
];

impl ReplCommand {
    /// Parses a `:` line.
    ///
    /// Returns `None` when the line is not a control, and `Some(Err(usage))`
    /// when it is one but malformed.
    #[must_use]
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let rest = line.trim().strip_prefix(':')?;
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("").to_lowercase();
        let arg = words.next();
        let extra = words.next().is_some();

        let parsed = match (name.as_str(), arg) {
            ("vote" | "v", Some(persona)) if !extra => persona
                .parse::<Persona>()
                .map(Self::Vote)
                .map_err(|e| e.to_string()),
            ("vote" | "v", _) => Err("Usage: :vote <claude|gpt|gemini>".to_string()),
            ("open" | "o", Some(target)) if !extra => Ok(Self::Open(parse_target(target))),
            ("open" | "o", _) => Err("Usage: :open <n|id>".to_string()),
            ("new", None) => Ok(Self::New),
            ("scores" | "s", None) => Ok(Self::Scores),
            ("history" | "h", None) => Ok(Self::History),
            ("refresh" | "r", None) => Ok(Self::Refresh),
            ("help" | "?", None) => Ok(Self::Help),
            ("quit" | "q" | "exit", None) => Ok(Self::Quit),
            ("", _) => Err("Type :help for commands.".to_string()),
            (
                "new" | "scores" | "s" | "history" | "h" | "refresh" | "r" | "help" | "?" | "quit"
                | "q" | "exit",
                Some(_),
            ) => Err(format!(":{name} takes no arguments.")),
            (other, _) => Err(format!("Unknown command ':{other}'. Type :help for commands.")),
        };
        Some(parsed)
    }
}

fn parse_target(target: &str) -> OpenTarget {
    match target.parse::<usize>() {
        Ok(n) if n > 0 => OpenTarget::Index(n),
        _ => OpenTarget::Id(target.to_string()),
    }
}
