//! Rustyline helper: tab completion and inline hints for the prompt.

use crate::repl::REPL_COMMANDS;
use arena_runtime::io::suggest;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Completes the first word of the line.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct ArenaHelper;

/// Candidates for a partially typed first word.
pub(super) fn completions(prefix: &str) -> Vec<Pair> {
    if prefix.is_empty() || prefix.contains(char::is_whitespace) {
        return Vec::new();
    }

    if prefix.starts_with(':') {
        let lower = prefix.to_lowercase();
        return REPL_COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(&lower))
            .map(|cmd| Pair {
                display: (*cmd).to_string(),
                replacement: format!("{cmd} "),
            })
            .collect();
    }

    suggest(prefix)
        .into_iter()
        .map(|hint| Pair {
            display: format!("{}  {}", hint.value, hint.description),
            replacement: format!("{} ", hint.value),
        })
        .collect()
}

impl Completer for ArenaHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = line.get(..pos).unwrap_or(line);
        Ok((0, completions(before)))
    }
}

impl Hinter for ArenaHelper {
    type Hint = String;

    /// Greys in the rest of a lone command prefix.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        match suggest(line).as_slice() {
            [only] if only.value.len() > line.len() => only.value.get(line.len()..).map(str::to_string),
            _ => None,
        }
    }
}

impl Highlighter for ArenaHelper {}

impl Validator for ArenaHelper {}

impl Helper for ArenaHelper {}
