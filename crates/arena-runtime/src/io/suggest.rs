//! Command hints for completion.

/// A recognized command prefix and its one-line description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHint {
    pub value: &'static str,
    pub description: &'static str,
}

/// All command prefixes understood by the parser.
pub const COMMAND_HINTS: [CommandHint; 2] = [
    CommandHint {
        value: "@arena",
        description: "Start a new battle",
    },
    CommandHint {
        value: "/dethrone",
        description: "Challenge the current champ",
    },
];

/// Returns the hints matching the first word of `input`.
///
/// Only input starting with `@` or `/` gets hints.
#[must_use]
pub fn suggest(input: &str) -> Vec<CommandHint> {
    let trimmed = input.trim_start();
    if !trimmed.starts_with(['@', '/']) {
        return Vec::new();
    }
    let token = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    COMMAND_HINTS
        .into_iter()
        .filter(|hint| hint.value.starts_with(&token))
        .collect()
}
