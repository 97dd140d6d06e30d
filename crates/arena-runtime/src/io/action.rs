//! Parsed user actions.

/// Matchup used when the input does not name one.
pub const DEFAULT_MATCHUP: &str = "ffa";

/// Result of parsing one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Blank input. Callers treat this as a no-op, not an error.
    Empty,

    /// Start a battle between the personas.
    StartBattle { matchup: String, topic: String },

    /// Challenge the current champion.
    StartDethrone { topic: String },

    /// The input was rejected before reaching the network.
    Invalid { reason: String },
}

impl Action {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Returns true if this action issues a remote request.
    #[must_use]
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::StartBattle { .. } | Self::StartDethrone { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_classification() {
        let battle = Action::StartBattle {
            matchup: DEFAULT_MATCHUP.into(),
            topic: "cats".into(),
        };
        assert!(battle.is_dispatch());

        assert!(!Action::Empty.is_dispatch());
        assert!(!Action::invalid("nope").is_dispatch());
    }
}
