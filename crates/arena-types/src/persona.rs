//! Arena contestants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Champion assumed when the scoreboard does not name one.
pub const DEFAULT_CHAMPION: Persona = Persona::Gpt;

/// One of the fixed contestants the service scores responses for.
///
/// Serialized as its lowercase id (`"claude"`, `"gpt"`, `"gemini"`),
/// which is also how the service keys records and rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Claude,
    Gpt,
    Gemini,
}

impl Persona {
    /// All personas in display order.
    pub const ALL: [Self; 3] = [Self::Claude, Self::Gpt, Self::Gemini];

    /// Wire id of the persona.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Gpt => "gpt",
            Self::Gemini => "gemini",
        }
    }

    /// Human-facing name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Gpt => "GPT",
            Self::Gemini => "Gemini",
        }
    }

    /// Short epithet shown next to the name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Claude => "The Blunt Hammer",
            Self::Gpt => "The Surgical Sniper",
            Self::Gemini => "The Polite Troll",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Returned when text does not name a known persona.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown persona '{0}' (expected claude, gpt or gemini)")]
pub struct PersonaParseError(pub String);

impl FromStr for Persona {
    type Err = PersonaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" => Ok(Self::Claude),
            "gpt" => Ok(Self::Gpt),
            "gemini" => Ok(Self::Gemini),
            _ => Err(PersonaParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Claude".parse::<Persona>(), Ok(Persona::Claude));
        assert_eq!(" GPT ".parse::<Persona>(), Ok(Persona::Gpt));
        assert_eq!("gemini".parse::<Persona>(), Ok(Persona::Gemini));
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "llama".parse::<Persona>().unwrap_err();
        assert!(err.to_string().contains("llama"));
    }

    #[test]
    fn serde_uses_lowercase_id() {
        let json = serde_json::to_string(&Persona::Gemini).unwrap();
        assert_eq!(json, "\"gemini\"");
        let back: Persona = serde_json::from_str("\"claude\"").unwrap();
        assert_eq!(back, Persona::Claude);
    }

    #[test]
    fn default_champion_is_gpt() {
        assert_eq!(DEFAULT_CHAMPION, Persona::Gpt);
        assert_eq!(DEFAULT_CHAMPION.to_string(), "gpt");
    }
}
