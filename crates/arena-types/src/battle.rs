//! Battles, rounds and per-persona messages.

use crate::persona::Persona;
use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Position of a round within a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Phase {
    Opening,
    Rebuttal,
    Closer,
}

impl Phase {
    /// Display label for the round divider.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Opening => "Opening",
            Self::Rebuttal => "Rebuttal",
            Self::Closer => "Closer",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown phase '{0}'")]
pub struct PhaseParseError(pub String);

impl FromStr for Phase {
    type Err = PhaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opening" => Ok(Self::Opening),
            "rebuttal" => Ok(Self::Rebuttal),
            "closer" => Ok(Self::Closer),
            _ => Err(PhaseParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Phase {
    type Error = PhaseParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Generation status of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Idle,
    Loading,
    #[default]
    Ready,
}

/// A persona's contribution to a round.
///
/// The service sends plain strings; richer producers may send an object
/// carrying an explicit status. A plain string is always `Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Detailed {
        #[serde(default)]
        text: String,
        #[serde(default)]
        status: MessageStatus,
    },
}

impl Message {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Detailed { text, .. } => text,
        }
    }

    #[must_use]
    pub fn status(&self) -> MessageStatus {
        match self {
            Self::Text(_) => MessageStatus::Ready,
            Self::Detailed { status, .. } => *status,
        }
    }
}

/// Message view with the absent-entry rule applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub text: String,
    pub status: MessageStatus,
}

/// One phase of a battle with each persona's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoundWire")]
pub struct Round {
    pub phase: Phase,
    pub messages: BTreeMap<Persona, Message>,
}

impl Round {
    /// Returns the persona's message; a missing entry is `Idle` and empty.
    #[must_use]
    pub fn message(&self, persona: Persona) -> NormalizedMessage {
        match self.messages.get(&persona) {
            None => NormalizedMessage {
                text: String::new(),
                status: MessageStatus::Idle,
            },
            Some(message) => NormalizedMessage {
                text: message.text().to_string(),
                status: message.status(),
            },
        }
    }
}

/// Accepts both the service's flat `{phase, claude, gpt, gemini}` shape
/// and the nested `{phase, messages}` shape.
#[derive(Deserialize)]
struct RoundWire {
    phase: Phase,
    #[serde(default)]
    messages: BTreeMap<Persona, Message>,
    #[serde(default)]
    claude: Option<Message>,
    #[serde(default)]
    gpt: Option<Message>,
    #[serde(default)]
    gemini: Option<Message>,
}

impl From<RoundWire> for Round {
    fn from(wire: RoundWire) -> Self {
        let mut messages = wire.messages;
        for (persona, message) in [
            (Persona::Claude, wire.claude),
            (Persona::Gpt, wire.gpt),
            (Persona::Gemini, wire.gemini),
        ] {
            if let Some(message) = message {
                messages.insert(persona, message);
            }
        }
        Self {
            phase: wire.phase,
            messages,
        }
    }
}

/// A complete battle as returned by start, dethrone or fetch-by-id.
///
/// Round order is server-determined and preserved as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub id: String,
    pub topic: String,
    pub matchup: String,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub winner: Option<Persona>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Battle {
    /// A battle can be voted on once its closer round has arrived.
    #[must_use]
    pub fn is_votable(&self) -> bool {
        !self.id.is_empty() && self.rounds.iter().any(|r| r.phase == Phase::Closer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle_json(rounds: &str) -> String {
        format!(r#"{{"id":"b-1","topic":"t","matchup":"ffa","rounds":{rounds}}}"#)
    }

    #[test]
    fn flat_round_normalizes_to_messages() {
        let round: Round = serde_json::from_str(
            r#"{"phase":"opening","claude":"hammer","gpt":"sniper","gemini":"troll"}"#,
        )
        .unwrap();
        assert_eq!(round.phase, Phase::Opening);
        assert_eq!(round.messages.len(), 3);
        assert_eq!(round.message(Persona::Claude).text, "hammer");
        assert_eq!(round.message(Persona::Claude).status, MessageStatus::Ready);
    }

    #[test]
    fn nested_messages_with_status() {
        let round: Round = serde_json::from_str(
            r#"{"phase":"rebuttal","messages":{"gpt":{"text":"","status":"loading"},"claude":"done"}}"#,
        )
        .unwrap();
        assert_eq!(round.message(Persona::Gpt).status, MessageStatus::Loading);
        assert_eq!(round.message(Persona::Claude).status, MessageStatus::Ready);
        let absent = round.message(Persona::Gemini);
        assert_eq!(absent.status, MessageStatus::Idle);
        assert!(absent.text.is_empty());
    }

    #[test]
    fn object_without_status_is_ready() {
        let round: Round =
            serde_json::from_str(r#"{"phase":"closer","messages":{"gemini":{"text":"hi"}}}"#)
                .unwrap();
        let msg = round.message(Persona::Gemini);
        assert_eq!(msg.status, MessageStatus::Ready);
        assert_eq!(msg.text, "hi");
    }

    #[test]
    fn phase_is_case_insensitive() {
        let round: Round = serde_json::from_str(r#"{"phase":"Closer"}"#).unwrap();
        assert_eq!(round.phase, Phase::Closer);
        assert!(serde_json::from_str::<Round>(r#"{"phase":"overtime"}"#).is_err());
    }

    #[test]
    fn rounds_keep_server_order() {
        let battle: Battle = serde_json::from_str(&battle_json(
            r#"[{"phase":"closer"},{"phase":"opening"},{"phase":"rebuttal"}]"#,
        ))
        .unwrap();
        let phases: Vec<Phase> = battle.rounds.iter().map(|r| r.phase).collect();
        assert_eq!(phases, vec![Phase::Closer, Phase::Opening, Phase::Rebuttal]);
    }

    #[test]
    fn votable_requires_closer_round() {
        let opening_only: Battle =
            serde_json::from_str(&battle_json(r#"[{"phase":"opening"}]"#)).unwrap();
        assert!(!opening_only.is_votable());

        let with_closer: Battle =
            serde_json::from_str(&battle_json(r#"[{"phase":"opening"},{"phase":"closer"}]"#))
                .unwrap();
        assert!(with_closer.is_votable());
    }

    #[test]
    fn winner_and_created_at_are_optional() {
        let battle: Battle = serde_json::from_str(
            r#"{"id":"b","topic":"t","matchup":"1v1","rounds":[],"winner":"claude","created_at":"2024-01-02T03:04:05"}"#,
        )
        .unwrap();
        assert_eq!(battle.winner, Some(Persona::Claude));
        assert!(battle.created_at.is_some());

        let bare: Battle = serde_json::from_str(&battle_json("[]")).unwrap();
        assert_eq!(bare.winner, None);
        assert_eq!(bare.created_at, None);
    }
}
