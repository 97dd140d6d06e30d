//! Champion and win/loss records.

use crate::persona::{Persona, DEFAULT_CHAMPION};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Win/loss tally for one persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(deserialize_with = "null_as_default")]
    pub wins: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub losses: u32,
}

/// Scoreboard snapshot as reported by the service.
///
/// Every field may be absent or null on the wire. Use the accessors,
/// which apply the defaults (champion [`DEFAULT_CHAMPION`], empty
/// records, zero streak).
///
/// The service keys records by agent name. Names outside the known
/// persona set are skipped, and an unknown champion reads as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoreboard {
    #[serde(deserialize_with = "lenient_champion")]
    pub champion: Option<Persona>,
    #[serde(deserialize_with = "known_records")]
    pub records: BTreeMap<Persona, Record>,
    #[serde(deserialize_with = "null_as_default")]
    pub streak: u32,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_champion<'de, D>(deserializer: D) -> Result<Option<Persona>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| name.parse().ok()))
}

fn known_records<'de, D>(deserializer: D) -> Result<BTreeMap<Persona, Record>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<Record>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, record)| Some((name.parse().ok()?, record.unwrap_or_default())))
        .collect())
}

impl Scoreboard {
    #[must_use]
    pub fn champion(&self) -> Persona {
        self.champion.unwrap_or(DEFAULT_CHAMPION)
    }

    /// Record for `persona`, `0-0` when the service has none.
    #[must_use]
    pub fn record(&self, persona: Persona) -> Record {
        self.records.get(&persona).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.streak
    }
}
