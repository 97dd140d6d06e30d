//! Battle history entries.

use crate::persona::Persona;
use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a past battle.
///
/// History lists arrive most-recent-first and are never reordered
/// client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub topic: String,
    pub matchup: String,
    #[serde(default)]
    pub winner: Option<Persona>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}
