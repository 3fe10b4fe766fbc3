//! Roster entries and player identity
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `(player_name, clan_name)` pair that keys a roster entry.
///
/// Matching is exact and case-sensitive; empty names are the collector's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub player_name: String,
    pub clan_name: String,
}

impl Identity {
    #[must_use]
    pub fn new(player_name: impl Into<String>, clan_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            clan_name: clan_name.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.player_name, self.clan_name)
    }
}

/// Running per-player totals. Stored as-is under the roster storage key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player_name: String,
    pub clan_name: String,
    pub total_kills: i64,
    #[serde(default)]
    pub events: u32,
    pub kills_per_event: f64,
    pub average_damage: f64,
    pub average_accuracy: f64,
}

impl PlayerRecord {
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.player_name.clone(), self.clan_name.clone())
    }

    /// Whether this record belongs to `identity`, without allocating.
    #[must_use]
    pub fn matches(&self, identity: &Identity) -> bool {
        self.player_name == identity.player_name && self.clan_name == identity.clan_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> PlayerRecord {
        PlayerRecord {
            player_name: "Alice".to_string(),
            clan_name: "ClanX".to_string(),
            total_kills: 5,
            events: 2,
            kills_per_event: 2.5,
            average_damage: 15.0,
            average_accuracy: 55.0,
        }
    }

    #[test]
    fn identity_match_is_case_sensitive() {
        let record = alice();
        assert!(record.matches(&Identity::new("Alice", "ClanX")));
        assert!(!record.matches(&Identity::new("alice", "ClanX")));
        assert!(!record.matches(&Identity::new("Alice", "clanx")));
        assert_eq!(record.identity().to_string(), "Alice [ClanX]");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["playerName"], "Alice");
        assert_eq!(json["totalKills"], 5);
        assert_eq!(json["killsPerEvent"], 2.5);
        assert_eq!(json["averageAccuracy"], 55.0);
    }

    #[test]
    fn missing_events_defaults_to_zero() {
        let json = r#"{"playerName":"Bob","clanName":"Y","totalKills":3,
            "killsPerEvent":0,"averageDamage":1.5,"averageAccuracy":40}"#;
        let record: PlayerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.events, 0);
        assert_eq!(record.total_kills, 3);
    }
}
