//! Leaderboard ordering
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::player::PlayerRecord;

/// Column a leaderboard can be ordered by. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    TotalKills,
    KillsPerEvent,
    AverageDamage,
    AverageAccuracy,
    Events,
    PlayerName,
    ClanName,
}

impl SortKey {
    pub const ALL: [Self; 7] = [
        Self::TotalKills,
        Self::KillsPerEvent,
        Self::AverageDamage,
        Self::AverageAccuracy,
        Self::Events,
        Self::PlayerName,
        Self::ClanName,
    ];

    /// Stable key used in storage, CLI flags and `<select>` values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TotalKills => "totalKills",
            Self::KillsPerEvent => "killsPerEvent",
            Self::AverageDamage => "averageDamage",
            Self::AverageAccuracy => "averageAccuracy",
            Self::Events => "events",
            Self::PlayerName => "playerName",
            Self::ClanName => "clanName",
        }
    }

    /// Human-readable column label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalKills => "Total Kills",
            Self::KillsPerEvent => "Kills per Event",
            Self::AverageDamage => "Average Damage",
            Self::AverageAccuracy => "Average Accuracy",
            Self::Events => "Events",
            Self::PlayerName => "Player Name",
            Self::ClanName => "Clan Name",
        }
    }

    /// Descending comparison of two records on this key.
    #[must_use]
    pub fn compare(self, a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
        let ascending = match self {
            Self::TotalKills => a.total_kills.cmp(&b.total_kills),
            Self::KillsPerEvent => a.kills_per_event.total_cmp(&b.kills_per_event),
            Self::AverageDamage => a.average_damage.total_cmp(&b.average_damage),
            Self::AverageAccuracy => a.average_accuracy.total_cmp(&b.average_accuracy),
            Self::Events => a.events.cmp(&b.events),
            Self::PlayerName => a.player_name.cmp(&b.player_name),
            Self::ClanName => a.clan_name.cmp(&b.clan_name),
        };
        ascending.reverse()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Sort in place, descending and stable.
pub fn sort_in_place(roster: &mut [PlayerRecord], key: SortKey) {
    roster.sort_by(|a, b| key.compare(a, b));
}

/// Return a sorted copy of `roster`, descending and stable: ties keep their prior order.
#[must_use]
pub fn sort_roster(roster: &[PlayerRecord], key: SortKey) -> Vec<PlayerRecord> {
    let mut sorted = roster.to_vec();
    sort_in_place(&mut sorted, key);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, kills: i64, damage: f64) -> PlayerRecord {
        PlayerRecord {
            player_name: name.to_string(),
            clan_name: "C".to_string(),
            total_kills: kills,
            events: 1,
            kills_per_event: 0.0,
            average_damage: damage,
            average_accuracy: 0.0,
        }
    }

    fn names(roster: &[PlayerRecord]) -> Vec<&str> {
        roster.iter().map(|r| r.player_name.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_keeps_ties_in_order() {
        let roster = vec![
            record("a", 1, 5.0),
            record("b", 3, 1.0),
            record("c", 1, 9.0),
            record("d", 3, 2.0),
        ];
        let sorted = sort_roster(&roster, SortKey::TotalKills);
        assert_eq!(names(&sorted), ["b", "d", "a", "c"]);
        assert_eq!(sort_roster(&sorted, SortKey::TotalKills), sorted);
    }

    #[test]
    fn float_keys_and_names_sort_descending() {
        let roster = vec![record("a", 0, 1.5), record("c", 0, 9.25), record("b", 0, 3.0)];
        assert_eq!(
            names(&sort_roster(&roster, SortKey::AverageDamage)),
            ["c", "b", "a"]
        );
        assert_eq!(
            names(&sort_roster(&roster, SortKey::PlayerName)),
            ["c", "b", "a"]
        );
    }

    #[test]
    fn keys_round_trip_through_strings() {
        for key in SortKey::ALL {
            assert_eq!(key.as_str().parse::<SortKey>(), Ok(key));
        }
        assert_eq!(
            "kills".parse::<SortKey>(),
            Err(UnknownSortKey("kills".to_string()))
        );
        assert_eq!(
            serde_json::to_string(&SortKey::KillsPerEvent).unwrap(),
            "\"killsPerEvent\""
        );
    }
}
