//! Wire contract between the Flip-Match client and the score service.
//!
//! Field names mirror the service's `scores` table columns; changing them is
//! a breaking change on both sides of the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `scores` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u32,
    /// `"classic"` or `"secret"`.
    pub mode: String,
    /// `"<cols>x<rows>"`, e.g. `"4x3"`.
    pub grid_size: String,
    /// Set by the service on insert; absent on submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Read-path filter for the leaderboard, ordered by score descending.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub mode: Option<String>,
    pub grid_size: Option<String>,
    pub limit: Option<u32>,
}

impl LeaderboardQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    /// Key/value pairs for a query string, skipping unset filters.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(mode) = &self.mode {
            pairs.push(("mode", mode.clone()));
        }
        if let Some(grid_size) = &self.grid_size {
            pairs.push(("grid_size", grid_size.clone()));
        }
        pairs.push(("limit", self.limit().to_string()));
        pairs
    }
}

/// Message pushed on the live feed, keyed by insert events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FeedEvent {
    Insert { record: ScoreRecord },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ScoreRecord {
        ScoreRecord {
            player_name: "Ada".into(),
            score: 6,
            mode: "classic".into(),
            grid_size: "4x3".into(),
            created_at: None,
        }
    }

    #[test]
    fn submission_payload_matches_the_table_columns() {
        let value = serde_json::to_value(record()).unwrap();

        assert_eq!(
            value,
            json!({
                "player_name": "Ada",
                "score": 6,
                "mode": "classic",
                "grid_size": "4x3",
            })
        );
    }

    #[test]
    fn feed_events_are_tagged_inserts() {
        let event: FeedEvent = serde_json::from_value(json!({
            "event": "insert",
            "record": {
                "player_name": "Ada",
                "score": 6,
                "mode": "classic",
                "grid_size": "4x3",
                "created_at": "2025-11-30T12:00:00Z",
            },
        }))
        .unwrap();

        let FeedEvent::Insert { record } = event;
        assert_eq!(record.player_name, "Ada");
        assert!(record.created_at.is_some());
    }

    #[test]
    fn query_pairs_skip_unset_filters() {
        let query = LeaderboardQuery {
            mode: Some("secret".into()),
            grid_size: None,
            limit: None,
        };

        assert_eq!(
            query.to_pairs(),
            vec![("mode", "secret".to_string()), ("limit", "10".to_string())]
        );
    }
}
