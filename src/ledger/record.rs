//! Score records, query filters, and leaderboard rows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::LevelId;

/// A completed run, as saved to the local ledger.
///
/// Append-only: never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Identifier of the player, as known to score sinks.
    pub player_id: String,

    /// Display name entered by the player.
    pub player_name: String,

    /// Final score.
    pub score: u32,

    /// Level the run was played on.
    pub level: LevelId,

    /// Moves used.
    pub moves: u32,

    /// Seconds left on the clock when the run ended.
    pub time_left: u32,

    /// When the record was created.
    pub recorded_at: DateTime<Utc>,
}

/// Age filter for leaderboard queries, relative to "now".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeWindow {
    /// No age filter.
    #[default]
    All,
    /// Recorded within the last 24 hours.
    Today,
    /// Recorded within the last 7 days.
    Week,
    /// Recorded within the last 30 days.
    Month,
}

impl TimeWindow {
    /// Oldest admissible timestamp for this window, `None` for `All`.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeWindow::All => None,
            TimeWindow::Today => Some(now - Duration::hours(24)),
            TimeWindow::Week => Some(now - Duration::days(7)),
            TimeWindow::Month => Some(now - Duration::days(30)),
        }
    }
}

/// Leaderboard query filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreQuery {
    /// Restrict to an exact level, `None` for all levels.
    pub level: Option<LevelId>,

    /// Restrict by record age.
    pub window: TimeWindow,
}

impl ScoreQuery {
    /// Query matching everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one level.
    #[must_use]
    pub fn for_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    /// Restrict by age.
    #[must_use]
    pub fn within(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }
}

/// Per-run details on a leaderboard row (absent in directory mode).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunDetail {
    /// Level the run was played on.
    pub level: LevelId,

    /// Moves used.
    pub moves: u32,

    /// Seconds left when the run ended.
    pub time_left: u32,

    /// When the record was created.
    pub recorded_at: DateTime<Utc>,
}

/// One ranked leaderboard entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// Display name.
    pub name: String,

    /// Score this row ranks by.
    pub score: u32,

    /// Run details when the backing mode records them.
    pub detail: Option<RunDetail>,
}

/// Format whole seconds as `m:ss` for display.
#[must_use]
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
