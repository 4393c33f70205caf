//! Directory mode: scores on externally-owned player entities.
//!
//! Each player has one mutable score field; submitting overwrites it
//! (last-write-wins, no accumulation). Ranking reads the whole
//! directory back and keeps players who have scored at all.
//!
//! The level and time-window parts of a query do not apply here - the
//! directory holds a single current score per player, not a run log -
//! and are deliberately ignored rather than approximated.

use crate::providers::{PlayerDirectory, ScoreSink};

use super::record::{LeaderboardRow, ScoreQuery, ScoreRecord};
use super::{ScoreStore, StoreError};

/// Leaderboard over an external player directory.
#[derive(Clone, Debug)]
pub struct DirectoryLedger<P> {
    provider: P,
}

impl<P: PlayerDirectory + ScoreSink> DirectoryLedger<P> {
    /// Create a ledger over a directory that also accepts score writes.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Access the underlying provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: PlayerDirectory + ScoreSink> ScoreStore for DirectoryLedger<P> {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), StoreError> {
        self.provider
            .submit_score(&record.player_id, record.score)?;
        log::debug!(
            "directory: set {} to {} pts",
            record.player_id,
            record.score
        );
        Ok(())
    }

    fn query(&self, _query: &ScoreQuery) -> Vec<LeaderboardRow> {
        let players = match self.provider.fetch_players() {
            Ok(players) => players,
            Err(err) => {
                log::warn!("player directory unavailable, leaderboard empty: {err}");
                return Vec::new();
            }
        };

        let mut rows: Vec<LeaderboardRow> = players
            .into_iter()
            .filter(|p| p.score > 0)
            .map(|p| LeaderboardRow {
                name: p.name,
                score: p.score,
                detail: None,
            })
            .collect();

        // Stable sort: ties keep directory order. Untruncated.
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LevelId;
    use crate::providers::{MemoryDirectory, PlayerEntry, ProviderError};
    use chrono::Utc;

    fn player(id: &str, name: &str, score: u32) -> PlayerEntry {
        PlayerEntry {
            id: id.to_string(),
            name: name.to_string(),
            role: "helper".to_string(),
            score,
        }
    }

    fn record_for(id: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            player_id: id.to_string(),
            player_name: id.to_string(),
            score,
            level: LevelId::new(1),
            moves: 12,
            time_left: 8,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_query_drops_zero_scores() {
        let ledger = DirectoryLedger::new(MemoryDirectory::new(vec![
            player("a", "Alpha", 100),
            player("b", "Beta", 0),
            player("c", "Gamma", 50),
        ]));

        let rows = ledger.query(&ScoreQuery::all());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
        assert!(rows.iter().all(|r| r.detail.is_none()));
    }

    #[test]
    fn test_query_ties_keep_directory_order() {
        let ledger = DirectoryLedger::new(MemoryDirectory::new(vec![
            player("a", "Alpha", 100),
            player("b", "Beta", 100),
        ]));

        let rows = ledger.query(&ScoreQuery::all());
        assert_eq!(rows[0].name, "Alpha");
        assert_eq!(rows[1].name, "Beta");
    }

    #[test]
    fn test_submit_overwrites() {
        let mut ledger = DirectoryLedger::new(MemoryDirectory::new(vec![player(
            "a", "Alpha", 40,
        )]));

        ledger.submit(&record_for("a", 300)).unwrap();
        ledger.submit(&record_for("a", 150)).unwrap();

        let rows = ledger.query(&ScoreQuery::all());
        assert_eq!(rows[0].score, 150);
    }

    #[test]
    fn test_submit_unknown_player_fails() {
        let mut ledger = DirectoryLedger::new(MemoryDirectory::default());
        let err = ledger.submit(&record_for("ghost", 10)).unwrap_err();
        assert!(matches!(err, StoreError::Provider(_)));
    }

    #[test]
    fn test_unavailable_directory_queries_empty() {
        struct DownDirectory;

        impl PlayerDirectory for DownDirectory {
            fn fetch_players(&self) -> Result<Vec<PlayerEntry>, ProviderError> {
                Err(ProviderError::Unavailable("offline".into()))
            }
        }
        impl ScoreSink for DownDirectory {
            fn submit_score(&mut self, _: &str, _: u32) -> Result<(), ProviderError> {
                Err(ProviderError::Unavailable("offline".into()))
            }
        }

        let ledger = DirectoryLedger::new(DownDirectory);
        assert!(ledger.query(&ScoreQuery::all()).is_empty());
    }
}
