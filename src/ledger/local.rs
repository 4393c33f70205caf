//! Local-ledger mode: an append-only run log in a key-value store.
//!
//! Records persist as a JSON array under one fixed key, mirroring the
//! browser-storage layout this replaces. A missing or unreadable blob
//! loads as an empty ledger - losing old scores is recoverable,
//! refusing to start is not.

use crate::providers::{Clock, KeyValueStore};

use super::record::{LeaderboardRow, RunDetail, ScoreQuery, ScoreRecord};
use super::{ScoreStore, StoreError, MAX_ROWS};

/// Storage key for the serialized record list.
const LEDGER_KEY: &str = "memory-match.scores";

/// Append-only score ledger over an injected key-value store.
#[derive(Clone, Debug)]
pub struct LocalLedger<S, C> {
    store: S,
    clock: C,
    records: Vec<ScoreRecord>,
}

impl<S: KeyValueStore, C: Clock> LocalLedger<S, C> {
    /// Open the ledger, loading any persisted records.
    ///
    /// Corrupt or unreadable data is logged and treated as empty,
    /// never surfaced as an error.
    pub fn open(store: S, clock: C) -> Self {
        let records = match store.get(LEDGER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(records) => records,
                Err(err) => {
                    log::warn!("discarding corrupt score ledger: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                log::warn!("score ledger unavailable, starting empty: {err}");
                Vec::new()
            }
        };

        Self {
            store,
            clock,
            records,
        }
    }

    /// Number of records in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Is the ledger empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Access the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.records)?;
        self.store.put(LEDGER_KEY, &raw)?;
        Ok(())
    }
}

impl<S: KeyValueStore, C: Clock> ScoreStore for LocalLedger<S, C> {
    fn submit(&mut self, record: &ScoreRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        self.persist()?;
        log::debug!(
            "ledger: recorded {} pts for {} ({} records)",
            record.score,
            record.player_name,
            self.records.len()
        );
        Ok(())
    }

    fn query(&self, query: &ScoreQuery) -> Vec<LeaderboardRow> {
        let cutoff = query.window.cutoff(self.clock.now());

        let mut matching: Vec<&ScoreRecord> = self
            .records
            .iter()
            .filter(|r| query.level.map_or(true, |level| r.level == level))
            .filter(|r| cutoff.map_or(true, |cutoff| r.recorded_at >= cutoff))
            .collect();

        // Stable sort: equal scores keep insertion order.
        matching.sort_by(|a, b| b.score.cmp(&a.score));
        matching.truncate(MAX_ROWS);

        matching
            .into_iter()
            .map(|r| LeaderboardRow {
                name: r.player_name.clone(),
                score: r.score,
                detail: Some(RunDetail {
                    level: r.level,
                    moves: r.moves,
                    time_left: r.time_left,
                    recorded_at: r.recorded_at,
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LevelId;
    use crate::ledger::record::TimeWindow;
    use crate::providers::{FixedClock, MemoryStore};
    use chrono::{Duration, Utc};

    fn record(name: &str, score: u32, level: u8, age_hours: i64) -> ScoreRecord {
        ScoreRecord {
            player_id: name.to_lowercase(),
            player_name: name.to_string(),
            score,
            level: LevelId::new(level),
            moves: 10,
            time_left: 20,
            recorded_at: Utc::now() - Duration::hours(age_hours),
        }
    }

    fn ledger() -> LocalLedger<MemoryStore, FixedClock> {
        LocalLedger::open(MemoryStore::new(), FixedClock(Utc::now()))
    }

    #[test]
    fn test_open_empty_store() {
        let ledger = ledger();
        assert!(ledger.is_empty());
        assert!(ledger.query(&ScoreQuery::all()).is_empty());
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let mut store = MemoryStore::new();
        store.seed(LEDGER_KEY, "{not json!");

        let ledger = LocalLedger::open(store, FixedClock(Utc::now()));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_submit_persists() {
        let mut ledger = ledger();
        ledger.submit(&record("Jingle", 300, 1, 0)).unwrap();

        // Reopen from the same store: record survives
        let reopened = LocalLedger::open(ledger.store.clone(), FixedClock(Utc::now()));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_query_sorts_descending() {
        let mut ledger = ledger();
        ledger.submit(&record("Low", 100, 1, 0)).unwrap();
        ledger.submit(&record("High", 500, 1, 0)).unwrap();
        ledger.submit(&record("Mid", 300, 1, 0)).unwrap();

        let rows = ledger.query(&ScoreQuery::all());
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_query_ties_keep_insertion_order() {
        let mut ledger = ledger();
        ledger.submit(&record("First", 200, 1, 0)).unwrap();
        ledger.submit(&record("Second", 200, 1, 0)).unwrap();

        let rows = ledger.query(&ScoreQuery::all());
        assert_eq!(rows[0].name, "First");
        assert_eq!(rows[1].name, "Second");
    }

    #[test]
    fn test_query_truncates_to_ten() {
        let mut ledger = ledger();
        for i in 0..15 {
            ledger.submit(&record(&format!("Elf{i}"), i * 10, 1, 0)).unwrap();
        }

        assert_eq!(ledger.query(&ScoreQuery::all()).len(), 10);
    }

    #[test]
    fn test_query_filters_by_level() {
        let mut ledger = ledger();
        ledger.submit(&record("Easy", 100, 1, 0)).unwrap();
        ledger.submit(&record("Hard", 100, 3, 0)).unwrap();

        let rows = ledger.query(&ScoreQuery::all().for_level(LevelId::new(3)));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Hard");
    }

    #[test]
    fn test_query_time_windows() {
        let mut ledger = ledger();
        ledger.submit(&record("Fresh", 100, 1, 1)).unwrap();
        ledger.submit(&record("Yesterday", 100, 1, 30)).unwrap();
        ledger.submit(&record("LastMonth", 100, 1, 24 * 20)).unwrap();
        ledger.submit(&record("Ancient", 100, 1, 24 * 40)).unwrap();

        let today = ledger.query(&ScoreQuery::all().within(TimeWindow::Today));
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].name, "Fresh");

        let week = ledger.query(&ScoreQuery::all().within(TimeWindow::Week));
        assert_eq!(week.len(), 2);

        let month = ledger.query(&ScoreQuery::all().within(TimeWindow::Month));
        assert_eq!(month.len(), 3);

        assert_eq!(ledger.query(&ScoreQuery::all()).len(), 4);
    }

    #[test]
    fn test_rows_carry_run_detail() {
        let mut ledger = ledger();
        ledger.submit(&record("Jingle", 300, 2, 0)).unwrap();

        let rows = ledger.query(&ScoreQuery::all());
        let detail = rows[0].detail.as_ref().unwrap();
        assert_eq!(detail.level, LevelId::new(2));
        assert_eq!(detail.moves, 10);
        assert_eq!(detail.time_left, 20);
    }
}
