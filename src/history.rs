//! Score history
//!
//! Rolling window of past recovery index scores for one patient. Trends are
//! computed against the scores recorded before the current day, so callers
//! read [`ScoreHistory::previous_scores`] first and [`ScoreHistory::record`]
//! afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default history window in days
pub const DEFAULT_HISTORY_WINDOW: usize = 14;

/// One scored day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub date: NaiveDate,
    pub score: u32,
}

/// Rolling store of scored days, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    entries: VecDeque<ScoreEntry>,
    window_size: usize,
}

impl Default for ScoreHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl ScoreHistory {
    /// Create an empty history keeping at most `window_size` days
    pub fn new(window_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Record a day's score.
    ///
    /// Re-scoring a date already present replaces that entry in place.
    pub fn record(&mut self, date: NaiveDate, score: u32) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.date == date) {
            existing.score = score;
            return;
        }

        self.entries.push_back(ScoreEntry { date, score });
        self.entries.make_contiguous().sort_by_key(|e| e.date);
        while self.entries.len() > self.window_size {
            self.entries.pop_front();
        }
    }

    /// Scores recorded strictly before `date`, oldest first
    pub fn previous_scores(&self, date: NaiveDate) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|e| e.date < date)
            .map(|e| e.score)
            .collect()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&ScoreEntry> {
        self.entries.back()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize for persistence
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore from persisted JSON.
    ///
    /// Entries are re-ordered by date, duplicate dates keep the last entry,
    /// and anything beyond the window is dropped oldest first. A window of 0
    /// is rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let persisted: ScoreHistory = serde_json::from_str(json)?;
        if persisted.window_size == 0 {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "window_size must be at least 1",
            ));
        }
        let window_size = persisted.window_size;
        Ok(persisted.with_window(window_size))
    }

    /// Rebuild into a new window size, keeping the most recent days
    pub fn with_window(self, window_size: usize) -> Self {
        let mut entries: Vec<ScoreEntry> = self.entries.into_iter().collect();
        entries.sort_by_key(|e| e.date);

        let mut history = Self::new(window_size);
        for entry in entries {
            history.record(entry.date, entry.score);
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_previous_scores_excludes_current_day() {
        let mut history = ScoreHistory::default();
        history.record(day(1), 40);
        history.record(day(2), 50);
        history.record(day(3), 60);

        assert_eq!(history.previous_scores(day(3)), vec![40, 50]);
        assert_eq!(history.previous_scores(day(4)), vec![40, 50, 60]);
        assert!(history.previous_scores(day(1)).is_empty());
    }

    #[test]
    fn test_window_drops_oldest() {
        let mut history = ScoreHistory::new(3);
        for d in 1..=5 {
            history.record(day(d), d * 10);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.previous_scores(day(10)), vec![30, 40, 50]);
        assert_eq!(history.latest(), Some(&ScoreEntry { date: day(5), score: 50 }));
    }

    #[test]
    fn test_rescoring_replaces_entry() {
        let mut history = ScoreHistory::default();
        history.record(day(1), 40);
        history.record(day(1), 55);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|e| e.score), Some(55));
    }

    #[test]
    fn test_out_of_order_insert_kept_sorted() {
        let mut history = ScoreHistory::default();
        history.record(day(3), 30);
        history.record(day(1), 10);
        history.record(day(2), 20);
        let dates: Vec<NaiveDate> = history.entries().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
    }

    #[test]
    fn test_json_round_trip() {
        let mut history = ScoreHistory::new(7);
        history.record(day(1), 72);
        history.record(day(2), 68);

        let json = history.to_json().unwrap();
        let restored = ScoreHistory::from_json(&json).unwrap();
        assert_eq!(restored, history);
        assert_eq!(restored.window_size(), 7);
    }

    #[test]
    fn test_from_json_rejects_zero_window() {
        assert!(ScoreHistory::from_json(r#"{"entries": [], "window_size": 0}"#).is_err());
    }

    #[test]
    fn test_from_json_sorts_and_dedups() {
        let json = r#"{
            "entries": [
                {"date": "2024-03-03", "score": 30},
                {"date": "2024-03-01", "score": 10},
                {"date": "2024-03-03", "score": 35},
                {"date": "2024-03-02", "score": 20}
            ],
            "window_size": 14
        }"#;
        let history = ScoreHistory::from_json(json).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.previous_scores(day(10)), vec![10, 20, 35]);
        assert_eq!(history.latest(), Some(&ScoreEntry { date: day(3), score: 35 }));
    }

    #[test]
    fn test_from_json_trims_to_window() {
        let json = r#"{
            "entries": [
                {"date": "2024-03-01", "score": 10},
                {"date": "2024-03-02", "score": 20},
                {"date": "2024-03-03", "score": 30}
            ],
            "window_size": 2
        }"#;
        let history = ScoreHistory::from_json(json).unwrap();
        assert_eq!(history.previous_scores(day(10)), vec![20, 30]);
    }

    #[test]
    fn test_with_window_keeps_most_recent() {
        let mut history = ScoreHistory::new(100);
        for d in 1..=6 {
            history.record(day(d), d * 10);
        }
        let resized = history.with_window(3);
        assert_eq!(resized.window_size(), 3);
        assert_eq!(resized.previous_scores(day(10)), vec![40, 50, 60]);
    }

    #[test]
    fn test_clear() {
        let mut history = ScoreHistory::default();
        history.record(day(1), 72);
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
