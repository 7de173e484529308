use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the feature column counting distinct active calendar days.
pub const DAYS_ACTIVE_COLUMN: &str = "days_active";

/// A row that belongs to a user and happened at an epoch-second instant.
pub trait Timestamped {
    fn user_id(&self) -> i64;
    fn timestamp(&self) -> i64;
}

/// Course navigation event (discovered, viewed, started_attempt, passed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub user_id: i64,
    pub timestamp: i64,
    pub action: String,
    pub step_id: i64,
}

/// Answer submitted on a practical step (wrong, correct).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub user_id: i64,
    pub timestamp: i64,
    pub submission_status: String,
    pub step_id: i64,
}

impl Timestamped for EventRecord {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl Timestamped for SubmissionRecord {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Feature matrix X: one row per user, columns follow the categories
/// observed in the windowed data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: BTreeMap<i64, BTreeMap<String, u64>>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Users in ascending order.
    pub fn user_ids(&self) -> Vec<i64> {
        self.rows.keys().copied().collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn value(&self, user_id: i64, column: &str) -> Option<u64> {
        self.rows.get(&user_id)?.get(column).copied()
    }

    /// Values for one user in column order.
    pub fn row_values(&self, user_id: i64) -> Option<Vec<u64>> {
        let row = self.rows.get(&user_id)?;
        Some(
            self.columns
                .iter()
                .map(|column| row.get(column).copied().unwrap_or(0))
                .collect(),
        )
    }
}

/// Label vector y: whether each user passed the course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    pub labels: BTreeMap<i64, bool>,
}

impl LabelSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn user_ids(&self) -> Vec<i64> {
        self.labels.keys().copied().collect()
    }

    pub fn get(&self, user_id: i64) -> Option<bool> {
        self.labels.get(&user_id).copied()
    }

    pub fn passed_count(&self) -> usize {
        self.labels.values().filter(|passed| **passed).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub total: u64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub users: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub columns: Vec<ColumnSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_values_follow_column_order() {
        let mut row = BTreeMap::new();
        row.insert("wrong".to_string(), 2);
        row.insert(DAYS_ACTIVE_COLUMN.to_string(), 1);
        let table = FeatureTable {
            columns: vec![
                "correct".to_string(),
                "wrong".to_string(),
                DAYS_ACTIVE_COLUMN.to_string(),
            ],
            rows: BTreeMap::from([(7, row)]),
        };

        assert_eq!(table.row_values(7), Some(vec![0, 2, 1]));
        assert_eq!(table.row_values(8), None);
        assert_eq!(table.value(7, "wrong"), Some(2));
    }

    #[test]
    fn passed_count_ignores_false_labels() {
        let labels = LabelSet {
            labels: BTreeMap::from([(1, true), (2, false), (3, true)]),
        };
        assert_eq!(labels.passed_count(), 2);
        assert_eq!(labels.user_ids(), vec![1, 2, 3]);
    }
}
