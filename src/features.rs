//! Per-user feature rows from windowed events and submissions.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{EventRecord, FeatureTable, SubmissionRecord, DAYS_ACTIVE_COLUMN};
use crate::time::Dated;

/// Count of rows per (user, category), plus the categories observed.
#[derive(Debug, Default)]
struct CategoryCounts {
    categories: BTreeSet<String>,
    per_user: BTreeMap<i64, BTreeMap<String, u64>>,
}

impl CategoryCounts {
    fn add(&mut self, user_id: i64, category: &str) {
        if !self.categories.contains(category) {
            self.categories.insert(category.to_string());
        }
        *self
            .per_user
            .entry(user_id)
            .or_default()
            .entry(category.to_string())
            .or_insert(0) += 1;
    }
}

fn count_submission_statuses(submissions: &[Dated<SubmissionRecord>]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for row in submissions {
        counts.add(row.record.user_id, &row.record.submission_status);
    }
    counts
}

fn count_event_actions(events: &[Dated<EventRecord>]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for row in events {
        counts.add(row.record.user_id, &row.record.action);
    }
    counts
}

fn count_active_days(events: &[Dated<EventRecord>]) -> BTreeMap<i64, u64> {
    let mut days: BTreeMap<i64, BTreeSet<NaiveDate>> = BTreeMap::new();
    for row in events {
        days.entry(row.record.user_id).or_default().insert(row.day);
    }
    days.into_iter()
        .map(|(user_id, set)| (user_id, set.len() as u64))
        .collect()
}

/// Builds X. Columns are the submission statuses seen, then the event
/// actions seen, then `days_active`; every user present in either input
/// gets a row with every column, missing counts as zero.
pub fn create_user_data(
    events: &[Dated<EventRecord>],
    submissions: &[Dated<SubmissionRecord>],
) -> FeatureTable {
    let scores = count_submission_statuses(submissions);
    let actions = count_event_actions(events);
    let days = count_active_days(events);

    let mut columns: Vec<String> = scores.categories.iter().cloned().collect();
    for action in &actions.categories {
        if !scores.categories.contains(action) {
            columns.push(action.clone());
        }
    }
    columns.push(DAYS_ACTIVE_COLUMN.to_string());

    let users: BTreeSet<i64> = scores
        .per_user
        .keys()
        .chain(actions.per_user.keys())
        .copied()
        .collect();

    let mut rows = BTreeMap::new();
    for user_id in users {
        let mut row: BTreeMap<String, u64> =
            columns.iter().map(|column| (column.clone(), 0)).collect();

        for counts in [&scores, &actions] {
            if let Some(user_counts) = counts.per_user.get(&user_id) {
                for (category, count) in user_counts {
                    *row.entry(category.clone()).or_insert(0) += count;
                }
            }
        }
        row.insert(
            DAYS_ACTIVE_COLUMN.to_string(),
            days.get(&user_id).copied().unwrap_or(0),
        );
        rows.insert(user_id, row);
    }

    debug!(
        users = rows.len(),
        columns = columns.len(),
        "aggregated user features"
    );
    FeatureTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::normalize_timestamps;
    use crate::window::SECONDS_PER_DAY;

    fn events(rows: &[(i64, i64, &str)]) -> Vec<Dated<EventRecord>> {
        let records = rows
            .iter()
            .map(|(user_id, timestamp, action)| EventRecord {
                user_id: *user_id,
                timestamp: *timestamp,
                action: action.to_string(),
                step_id: 1,
            })
            .collect();
        normalize_timestamps(records).unwrap()
    }

    fn submissions(rows: &[(i64, i64, &str)]) -> Vec<Dated<SubmissionRecord>> {
        let records = rows
            .iter()
            .map(|(user_id, timestamp, status)| SubmissionRecord {
                user_id: *user_id,
                timestamp: *timestamp,
                submission_status: status.to_string(),
                step_id: 1,
            })
            .collect();
        normalize_timestamps(records).unwrap()
    }

    #[test]
    fn counts_actions_and_statuses() {
        let x = create_user_data(
            &events(&[(1, 0, "discovered"), (1, 10, "viewed"), (1, 20, "viewed")]),
            &submissions(&[(1, 30, "wrong"), (1, 40, "correct"), (1, 50, "wrong")]),
        );

        assert_eq!(
            x.columns,
            vec!["correct", "wrong", "discovered", "viewed", DAYS_ACTIVE_COLUMN]
        );
        assert_eq!(x.row_values(1), Some(vec![1, 2, 1, 2, 1]));
    }

    #[test]
    fn user_without_submissions_is_zero_filled() {
        let x = create_user_data(
            &events(&[(1, 0, "discovered"), (2, 0, "discovered")]),
            &submissions(&[(2, 5, "correct"), (2, 6, "wrong")]),
        );

        assert_eq!(x.value(1, "wrong"), Some(0));
        assert_eq!(x.value(1, "correct"), Some(0));
        assert_eq!(x.value(1, "discovered"), Some(1));
    }

    #[test]
    fn user_only_in_submissions_gets_zero_events() {
        let x = create_user_data(
            &events(&[(1, 0, "viewed")]),
            &submissions(&[(3, 0, "correct")]),
        );

        assert_eq!(x.user_ids(), vec![1, 3]);
        assert_eq!(x.value(3, "viewed"), Some(0));
        assert_eq!(x.value(3, DAYS_ACTIVE_COLUMN), Some(0));
        assert_eq!(x.value(3, "correct"), Some(1));
    }

    #[test]
    fn days_active_counts_distinct_days() {
        let x = create_user_data(
            &events(&[
                (1, 0, "viewed"),
                (1, 100, "viewed"),
                (1, SECONDS_PER_DAY + 5, "viewed"),
                (1, 3 * SECONDS_PER_DAY, "viewed"),
            ]),
            &[],
        );
        assert_eq!(x.value(1, DAYS_ACTIVE_COLUMN), Some(3));
    }

    #[test]
    fn columns_follow_observed_categories() {
        let x = create_user_data(&events(&[(1, 0, "discovered")]), &[]);
        assert_eq!(x.columns, vec!["discovered", DAYS_ACTIVE_COLUMN]);
        assert!(!x.has_column("passed"));
        assert!(!x.has_column("correct"));
    }

    #[test]
    fn empty_events_still_merge() {
        let x = create_user_data(&[], &submissions(&[(4, 0, "wrong")]));
        assert_eq!(x.columns, vec!["wrong", DAYS_ACTIVE_COLUMN]);
        assert_eq!(x.row_values(4), Some(vec![1, 0]));
    }

    #[test]
    fn empty_inputs_give_empty_table() {
        let x = create_user_data(&[], &[]);
        assert!(x.is_empty());
        assert_eq!(x.columns, vec![DAYS_ACTIVE_COLUMN]);
    }
}
