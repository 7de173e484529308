//! Raw logs in, (X, y) out.

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::create_user_data;
use crate::labels::derive_labels;
use crate::models::{EventRecord, FeatureTable, LabelSet, SubmissionRecord};
use crate::time::normalize_timestamps;
use crate::window::truncate_by_days;

/// Features come from each user's first `window_days` days, labels from
/// the full history. Both are keyed and sorted by user id. A user whose
/// activity falls outside the window can still carry a label; the two
/// tables are not reconciled here.
pub fn get_x_y(
    events: &[EventRecord],
    submissions: &[SubmissionRecord],
    config: &PipelineConfig,
) -> Result<(FeatureTable, LabelSet)> {
    let events_train = normalize_timestamps(events.to_vec())?;
    let events_train = truncate_by_days(&events_train, config.window_days);

    let submissions_train = normalize_timestamps(submissions.to_vec())?;
    let submissions_train = truncate_by_days(&submissions_train, config.window_days);

    let x = create_user_data(&events_train, &submissions_train);
    let y = derive_labels(events, submissions, config.points_threshold)?;

    info!(
        users_x = x.len(),
        users_y = y.len(),
        passed = y.passed_count(),
        columns = x.columns.len(),
        window_days = config.window_days,
        points_threshold = config.points_threshold,
        "built training dataset"
    );
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;
    use crate::models::DAYS_ACTIVE_COLUMN;
    use crate::window::SECONDS_PER_DAY;

    fn event(user_id: i64, timestamp: i64, action: &str, step_id: i64) -> EventRecord {
        EventRecord {
            user_id,
            timestamp,
            action: action.to_string(),
            step_id,
        }
    }

    fn submission(user_id: i64, timestamp: i64, status: &str, step_id: i64) -> SubmissionRecord {
        SubmissionRecord {
            user_id,
            timestamp,
            submission_status: status.to_string(),
            step_id,
        }
    }

    fn config(points_threshold: u32, window_days: u32) -> PipelineConfig {
        PipelineConfig {
            points_threshold,
            window_days,
        }
    }

    #[test]
    fn single_user_scenario() {
        let events = vec![event(1, 0, "discovered", 1)];
        let submissions = vec![submission(1, 50_000, "correct", 1)];

        let (x, y) = get_x_y(&events, &submissions, &config(0, 1)).unwrap();

        assert_eq!(x.user_ids(), vec![1]);
        assert_eq!(x.value(1, "discovered"), Some(1));
        assert_eq!(x.value(1, "correct"), Some(1));
        assert_eq!(y.get(1), Some(true));
    }

    #[test]
    fn duplicate_correct_step_counts_once() {
        let submissions = vec![
            submission(2, 10, "correct", 4),
            submission(2, 20, "correct", 4),
        ];
        let (_, y) = get_x_y(&[], &submissions, &config(0, 2)).unwrap();
        assert_eq!(y.get(2), Some(true));

        let (_, y) = get_x_y(&[], &submissions, &config(1, 2)).unwrap();
        assert_eq!(y.get(2), Some(false));
    }

    #[test]
    fn discovery_only_user_has_zero_counts() {
        let events = vec![
            event(1, 0, "discovered", 1),
            event(2, 0, "viewed", 1),
            event(2, 5, "passed", 1),
        ];
        let submissions = vec![submission(2, 6, "wrong", 1)];

        let (x, _) = get_x_y(&events, &submissions, &config(0, 2)).unwrap();
        assert_eq!(x.value(1, "discovered"), Some(1));
        for column in ["viewed", "passed", "wrong"] {
            assert_eq!(x.value(1, column), Some(0));
        }
    }

    #[test]
    fn every_user_appears_once_in_both_tables() {
        let events = vec![
            event(3, 0, "viewed", 1),
            event(1, 0, "viewed", 1),
            event(3, 10, "viewed", 2),
        ];
        let submissions = vec![submission(2, 0, "wrong", 1), submission(1, 5, "correct", 1)];

        let (x, y) = get_x_y(&events, &submissions, &config(0, 2)).unwrap();
        assert_eq!(x.user_ids(), vec![1, 2, 3]);
        assert_eq!(y.user_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn labels_use_full_history_features_use_window() {
        let submissions = vec![
            submission(1, 0, "wrong", 1),
            submission(1, 10 * SECONDS_PER_DAY, "correct", 1),
        ];

        let (x, y) = get_x_y(&[], &submissions, &config(0, 2)).unwrap();
        assert_eq!(y.get(1), Some(true));
        assert!(!x.has_column("correct"));
        assert_eq!(x.value(1, "wrong"), Some(1));
        assert_eq!(x.value(1, DAYS_ACTIVE_COLUMN), Some(0));
    }

    #[test]
    fn empty_inputs_produce_empty_tables() {
        let (x, y) = get_x_y(&[], &[], &PipelineConfig::default()).unwrap();
        assert!(x.is_empty());
        assert!(y.is_empty());
    }

    #[test]
    fn unknown_action_fails_the_whole_build() {
        let events = vec![event(1, 0, "viewed", 1), event(1, 5, "liked", 1)];
        let err = get_x_y(&events, &[], &config(0, 2)).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownAction { .. }));
    }
}
