use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::Result;
use crate::interactions::{create_interactions, Action};
use crate::models::{EventRecord, LabelSet, SubmissionRecord};

/// Distinct steps each user answered correctly across their whole history.
pub fn passed_steps(
    events: &[EventRecord],
    submissions: &[SubmissionRecord],
) -> Result<BTreeMap<i64, usize>> {
    let interactions = create_interactions(events, submissions)?;
    let mut steps: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();

    for row in &interactions {
        let entry = steps.entry(row.user_id).or_default();
        if row.action == Action::Correct {
            entry.insert(row.step_id);
        }
    }

    Ok(steps
        .into_iter()
        .map(|(user_id, solved)| (user_id, solved.len()))
        .collect())
}

/// Builds y from untruncated history: a user passed when their count of
/// distinct correct steps exceeds `points_threshold`.
pub fn derive_labels(
    events: &[EventRecord],
    submissions: &[SubmissionRecord],
    points_threshold: u32,
) -> Result<LabelSet> {
    let threshold = points_threshold as usize;
    let labels: BTreeMap<i64, bool> = passed_steps(events, submissions)?
        .into_iter()
        .map(|(user_id, correct)| (user_id, correct > threshold))
        .collect();

    debug!(users = labels.len(), points_threshold, "derived labels");
    Ok(LabelSet { labels })
}
