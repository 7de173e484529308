use std::collections::HashMap;

use tracing::debug;

use crate::models::Timestamped;

pub const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Per-user cutoff: first activity plus `n_day` whole days.
pub fn user_cutoffs<R: Timestamped>(records: &[R], n_day: u32) -> HashMap<i64, i64> {
    let mut first_seen: HashMap<i64, i64> = HashMap::new();

    for record in records {
        first_seen
            .entry(record.user_id())
            .and_modify(|min| *min = (*min).min(record.timestamp()))
            .or_insert(record.timestamp());
    }

    let horizon = SECONDS_PER_DAY.saturating_mul(i64::from(n_day));
    first_seen
        .into_iter()
        .map(|(user_id, min)| (user_id, min.saturating_add(horizon)))
        .collect()
}

/// Keeps each user's rows up to and including their own cutoff.
/// Every user keeps at least the rows at their first timestamp.
pub fn truncate_by_days<R: Timestamped + Clone>(records: &[R], n_day: u32) -> Vec<R> {
    let cutoffs = user_cutoffs(records, n_day);

    let kept: Vec<R> = records
        .iter()
        .filter(|record| {
            cutoffs
                .get(&record.user_id())
                .is_some_and(|cutoff| record.timestamp() <= *cutoff)
        })
        .cloned()
        .collect();

    debug!(
        n_day,
        rows_in = records.len(),
        rows_kept = kept.len(),
        "truncated records to activity window"
    );
    kept
}
