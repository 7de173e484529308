//! Unified, ordered interaction log built from events and submissions.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{DatasetError, Result};
use crate::models::{EventRecord, SubmissionRecord, Timestamped};

/// Every category an interaction may carry. Ranking only breaks timestamp
/// ties, it says nothing about progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Discovered,
    Viewed,
    StartedAttempt,
    Wrong,
    Passed,
    Correct,
}

impl Action {
    pub const ORDER: [Action; 6] = [
        Action::Discovered,
        Action::Viewed,
        Action::StartedAttempt,
        Action::Wrong,
        Action::Passed,
        Action::Correct,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Action::Discovered => 0,
            Action::Viewed => 1,
            Action::StartedAttempt => 2,
            Action::Wrong => 3,
            Action::Passed => 4,
            Action::Correct => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Discovered => "discovered",
            Action::Viewed => "viewed",
            Action::StartedAttempt => "started_attempt",
            Action::Wrong => "wrong",
            Action::Passed => "passed",
            Action::Correct => "correct",
        }
    }
}

impl FromStr for Action {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self> {
        Action::ORDER
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| DatasetError::UnknownAction {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub user_id: i64,
    pub timestamp: i64,
    pub action: Action,
    pub step_id: i64,
}

impl Timestamped for InteractionRecord {
    fn user_id(&self) -> i64 {
        self.user_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Stacks events and submissions (status becomes `action`) and sorts by
/// user, timestamp, then action rank. Rows are never deduplicated.
pub fn create_interactions(
    events: &[EventRecord],
    submissions: &[SubmissionRecord],
) -> Result<Vec<InteractionRecord>> {
    let mut interactions = Vec::with_capacity(events.len() + submissions.len());

    for event in events {
        interactions.push(InteractionRecord {
            user_id: event.user_id,
            timestamp: event.timestamp,
            action: event.action.parse()?,
            step_id: event.step_id,
        });
    }

    for submission in submissions {
        interactions.push(InteractionRecord {
            user_id: submission.user_id,
            timestamp: submission.timestamp,
            action: submission.submission_status.parse()?,
            step_id: submission.step_id,
        });
    }

    interactions.sort_by_key(|row| (row.user_id, row.timestamp, row.action.rank()));
    debug!(rows = interactions.len(), "built interaction log");
    Ok(interactions)
}
