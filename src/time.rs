//! Epoch seconds to calendar buckets.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{DatasetError, Result};
use crate::models::Timestamped;

/// A record augmented with its UTC datetime and calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dated<R> {
    pub record: R,
    pub date: NaiveDateTime,
    pub day: NaiveDate,
}

impl<R: Timestamped> Timestamped for Dated<R> {
    fn user_id(&self) -> i64 {
        self.record.user_id()
    }

    fn timestamp(&self) -> i64 {
        self.record.timestamp()
    }
}

pub fn to_datetime(timestamp: i64) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|instant| instant.naive_utc())
        .ok_or(DatasetError::TimestampOutOfRange { timestamp })
}

/// Attaches `date` and `day` to every record. Keeps every row in input order.
pub fn normalize_timestamps<R: Timestamped>(records: Vec<R>) -> Result<Vec<Dated<R>>> {
    records
        .into_iter()
        .map(|record| {
            let date = to_datetime(record.timestamp())?;
            Ok(Dated {
                record,
                date,
                day: date.date(),
            })
        })
        .collect()
}
