//! CSV loading of raw course logs and writing of X / y.

use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DatasetError, Result};
use crate::models::{EventRecord, FeatureTable, LabelSet, SubmissionRecord};

pub const EVENT_COLUMNS: [&str; 4] = ["user_id", "timestamp", "action", "step_id"];
pub const SUBMISSION_COLUMNS: [&str; 4] = ["user_id", "timestamp", "submission_status", "step_id"];

fn read_table<T, R>(
    reader: R,
    table: &'static str,
    required: &[&'static str],
) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: io::Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    for &column in required {
        if !headers.iter().any(|header| header == column) {
            return Err(DatasetError::MissingColumn { table, column });
        }
    }

    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        rows.push(result?);
    }
    debug!(table, rows = rows.len(), "loaded raw table");
    Ok(rows)
}

pub fn read_events_from<R: io::Read>(reader: R) -> Result<Vec<EventRecord>> {
    read_table(reader, "events", &EVENT_COLUMNS)
}

pub fn read_submissions_from<R: io::Read>(reader: R) -> Result<Vec<SubmissionRecord>> {
    read_table(reader, "submissions", &SUBMISSION_COLUMNS)
}

pub fn read_events(path: &Path) -> Result<Vec<EventRecord>> {
    read_events_from(std::fs::File::open(path)?)
}

pub fn read_submissions(path: &Path) -> Result<Vec<SubmissionRecord>> {
    read_submissions_from(std::fs::File::open(path)?)
}

pub fn write_features_to<W: io::Write>(writer: W, x: &FeatureTable) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header = vec!["user_id".to_string()];
    header.extend(x.columns.iter().cloned());
    writer.write_record(&header)?;

    for user_id in x.rows.keys() {
        let mut record = vec![user_id.to_string()];
        if let Some(values) = x.row_values(*user_id) {
            record.extend(values.iter().map(u64::to_string));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_labels_to<W: io::Write>(writer: W, y: &LabelSet) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["user_id", "is_gone"])?;

    for (user_id, passed) in &y.labels {
        writer.write_record([user_id.to_string(), passed.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_features(path: &Path, x: &FeatureTable) -> Result<()> {
    write_features_to(std::fs::File::create(path)?, x)
}

pub fn write_labels(path: &Path, y: &LabelSet) -> Result<()> {
    write_labels_to(std::fs::File::create(path)?, y)
}
