use anyhow::Context;
use sqlx::{PgPool, Row};

use crate::dataset;
use crate::models::{EventRecord, SubmissionRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn import_events_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let events = dataset::read_events(csv_path)
        .with_context(|| format!("failed to read events from {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for event in &events {
        let result = sqlx::query(
            r#"
            INSERT INTO course_logs.events (user_id, timestamp, action, step_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(event.user_id)
        .bind(event.timestamp)
        .bind(&event.action)
        .bind(event.step_id)
        .execute(pool)
        .await?;

        inserted += result.rows_affected() as usize;
    }

    Ok(inserted)
}

pub async fn import_submissions_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    let submissions = dataset::read_submissions(csv_path)
        .with_context(|| format!("failed to read submissions from {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for submission in &submissions {
        let result = sqlx::query(
            r#"
            INSERT INTO course_logs.submissions (user_id, timestamp, submission_status, step_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(submission.user_id)
        .bind(submission.timestamp)
        .bind(&submission.submission_status)
        .bind(submission.step_id)
        .execute(pool)
        .await?;

        inserted += result.rows_affected() as usize;
    }

    Ok(inserted)
}

pub async fn fetch_events(pool: &PgPool) -> anyhow::Result<Vec<EventRecord>> {
    let rows = sqlx::query(
        "SELECT user_id, timestamp, action, step_id FROM course_logs.events ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch events")?;

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        events.push(EventRecord {
            user_id: row.get("user_id"),
            timestamp: row.get("timestamp"),
            action: row.get("action"),
            step_id: row.get("step_id"),
        });
    }

    Ok(events)
}

pub async fn fetch_submissions(pool: &PgPool) -> anyhow::Result<Vec<SubmissionRecord>> {
    let rows = sqlx::query(
        "SELECT user_id, timestamp, submission_status, step_id \
         FROM course_logs.submissions ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch submissions")?;

    let mut submissions = Vec::with_capacity(rows.len());
    for row in rows {
        submissions.push(SubmissionRecord {
            user_id: row.get("user_id"),
            timestamp: row.get("timestamp"),
            submission_status: row.get("submission_status"),
            step_id: row.get("step_id"),
        });
    }

    Ok(submissions)
}
