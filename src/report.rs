use std::collections::BTreeMap;
use std::fmt::Write;

use crate::config::PipelineConfig;
use crate::models::{ColumnSummary, DatasetSummary, FeatureTable, LabelSet};

pub fn summarize_columns(x: &FeatureTable) -> Vec<ColumnSummary> {
    x.columns
        .iter()
        .map(|column| {
            let total: u64 = x
                .rows
                .values()
                .map(|row| row.get(column).copied().unwrap_or(0))
                .sum();
            ColumnSummary {
                column: column.clone(),
                total,
                mean: if x.is_empty() {
                    0.0
                } else {
                    total as f64 / x.len() as f64
                },
            }
        })
        .collect()
}

pub fn summarize(x: &FeatureTable, y: &LabelSet) -> DatasetSummary {
    let users = y.len();
    let passed = y.passed_count();

    DatasetSummary {
        users,
        passed,
        pass_rate: if users == 0 {
            0.0
        } else {
            passed as f64 / users as f64
        },
        columns: summarize_columns(x),
    }
}

/// Users ordered by distinct correct steps, most first; ties by user id.
pub fn top_solvers(passed_steps: &BTreeMap<i64, usize>, limit: usize) -> Vec<(i64, usize)> {
    let mut solvers: Vec<(i64, usize)> = passed_steps
        .iter()
        .filter(|(_, steps)| **steps > 0)
        .map(|(user_id, steps)| (*user_id, *steps))
        .collect();
    solvers.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    solvers.truncate(limit);
    solvers
}

pub fn build_report(
    config: &PipelineConfig,
    x: &FeatureTable,
    y: &LabelSet,
    passed_steps: &BTreeMap<i64, usize>,
) -> String {
    let summary = summarize(x, y);
    let solvers = top_solvers(passed_steps, 10);

    let mut output = String::new();

    let _ = writeln!(output, "# Course Churn Dataset Report");
    let _ = writeln!(
        output,
        "Features from the first {} days of activity, pass threshold {} distinct correct steps",
        config.window_days, config.points_threshold
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Labels");

    if summary.users == 0 {
        let _ = writeln!(output, "No users in this snapshot.");
    } else {
        let _ = writeln!(
            output,
            "- {} users, {} passed ({:.1}%)",
            summary.users,
            summary.passed,
            summary.pass_rate * 100.0
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Feature Columns");

    if x.is_empty() {
        let _ = writeln!(output, "No feature rows in this window.");
    } else {
        for column in &summary.columns {
            let _ = writeln!(
                output,
                "- {}: total {} (mean {:.2} per user)",
                column.column, column.total, column.mean
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Steps Solved");

    if solvers.is_empty() {
        let _ = writeln!(output, "No correct submissions recorded.");
    } else {
        for (user_id, steps) in &solvers {
            let _ = writeln!(output, "- user {}: {} steps", user_id, steps);
        }
    }

    output
}
