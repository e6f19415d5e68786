//! Comma-delimited tables.
//!
//! Fields containing a delimiter, quote or line break are quoted, with
//! embedded quotes doubled.

use std::borrow::Cow;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::models::ScheduledOp;

const OPS_HEADER: [&str; 6] = ["job_id", "op_index", "machine_id", "start", "end", "duration"];

/// One row of the per-instance summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Scenario label, e.g. `fcfs` or `opt_weighted_A_uniform`.
    pub schedule_type: String,
    /// Objective description.
    pub objective: String,
    /// Objective value (sentinel when unsolved).
    pub objective_value: i64,
    /// Solver status label; `-` for simulated schedules.
    pub status: String,
    /// Makespan (sentinel when unsolved).
    pub makespan: i64,
    /// Completion time per job (empty when unsolved).
    pub job_completion: Vec<i64>,
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, fields: &[S]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")
}

/// Writes scheduled operations sorted by `(machine_id, start, end, job_id, op_index)`.
pub fn write_ops_table<W: Write>(mut writer: W, ops: &[ScheduledOp]) -> Result<(), ExportError> {
    let mut sorted: Vec<&ScheduledOp> = ops.iter().collect();
    sorted.sort_by_key(|op| (op.machine_id, op.start, op.end, op.job_id, op.op_index));

    write_row(&mut writer, &OPS_HEADER)?;
    for op in sorted {
        write_row(
            &mut writer,
            &[
                op.job_id.to_string(),
                op.op_index.to_string(),
                op.machine_id.to_string(),
                op.start.to_string(),
                op.end.to_string(),
                op.duration.to_string(),
            ],
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the summary table. Job completion columns `C_job{j}` span the
/// widest row; shorter rows leave the trailing cells empty.
pub fn write_summary_table<W: Write>(mut writer: W, rows: &[SummaryRow]) -> Result<(), ExportError> {
    let num_jobs = rows.iter().map(|r| r.job_completion.len()).max().unwrap_or(0);

    let mut header: Vec<String> = ["schedule_type", "objective", "objective_value", "status", "makespan"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend((0..num_jobs).map(|j| format!("C_job{j}")));
    write_row(&mut writer, &header)?;

    for row in rows {
        let mut fields = vec![
            row.schedule_type.clone(),
            row.objective.clone(),
            row.objective_value.to_string(),
            row.status.clone(),
            row.makespan.to_string(),
        ];
        fields.extend(
            (0..num_jobs).map(|j| row.job_completion.get(j).map(i64::to_string).unwrap_or_default()),
        );
        write_row(&mut writer, &fields)?;
    }
    writer.flush()?;
    Ok(())
}
