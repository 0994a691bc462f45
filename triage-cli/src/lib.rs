//! Admission replay for the triage queue.
//!
//! Reads JSON-lines admission records, applies each to an
//! [`IndexedPriorityHeap`], and reports the most urgent patient at the end.
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::BufRead;
use tracing::{debug, info, warn};
use triage_queue::{Admitted, IndexedPriorityHeap};
use triage_types::{Admission, Patient};

/// How a replay treats bad input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Abort on the first invalid record instead of skipping it.
    pub strict: bool,
    /// Log the current top after every applied record.
    pub trace_top: bool,
}

/// A record that was skipped in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub line: usize,
    pub reason: String,
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: Vec<Rejection>,
    pub top: Option<Patient>,
}

/// Applies every record from `reader` to `heap`.
///
/// Invalid records never reach the heap. In strict mode the first one ends
/// the replay with an error naming its line; otherwise it is logged and
/// listed in the report.
pub fn replay<R: BufRead>(
    heap: &mut IndexedPriorityHeap,
    reader: R,
    options: ReplayOptions,
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }

        let admission = match Admission::parse_line(record) {
            Ok(admission) => admission,
            Err(err) if options.strict => {
                return Err(err).with_context(|| format!("Rejected record on line {line_no}"));
            }
            Err(err) => {
                warn!("Skipping line {}: {}", line_no, err);
                report.rejected.push(Rejection {
                    line: line_no,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let id = admission.id;
        match heap.admit(admission) {
            Admitted::Inserted => debug!("Admitted patient {} (line {})", id, line_no),
            Admitted::Updated => debug!("Updated patient {} (line {})", id, line_no),
        }
        report.applied += 1;

        if options.trace_top
            && let Some(top) = heap.peek()
        {
            info!("Top after line {}: {}", line_no, top);
        }
    }

    report.top = heap.peek();
    info!(
        "Replay finished: {} applied, {} rejected, {} queued",
        report.applied,
        report.rejected.len(),
        heap.len()
    );
    Ok(report)
}

/// Formats a report for stdout.
///
/// Text mode prints only the top patient as `id|priority|label`, or
/// `(empty)`; JSON mode prints the whole report.
pub fn render(report: &ReplayReport, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("Failed to encode report");
    }
    Ok(match &report.top {
        Some(top) => top.to_string(),
        None => "(empty)".to_string(),
    })
}
