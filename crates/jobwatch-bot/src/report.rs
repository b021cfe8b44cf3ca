// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jobcard report rendering.
//!
//! Pure text formatting; one rendered report becomes one WhatsApp message.
//! Attachments are never transmitted, only announced.

use chrono::{DateTime, Utc};
use jobwatch_core::types::Jobcard;

/// Report date format, e.g. `2026-01-05 at: 8:30 AM`.
const REPORT_DATE_FMT: &str = "%Y-%m-%d at: %-l:%M %p";

const ATTACHMENT_NOTICE: &str =
    "- This jobcard has some attached files, login to the web app to view them";

/// Format a timestamp the way reports show dates.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(REPORT_DATE_FMT).to_string()
}

fn format_optional(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => format_timestamp(ts),
        None => "Not set".to_string(),
    }
}

/// Render one jobcard into its message body.
///
/// Priority, client, description, assignee, status, and the three dates
/// always appear; completion notes and matters arising only when non-blank;
/// a fixed notice is appended when the jobcard has attachments.
pub fn render(job: &Jobcard) -> String {
    let mut lines = vec![
        format!("*priority:* {}", job.priority),
        format!("*client:* {}", job.client),
        format!("*description:* {}", job.description),
        format!(
            "*assignee:* {}",
            job.assignee.as_deref().unwrap_or("Unassigned")
        ),
        format!("*status:* {}", job.status),
        format!("*reported on:* {}", format_timestamp(job.reported_on)),
        format!("*start date:* {}", format_optional(job.start_date)),
        format!("*end date:* {}", format_optional(job.end_date)),
    ];

    if let Some(notes) = nonblank(&job.completion_notes) {
        lines.push(format!("*completion notes:* {notes}"));
    }
    if let Some(issues) = nonblank(&job.issues_arising) {
        lines.push(format!("*matters arising:* {issues}"));
    }
    if job.files.is_some() {
        lines.push(ATTACHMENT_NOTICE.to_string());
    }

    lines.join("\n")
}

fn nonblank(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
