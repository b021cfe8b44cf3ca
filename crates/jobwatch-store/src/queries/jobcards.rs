// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The paginated jobcard page query.
//!
//! Uses lookahead pagination: `page_size + 1` rows are requested and the
//! extra row, when present, is dropped and recorded as the has-next-page
//! flag. This avoids a separate count query while keeping the flag exact.
//!
//! Ordering is the fixed tuple `created_at ASC, priority DESC, status DESC`
//! (text comparison on the stored enumeration names). The tuple must not
//! change: pagination stability across pages depends on it.

use chrono::Utc;
use jobwatch_core::JobwatchError;
use jobwatch_core::types::{Jobcard, JobcardFilter, Page};
use rusqlite::named_params;
use tracing::{debug, error};

use crate::database::Database;

/// Page size used when the configuration does not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Timestamp format for date columns: UTC ISO-8601 with a `Z` suffix, so
/// that lexicographic comparison in SQL matches chronological order.
pub const SQL_DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const BASE_SELECT: &str = "\
    SELECT \
        j.id, \
        c.name AS client, \
        j.priority, \
        u.username AS assignee, \
        s.username AS supervisor, \
        j.reported_on, \
        j.description, \
        j.status, \
        j.start_date, \
        j.end_date, \
        j.completion_notes, \
        j.issues_arising, \
        group_concat(DISTINCT 'user_' || a.uploaded_by || '/' || a.file_name) AS files, \
        j.created_at \
    FROM jc_jobcards AS j \
    INNER JOIN jc_clients AS c ON j.client_id = c.id \
    LEFT JOIN jc_users AS u ON j.assigned_to = u.id \
    LEFT JOIN jc_users AS s ON j.supervised_by = s.id \
    LEFT JOIN jc_attachments AS a ON j.id = a.jobcard_id";

const TAIL: &str = "\
    GROUP BY j.id \
    ORDER BY j.created_at ASC, j.priority DESC, j.status DESC \
    LIMIT :limit OFFSET :offset";

/// OVERDUE is a virtual state: past its end date and never closed out.
const OVERDUE: &str = "(j.end_date IS NOT NULL AND j.end_date < :now \
    AND j.status NOT IN ('COMPLETED', 'CANCELLED'))";

/// Fetch one page of jobcards matching `filter`.
///
/// `page` is 1-based. Data-access errors are logged here and surfaced as
/// `Err(Storage)`; callers translate that into a retry-later user message
/// rather than crashing.
pub async fn fetch_page(
    db: &Database,
    filter: JobcardFilter,
    page: u32,
    page_size: u32,
) -> Result<Page, JobwatchError> {
    let page = page.max(1);
    let limit = i64::from(page_size) + 1;
    let offset = i64::from(page_size) * (i64::from(page) - 1);
    let now = Utc::now().format(SQL_DATETIME_FMT).to_string();

    let mut jobcards = db
        .connection()
        .call(move |conn| -> rusqlite::Result<Vec<Jobcard>> {
            let mut rows = Vec::new();
            match filter {
                JobcardFilter::Urgent => {
                    // Urgent active jobs, plus jobs with no scheduling info
                    // at all.
                    let sql = format!(
                        "{BASE_SELECT} \
                         WHERE ((j.status IN ('SCHEDULED', 'REPORTED') OR {OVERDUE}) \
                                AND j.priority = 'URGENT') \
                            OR (j.start_date IS NULL AND j.end_date IS NULL) {TAIL}"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    let mapped = stmt.query_map(
                        named_params! { ":now": now, ":limit": limit, ":offset": offset },
                        map_row,
                    )?;
                    for row in mapped {
                        rows.push(row?);
                    }
                }
                JobcardFilter::Overdue => {
                    let sql = format!("{BASE_SELECT} WHERE {OVERDUE} {TAIL}");
                    let mut stmt = conn.prepare(&sql)?;
                    let mapped = stmt.query_map(
                        named_params! { ":now": now, ":limit": limit, ":offset": offset },
                        map_row,
                    )?;
                    for row in mapped {
                        rows.push(row?);
                    }
                }
                JobcardFilter::Status(status) => {
                    let sql = format!("{BASE_SELECT} WHERE j.status = :status {TAIL}");
                    let mut stmt = conn.prepare(&sql)?;
                    let mapped = stmt.query_map(
                        named_params! {
                            ":status": status.to_string(),
                            ":limit": limit,
                            ":offset": offset,
                        },
                        map_row,
                    )?;
                    for row in mapped {
                        rows.push(row?);
                    }
                }
            }
            Ok(rows)
        })
        .await
        .map_err(|e| {
            error!(error = %e, page, filter = %filter.label(), "failed to fetch jobcard page");
            crate::database::map_tr_err(e)
        })?;

    let has_next_page = jobcards.len() as i64 == limit;
    if has_next_page {
        jobcards.pop();
    }

    debug!(
        page,
        count = jobcards.len(),
        has_next_page,
        filter = %filter.label(),
        "fetched jobcard page"
    );

    Ok(Page {
        jobcards,
        has_next_page,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Jobcard> {
    let priority: String = row.get(2)?;
    let status: String = row.get(7)?;
    Ok(Jobcard {
        id: row.get(0)?,
        client: row.get(1)?,
        priority: parse_enum(2, &priority)?,
        assignee: row.get(3)?,
        supervisor: row.get(4)?,
        reported_on: row.get(5)?,
        description: row.get(6)?,
        status: parse_enum(7, &status)?,
        start_date: row.get(8)?,
        end_date: row.get(9)?,
        completion_notes: row.get(10)?,
        issues_arising: row.get(11)?,
        files: row.get(12)?,
        created_at: row.get(13)?,
    })
}

fn parse_enum<T>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
