// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and message types shared across the Jobwatch workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier assigned to an outbound message by the channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Jobcard priority, from the closed enumeration used by the web application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Urgent,
    Medium,
    Low,
}

/// Stored jobcard status. `OVERDUE` is a virtual state computed by the page
/// query from `end_date`, never written to the database, and therefore has
/// no variant here — see [`JobcardFilter::Overdue`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Reported,
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
    Suspended,
}

/// Selection mode for the jobcard page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobcardFilter {
    /// Default mode: urgent active jobs, plus jobs with no scheduling info
    /// at all.
    Urgent,
    /// Jobs past their end date that were never completed or cancelled.
    Overdue,
    /// Jobs in one explicit stored status.
    Status(Status),
}

impl JobcardFilter {
    /// Parse a user-supplied filter token (already trimmed and lowercased).
    ///
    /// Recognizes the six stored status names plus `overdue`. Returns `None`
    /// for anything else; the greeting token is handled by the controller.
    pub fn parse_token(token: &str) -> Option<JobcardFilter> {
        if token.eq_ignore_ascii_case("overdue") {
            return Some(JobcardFilter::Overdue);
        }
        token.parse::<Status>().ok().map(JobcardFilter::Status)
    }

    /// Human-readable label used in preamble messages and logs.
    pub fn label(&self) -> String {
        match self {
            JobcardFilter::Urgent => "urgent".to_string(),
            JobcardFilter::Overdue => "overdue".to_string(),
            JobcardFilter::Status(s) => s.to_string().to_lowercase(),
        }
    }
}

/// A work-order record, read from the jobcard database.
///
/// Rows are created and mutated exclusively by the external web application;
/// Jobwatch only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jobcard {
    pub id: i64,
    pub client: String,
    pub priority: Priority,
    pub description: String,
    pub assignee: Option<String>,
    pub supervisor: Option<String>,
    pub status: Status,
    pub reported_on: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub completion_notes: Option<String>,
    pub issues_arising: Option<String>,
    /// Aggregated attachment summary (`user_<id>/<file>` entries joined by
    /// commas), or `None` when the jobcard has no attachments.
    pub files: Option<String>,
    /// Immutable creation timestamp; the primary sort key for pagination.
    pub created_at: DateTime<Utc>,
}

/// One window of query results plus a lookahead flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub jobcards: Vec<Jobcard>,
    pub has_next_page: bool,
}

/// Per-conversation state held by the session tracker.
///
/// Lives only in process memory; lost on restart by design.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Filter the identity last fetched with; `more` reuses it.
    pub filter: JobcardFilter,
    /// Page most recently delivered, 1-based.
    pub page: u32,
    /// Lookahead flag from the page just delivered.
    pub has_next_page: bool,
    /// Timestamp of the last successful start fetch, for the cool-down.
    pub last_request: DateTime<Utc>,
}

/// Payload of an inbound channel message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    Text(String),
    /// Any non-text message; carries the channel's type tag (`image`,
    /// `audio`, ...) for logging.
    Unsupported(String),
}

/// An inbound message received from the channel.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Channel-assigned message id.
    pub id: String,
    /// Conversation identity of the sender (WhatsApp wa_id / phone number).
    pub sender: String,
    pub kind: MessageKind,
    /// Channel-reported timestamp, unparsed.
    pub timestamp: String,
}

/// An outbound text message to be sent via the channel.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub to: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn priority_and_status_roundtrip_through_strings() {
        for p in [Priority::Urgent, Priority::Medium, Priority::Low] {
            assert_eq!(Priority::from_str(&p.to_string()).unwrap(), p);
        }
        for s in [
            Status::Reported,
            Status::Scheduled,
            Status::Ongoing,
            Status::Completed,
            Status::Cancelled,
            Status::Suspended,
        ] {
            assert_eq!(Status::from_str(&s.to_string()).unwrap(), s);
        }
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(Status::from_str("scheduled").unwrap(), Status::Scheduled);
        assert_eq!(Status::from_str("SCHEDULED").unwrap(), Status::Scheduled);
    }

    #[test]
    fn filter_token_recognizes_statuses_and_overdue() {
        assert_eq!(
            JobcardFilter::parse_token("ongoing"),
            Some(JobcardFilter::Status(Status::Ongoing))
        );
        assert_eq!(
            JobcardFilter::parse_token("overdue"),
            Some(JobcardFilter::Overdue)
        );
        assert_eq!(JobcardFilter::parse_token("hey"), None);
        assert_eq!(JobcardFilter::parse_token("more"), None);
        assert_eq!(JobcardFilter::parse_token(""), None);
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&Status::Reported).unwrap();
        assert_eq!(json, "\"REPORTED\"");
        assert_eq!(Status::Reported.to_string(), "REPORTED");
    }
}
