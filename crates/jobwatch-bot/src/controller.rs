// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation controller.
//!
//! Drives the command loop over a [`ChannelAdapter`]: parses inbound text,
//! enforces the per-identity cool-down, fetches jobcard pages, and paginates
//! report delivery. Each identity moves through three states: no session,
//! session with more pages, session exhausted.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jobwatch_config::model::BotConfig;
use jobwatch_core::error::JobwatchError;
use jobwatch_core::traits::{ChannelAdapter, SessionStore};
use jobwatch_core::types::{
    InboundMessage, JobcardFilter, MessageKind, OutboundMessage, Page, SessionState,
};
use jobwatch_store::Database;
use jobwatch_store::queries::jobcards::fetch_page;
use tracing::{Instrument, error, info, info_span, warn};

use crate::report;
use crate::session::next_eligible;

const GREETING: &str = "Hello from jobcards!";
const FETCHING: &str = "Fetching...";
const NO_MORE_JOBS: &str = "No more jobs to show";
const FETCH_FAILED: &str = "An error occurred fetching jobcards, please try again";
const INTERNAL_ERROR: &str = "Apologies, an internal error occurred";
const UNSUPPORTED: &str = "Unsupported message type";
const START_HINT: &str = "Text \"Hey\" to get the daily job reminders for today";
const MORE_HINT: &str = "Invalid! reply with 'more' for more jobs";
const EXHAUSTED_HINT: &str = "Invalid reply, however, no more jobs available at this time";
const TRAILER_MORE: &str = "Reply with 'more' for more jobs";
const TRAILER_DONE: &str = "That's all for now";

/// Controller knobs taken from `[bot]` config.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub page_size: u32,
    pub cooldown_hours: i64,
}

impl From<&BotConfig> for BotSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            page_size: config.page_size,
            cooldown_hours: config.cooldown_hours,
        }
    }
}

/// Conversation controller over one channel.
pub struct Controller<C: ChannelAdapter> {
    channel: Arc<C>,
    db: Database,
    sessions: Arc<dyn SessionStore>,
    settings: BotSettings,
}

impl<C: ChannelAdapter> Clone for Controller<C> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            db: self.db.clone(),
            sessions: Arc::clone(&self.sessions),
            settings: self.settings.clone(),
        }
    }
}

impl<C: ChannelAdapter> Controller<C> {
    pub fn new(
        channel: Arc<C>,
        db: Database,
        sessions: Arc<dyn SessionStore>,
        settings: BotSettings,
    ) -> Self {
        Self {
            channel,
            db,
            sessions,
            settings,
        }
    }

    /// Receive loop: each inbound message is handled on its own task so one
    /// slow conversation cannot stall the others.
    pub async fn run(&self) -> Result<(), JobwatchError> {
        loop {
            let msg = self.channel.receive().await?;
            let controller = self.clone();
            tokio::spawn(async move {
                controller.dispatch(msg).await;
            });
        }
    }

    /// Handle one message, catching every error at the top: log it for the
    /// identity and tell the user something went wrong, best-effort.
    pub async fn dispatch(&self, msg: InboundMessage) {
        let span = info_span!("inbound", sender = %msg.sender);
        async {
            info!("new message");
            let sender = msg.sender.clone();
            if let Err(e) = self.handle_message(msg, Utc::now()).await {
                error!(error = %e, "error serving user");
                if let Err(send_err) = self.say(&sender, INTERNAL_ERROR).await {
                    warn!(error = %send_err, "could not send error message to user");
                }
            }
        }
        .instrument(span)
        .await;
    }

    async fn handle_message(
        &self,
        msg: InboundMessage,
        now: DateTime<Utc>,
    ) -> Result<(), JobwatchError> {
        let text = match &msg.kind {
            MessageKind::Text(text) => text.trim().to_lowercase(),
            MessageKind::Unsupported(tag) => {
                info!(kind = %tag, "unsupported message type");
                return self.say(&msg.sender, UNSUPPORTED).await;
            }
        };

        if text == "hey" {
            return self.start(&msg.sender, JobcardFilter::Urgent, now).await;
        }
        if let Some(filter) = JobcardFilter::parse_token(&text) {
            return self.start(&msg.sender, filter, now).await;
        }
        if text == "more" {
            return self.more(&msg.sender).await;
        }

        // Unrecognized text: point at whichever command makes sense now.
        match self.sessions.get(&msg.sender) {
            Some(session) if session.has_next_page => self.say(&msg.sender, MORE_HINT).await,
            _ => self.say(&msg.sender, EXHAUSTED_HINT).await,
        }
    }

    /// A start command: cool-down check, then page 1 with the given filter.
    async fn start(
        &self,
        identity: &str,
        filter: JobcardFilter,
        now: DateTime<Utc>,
    ) -> Result<(), JobwatchError> {
        if let Some(session) = self.sessions.get(identity) {
            if let Some(next) =
                next_eligible(session.last_request, self.settings.cooldown_hours, now)
            {
                info!(next = %next, "start command inside cool-down");
                let hours = self.settings.cooldown_hours;
                return self
                    .say(
                        identity,
                        &format!(
                            "Your last request was less than {hours} hours ago, \
                             job reminders are available in {hours} hour intervals, \
                             request again as from {}",
                            report::format_timestamp(next)
                        ),
                    )
                    .await;
            }
        }

        let page = match fetch_page(&self.db, filter, 1, self.settings.page_size).await {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "error fetching jobcards");
                return self.say(identity, FETCH_FAILED).await;
            }
        };

        self.say(identity, GREETING).await?;
        self.deliver_page(identity, filter, &page).await?;
        self.sessions.set(
            identity,
            SessionState {
                filter,
                page: 1,
                has_next_page: page.has_next_page,
                last_request: now,
            },
        );
        Ok(())
    }

    /// The `more` command: next page with the session's stored filter.
    async fn more(&self, identity: &str) -> Result<(), JobwatchError> {
        let Some(session) = self.sessions.get(identity) else {
            return self.say(identity, START_HINT).await;
        };
        if !session.has_next_page {
            return self.say(identity, NO_MORE_JOBS).await;
        }

        self.say(identity, FETCHING).await?;
        let next_page = session.page + 1;
        let page = match fetch_page(&self.db, session.filter, next_page, self.settings.page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "error fetching jobcards");
                return self.say(identity, FETCH_FAILED).await;
            }
        };

        self.deliver_page(identity, session.filter, &page).await?;
        // `more` advances the page but never resets the cool-down.
        self.sessions.set(
            identity,
            SessionState {
                filter: session.filter,
                page: next_page,
                has_next_page: page.has_next_page,
                last_request: session.last_request,
            },
        );
        Ok(())
    }

    /// Preamble, one message per report, then the trailer.
    async fn deliver_page(
        &self,
        identity: &str,
        filter: JobcardFilter,
        page: &Page,
    ) -> Result<(), JobwatchError> {
        let preamble = match filter {
            JobcardFilter::Urgent => {
                "The following jobs are either overdue, scheduled, reported or unscheduled:"
                    .to_string()
            }
            _ => format!("The following jobs are currently {}:", filter.label()),
        };
        self.say(identity, &preamble).await?;

        for job in &page.jobcards {
            self.say(identity, &report::render(job)).await?;
        }

        let trailer = if page.has_next_page {
            TRAILER_MORE
        } else {
            TRAILER_DONE
        };
        self.say(identity, trailer).await
    }

    async fn say(&self, to: &str, body: &str) -> Result<(), JobwatchError> {
        self.channel
            .send(OutboundMessage {
                to: to.to_string(),
                body: body.to_string(),
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use jobwatch_core::types::{Priority, Status};
    use jobwatch_test_utils::fixtures::{SeedJobcard, TestDb};
    use jobwatch_test_utils::mock_channel::{MockChannel, text_message};

    use crate::session::InMemorySessionStore;

    const USER: &str = "263770000000";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap()
    }

    async fn setup(
        job_count: i64,
    ) -> (
        Controller<MockChannel>,
        Arc<MockChannel>,
        Arc<InMemorySessionStore>,
        TestDb,
    ) {
        let fixture = TestDb::new().await;
        for id in 1..=job_count {
            fixture.insert(SeedJobcard::new(id)).await;
        }
        let channel = Arc::new(MockChannel::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let controller = Controller::new(
            Arc::clone(&channel),
            fixture.db.clone(),
            sessions.clone(),
            BotSettings {
                page_size: 5,
                cooldown_hours: 12,
            },
        );
        (controller, channel, sessions, fixture)
    }

    #[tokio::test]
    async fn fresh_hey_delivers_greeting_page_and_trailer() {
        let (controller, channel, sessions, _fixture) = setup(6).await;

        controller
            .handle_message(text_message(USER, "  Hey "), now())
            .await
            .unwrap();

        // Greeting, preamble, five reports, has-more trailer.
        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 8);
        assert_eq!(sent[0].body, "Hello from jobcards!");
        assert_eq!(
            sent[1].body,
            "The following jobs are either overdue, scheduled, reported or unscheduled:"
        );
        assert!(sent[2].body.contains("*description:* job 1"));
        assert!(sent[6].body.contains("*description:* job 5"));
        assert_eq!(sent[7].body, "Reply with 'more' for more jobs");
        assert!(sent.iter().all(|m| m.to == USER));

        let session = sessions.get(USER).unwrap();
        assert_eq!(session.page, 1);
        assert!(session.has_next_page);
        assert_eq!(session.filter, JobcardFilter::Urgent);
        assert_eq!(session.last_request, now());
    }

    #[tokio::test]
    async fn short_final_page_ends_with_done_trailer() {
        let (controller, channel, _sessions, _fixture) = setup(3).await;

        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 6);
        assert_eq!(sent.last().unwrap().body, "That's all for now");
    }

    #[tokio::test]
    async fn status_token_starts_with_explicit_filter() {
        let (controller, channel, sessions, fixture) = setup(0).await;
        fixture
            .insert(SeedJobcard::new(1).priority(Priority::Low).status(Status::Completed))
            .await;

        controller
            .handle_message(text_message(USER, "Completed"), now())
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent[1].body, "The following jobs are currently completed:");
        assert!(sent[2].body.contains("*status:* COMPLETED"));
        assert_eq!(
            sessions.get(USER).unwrap().filter,
            JobcardFilter::Status(Status::Completed)
        );
    }

    #[tokio::test]
    async fn start_inside_cooldown_is_rejected_with_next_eligible_instant() {
        let (controller, channel, sessions, _fixture) = setup(6).await;
        let last_request = now() - Duration::hours(1);
        sessions.set(
            USER,
            SessionState {
                filter: JobcardFilter::Urgent,
                page: 1,
                has_next_page: true,
                last_request,
            },
        );

        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        // Exact next-eligible instant: last_request + 12h.
        assert!(sent[0]
            .body
            .contains(&report::format_timestamp(last_request + Duration::hours(12))));
        // Session untouched.
        assert_eq!(sessions.get(USER).unwrap().last_request, last_request);
    }

    #[tokio::test]
    async fn start_after_cooldown_elapsed_fetches_again() {
        let (controller, channel, sessions, _fixture) = setup(2).await;
        sessions.set(
            USER,
            SessionState {
                filter: JobcardFilter::Urgent,
                page: 1,
                has_next_page: false,
                last_request: now() - Duration::hours(13),
            },
        );

        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();

        assert_eq!(channel.sent_messages().await[0].body, "Hello from jobcards!");
        assert_eq!(sessions.get(USER).unwrap().last_request, now());
    }

    #[tokio::test]
    async fn more_without_session_gets_start_hint() {
        let (controller, channel, _sessions, _fixture) = setup(6).await;

        controller
            .handle_message(text_message(USER, "more"), now())
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].body,
            "Text \"Hey\" to get the daily job reminders for today"
        );
    }

    #[tokio::test]
    async fn more_advances_page_and_preserves_cooldown() {
        let (controller, channel, sessions, _fixture) = setup(6).await;
        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();
        channel.clear_sent().await;

        let later = now() + Duration::minutes(5);
        controller
            .handle_message(text_message(USER, "more"), later)
            .await
            .unwrap();

        // Fetching notice, preamble, the sixth job, done trailer.
        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].body, "Fetching...");
        assert!(sent[2].body.contains("*description:* job 6"));
        assert_eq!(sent[3].body, "That's all for now");

        let session = sessions.get(USER).unwrap();
        assert_eq!(session.page, 2);
        assert!(!session.has_next_page);
        assert_eq!(session.last_request, now());
    }

    #[tokio::test]
    async fn more_when_exhausted_says_no_more_jobs() {
        let (controller, channel, sessions, _fixture) = setup(3).await;
        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();
        channel.clear_sent().await;

        controller
            .handle_message(text_message(USER, "more"), now())
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "No more jobs to show");
        assert_eq!(sessions.get(USER).unwrap().page, 1);
    }

    #[tokio::test]
    async fn unrecognized_text_hints_at_the_right_command() {
        let (controller, channel, _sessions, _fixture) = setup(6).await;

        // No session yet.
        controller
            .handle_message(text_message(USER, "what"), now())
            .await
            .unwrap();
        assert_eq!(
            channel.sent_messages().await[0].body,
            "Invalid reply, however, no more jobs available at this time"
        );
        channel.clear_sent().await;

        // With a has-more session.
        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();
        channel.clear_sent().await;
        controller
            .handle_message(text_message(USER, "what"), now())
            .await
            .unwrap();
        assert_eq!(
            channel.sent_messages().await[0].body,
            "Invalid! reply with 'more' for more jobs"
        );
    }

    #[tokio::test]
    async fn non_text_message_is_answered_without_state_change() {
        let (controller, channel, sessions, _fixture) = setup(6).await;

        let msg = InboundMessage {
            id: "wamid.img".to_string(),
            sender: USER.to_string(),
            kind: MessageKind::Unsupported("image".to_string()),
            timestamp: "1756000000".to_string(),
        };
        controller.handle_message(msg, now()).await.unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "Unsupported message type");
        assert!(sessions.get(USER).is_none());
    }

    #[tokio::test]
    async fn fetch_failure_sends_retry_message_and_leaves_session_untouched() {
        let (controller, channel, sessions, fixture) = setup(6).await;
        fixture.db.close().await.unwrap();

        controller
            .handle_message(text_message(USER, "hey"), now())
            .await
            .unwrap();

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].body,
            "An error occurred fetching jobcards, please try again"
        );
        assert!(sessions.get(USER).is_none());
    }

    #[tokio::test]
    async fn dispatch_completes_on_handled_storage_failure() {
        let (controller, channel, _sessions, fixture) = setup(0).await;
        fixture.db.close().await.unwrap();

        // A storage failure is handled inside the command, so dispatch ends
        // with the retry message rather than the generic apology.
        controller.dispatch(text_message(USER, "hey")).await;
        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].body,
            "An error occurred fetching jobcards, please try again"
        );
    }

    #[tokio::test]
    async fn dispatch_apologizes_when_delivery_fails_midway() {
        let (controller, channel, sessions, _fixture) = setup(6).await;
        // Greeting and preamble go out, the first report send fails.
        channel.fail_sends(2, 1).await;

        controller.dispatch(text_message(USER, "hey")).await;

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].body, "Hello from jobcards!");
        assert_eq!(
            sent[2].body,
            "Apologies, an internal error occurred"
        );
        // Delivery never completed, so no session was recorded.
        assert!(sessions.get(USER).is_none());
    }

    #[tokio::test]
    async fn dispatch_survives_apology_send_failure() {
        let (controller, channel, sessions, _fixture) = setup(6).await;
        // Everything after the preamble fails, the apology included.
        channel.fail_sends(2, usize::MAX).await;

        controller.dispatch(text_message(USER, "hey")).await;

        assert_eq!(channel.sent_count().await, 2);
        assert!(sessions.get(USER).is_none());
    }
}
