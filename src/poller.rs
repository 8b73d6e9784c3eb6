use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{check_response, current_date, now_secs, StatusClient};
use crate::formatter::{parse_status, StatusUpdate};
use crate::notifier::{send_message, Notifier};

/// Mutable state carried from one iteration to the next. Lives only in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PollState {
    /// Lower bound (`from_date`) for the next request.
    pub cursor: i64,
    /// Last delivered message per homework name.
    pub last_notified: HashMap<String, String>,
    /// Text of the last failure reported to the chat.
    pub last_error: Option<String>,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_notified: HashMap::new(),
            last_error: None,
        }
    }
}

/// What a successful iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// `homeworks` was empty.
    NothingNew,
    /// Latest homework status matches what was already sent.
    Unchanged,
    /// A status change was sent (`delivered == false` if the bot failed).
    Notified { message: String, delivered: bool },
}

/// Drives the fetch → validate → format → notify cycle.
pub struct HomeworkPoller<N: Notifier> {
    cfg: Config,
    api: StatusClient,
    bot: N,
    state: PollState,
}

impl<N: Notifier> HomeworkPoller<N> {
    pub fn new(cfg: Config, api: StatusClient, bot: N) -> Self {
        Self::with_state(cfg, api, bot, PollState::new(now_secs()))
    }

    pub fn with_state(cfg: Config, api: StatusClient, bot: N, state: PollState) -> Self {
        Self { cfg, api, bot, state }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub async fn run(mut self) {
        info!(
            cursor = self.state().cursor,
            interval_secs = self.cfg.retry_interval.as_secs(),
            "Homework poller started"
        );
        loop {
            self.run_iteration().await;
            tokio::time::sleep(self.cfg.retry_interval).await;
        }
    }

    /// One loop pass. Errors stop here: they are logged, reported to the chat
    /// once per distinct text (until a report is delivered), and the cursor
    /// stays where it was.
    pub async fn run_iteration(&mut self) {
        match self.poll_once().await {
            Ok(outcome) => {
                if let PollOutcome::Notified { message, delivered: false } = &outcome {
                    warn!("Status change not delivered, will retry: {message}");
                }
                debug!(?outcome, cursor = self.state.cursor, "Iteration complete");
                self.state.last_error = None;
            }
            Err(e) => {
                let message = format!("Program failure: {e}");
                if e.is_connection() {
                    warn!(cursor = self.state.cursor, "{message}");
                } else {
                    error!(cursor = self.state.cursor, "{message}");
                }
                if self.state.last_error.as_deref() != Some(message.as_str())
                    && send_message(&self.bot, &self.cfg.chat_id, &message).await
                {
                    self.state.last_error = Some(message);
                }
            }
        }
    }

    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        let response = self.api.fetch_status(Some(self.state.cursor)).await?;

        let outcome = match check_response(&response)? {
            None => {
                debug!("No homework updates");
                PollOutcome::NothingNew
            }
            Some(homework) => {
                let StatusUpdate { record, message } = parse_status(homework)?;
                let name = record.homework_name;
                if self.state.last_notified.get(&name) == Some(&message) {
                    debug!(homework = %name, "Status unchanged");
                    PollOutcome::Unchanged
                } else {
                    let delivered = send_message(&self.bot, &self.cfg.chat_id, &message).await;
                    if delivered {
                        self.state.last_notified.insert(name, message.clone());
                    }
                    PollOutcome::Notified { message, delivered }
                }
            }
        };

        // An undelivered change must come back in the next response.
        if let PollOutcome::Notified { delivered: false, .. } = outcome {
            debug!(cursor = self.state.cursor, "Delivery failed, keeping cursor");
            return Ok(outcome);
        }

        match current_date(&response) {
            Some(ts) => self.state.cursor = ts,
            None => warn!(cursor = self.state.cursor, "Response has no current_date, keeping cursor"),
        }

        Ok(outcome)
    }
}
