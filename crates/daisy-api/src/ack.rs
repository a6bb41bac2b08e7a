// Acknowledgment polling
//
// After a batch is accepted the service executes it asynchronously. The
// `getackcommand` endpoint reports `RCV` while the device has not yet
// answered and `PROC` once it has. Any other text is a device-reported
// failure. Polling is an explicit loop bounded by attempt count and wall
// clock, and stops early on cancellation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::auth::Session;
use crate::client::DaisyClient;
use crate::error::Error;
use crate::models::{ACK_MESSAGE_ID, AckReply, AckRequest, ActionReference};

const ACK_PATH: &str = "tmate20/getackcommand/";

/// Final (or, for fire-and-forget, initial) state of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AckOutcome {
    /// Not confirmed. Returned when acknowledgment was not awaited.
    #[strum(serialize = "pending")]
    Pending,
    /// The device executed the batch (`PROC`).
    #[strum(serialize = "succeeded")]
    Succeeded,
    /// The device reported something other than `RCV`/`PROC`.
    #[strum(serialize = "failed")]
    Failed { message_text: String },
}

impl AckOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// `MessageText` values of a single acknowledgment reply.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum AckText {
    #[strum(serialize = "RCV")]
    Received,
    #[strum(serialize = "PROC")]
    Processed,
    #[strum(default)]
    Other(String),
}

/// Whether to wait for the device to confirm a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckMode {
    #[default]
    Wait,
    FireAndForget,
}

/// Bounds of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckPolicy {
    /// Delay between two polls while the reply is `RCV`.
    pub interval: Duration,
    /// Maximum number of polls, including the first.
    pub max_attempts: u32,
    /// Wall-clock budget for the whole loop.
    pub deadline: Option<Duration>,
}

impl Default for AckPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 40,
            deadline: Some(Duration::from_secs(30)),
        }
    }
}

impl AckPolicy {
    fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        if attempts >= self.max_attempts {
            return true;
        }
        self.deadline
            .is_some_and(|budget| started.elapsed() + self.interval > budget)
    }
}

impl DaisyClient {
    /// Poll the acknowledgment endpoint once.
    ///
    /// `POST teleco/services/tmate20/getackcommand/`. A `MessageID` other
    /// than `WS-300` is [`Error::AckProtocol`].
    pub async fn poll_ack(
        &self,
        session: &Session,
        inst_code: &str,
        reference: &ActionReference,
    ) -> Result<AckText, Error> {
        let reply: AckReply = self
            .post_json(
                ACK_PATH,
                &AckRequest {
                    id: reference,
                    id_installation: inst_code,
                    id_session: session.id(),
                },
            )
            .await?;

        if reply.message_id != ACK_MESSAGE_ID {
            return Err(Error::AckProtocol {
                message_id: reply.message_id,
            });
        }

        // `default` variant makes parsing infallible
        Ok(reply
            .message_text
            .parse()
            .unwrap_or(AckText::Other(reply.message_text)))
    }

    /// Run the acknowledgment state machine until a terminal state.
    ///
    /// `RCV` keeps polling after `policy.interval`; `PROC` ends in
    /// [`AckOutcome::Succeeded`]; any other text ends in
    /// [`AckOutcome::Failed`]. Running out of attempts or time is
    /// [`Error::AckTimeout`]; cancellation is [`Error::Cancelled`].
    pub async fn await_ack(
        &self,
        session: &Session,
        inst_code: &str,
        reference: &ActionReference,
        policy: &AckPolicy,
        cancel: &CancellationToken,
    ) -> Result<AckOutcome, Error> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            let text = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::Cancelled),
                reply = self.poll_ack(session, inst_code, reference) => reply?,
            };

            match text {
                AckText::Processed => {
                    debug!(%reference, attempts, "command acknowledged");
                    return Ok(AckOutcome::Succeeded);
                }
                AckText::Other(message_text) => {
                    debug!(%reference, attempts, message_text, "command failed on device");
                    return Ok(AckOutcome::Failed { message_text });
                }
                AckText::Received => {
                    trace!(%reference, attempts, "acknowledgment pending");
                }
            }

            if policy.exhausted(attempts, started) {
                return Err(Error::AckTimeout {
                    attempts,
                    elapsed_ms: started.elapsed().as_millis(),
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::Cancelled),
                () = tokio::time::sleep(policy.interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_text_parses_known_and_unknown() {
        assert_eq!("RCV".parse::<AckText>().ok(), Some(AckText::Received));
        assert_eq!("PROC".parse::<AckText>().ok(), Some(AckText::Processed));
        assert_eq!(
            "ERR".parse::<AckText>().ok(),
            Some(AckText::Other("ERR".into()))
        );
    }

    #[test]
    fn policy_exhausts_on_attempts() {
        let policy = AckPolicy {
            interval: Duration::from_millis(1),
            max_attempts: 3,
            deadline: None,
        };
        let started = Instant::now();
        assert!(!policy.exhausted(2, started));
        assert!(policy.exhausted(3, started));
    }

    #[test]
    fn policy_exhausts_when_next_sleep_passes_deadline() {
        let policy = AckPolicy {
            interval: Duration::from_secs(5),
            max_attempts: 100,
            deadline: Some(Duration::from_secs(1)),
        };
        assert!(policy.exhausted(1, Instant::now()));
    }

    #[test]
    fn pending_is_not_terminal() {
        assert!(!AckOutcome::Pending.is_terminal());
        assert!(AckOutcome::Succeeded.is_terminal());
        assert!(
            AckOutcome::Failed {
                message_text: "KO".into()
            }
            .is_terminal()
        );
    }
}
