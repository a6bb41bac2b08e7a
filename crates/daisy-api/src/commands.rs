// Command submission
//
// Batches go to `feedthecommands` addressed by the installation's
// `instCode`. Acceptance (`WS-000`) yields an action reference that the
// ack poller follows until the device confirms.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ack::{AckMode, AckOutcome, AckPolicy};
use crate::auth::Session;
use crate::client::DaisyClient;
use crate::error::Error;
use crate::models::{
    ActionReference, COMMAND_ACCEPTED, CommandRequest, FeedRequest, FeedResponse,
};

const FEED_PATH: &str = "tmate20/feedthecommands/";

impl DaisyClient {
    /// Submit a command batch without waiting for acknowledgment.
    ///
    /// `POST teleco/services/tmate20/feedthecommands/`. A `MessageID` other
    /// than `WS-000` is [`Error::CommandRejected`] and is not retried.
    pub async fn feed_commands(
        &self,
        session: &Session,
        inst_code: &str,
        commands: &[CommandRequest],
    ) -> Result<ActionReference, Error> {
        debug!(inst_code, count = commands.len(), "submitting command batch");

        let request = FeedRequest {
            commands_list: commands,
            id_installation: inst_code,
            id_session: session.id(),
            id_scenario: 0,
            is_scenario: false,
        };
        let text = self.post_text(FEED_PATH, &request).await?;
        let response: FeedResponse = crate::client::parse_body(&text)?;

        if response.message_id != COMMAND_ACCEPTED {
            return Err(Error::CommandRejected {
                message_id: response.message_id,
                payload: text,
            });
        }

        response
            .action_reference
            .ok_or_else(|| Error::Deserialization {
                message: "accepted batch without ActionReference".into(),
                body: text,
            })
    }

    /// Submit a batch and resolve it through the acknowledgment protocol.
    ///
    /// With [`AckMode::FireAndForget`] this returns
    /// [`AckOutcome::Pending`] right after acceptance.
    pub async fn send_commands(
        &self,
        session: &Session,
        inst_code: &str,
        commands: &[CommandRequest],
        mode: AckMode,
        policy: &AckPolicy,
        cancel: &CancellationToken,
    ) -> Result<AckOutcome, Error> {
        let reference = self.feed_commands(session, inst_code, commands).await?;
        debug!(%reference, ?mode, "batch accepted");

        match mode {
            AckMode::FireAndForget => Ok(AckOutcome::Pending),
            AckMode::Wait => {
                self.await_ack(session, inst_code, &reference, policy, cancel)
                    .await
            }
        }
    }
}
