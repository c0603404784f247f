//! Outbound side of the bot: the platform port and helpers around it.

pub mod port;
pub mod throttled;

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::MessageRef;

pub use port::{ChatPlatform, MemberStatus};

/// Delete a message, ignoring platform rejections.
///
/// Returns whether the message was deleted. Telegram refuses deletes for
/// messages that are already gone or when the bot lacks rights; neither is
/// actionable, so the failure only shows up at debug level.
pub async fn delete_best_effort(platform: &dyn ChatPlatform, msg: MessageRef) -> bool {
    match platform.delete_message(msg).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(
                chat_id = msg.chat_id.0,
                message_id = msg.message_id.0,
                "delete skipped: {e}"
            );
            false
        }
    }
}

/// Delete `msg` after `delay` on an independent task.
///
/// The task owns its error handling and is only abandoned when the process
/// exits.
pub fn schedule_delete(
    platform: Arc<dyn ChatPlatform>,
    msg: MessageRef,
    delay: Duration,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        delete_best_effort(platform.as_ref(), msg).await
    })
}
