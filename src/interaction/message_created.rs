//! This module handles newly posted messages.

use tracing::{instrument, warn};

use crate::{
    base::types::{Conversation, Event, Message, MessageEventData, Void},
    runtime::Runtime,
};

/// Handles the message created event.
///
/// Caches the message's reactions as the baseline for later edits, follows the thread
/// the message starts (unless the bot wrote it), and marks the conversation or thread
/// as read whether or not the previous steps succeeded.
#[instrument(skip_all)]
pub async fn handle_message_created(event: &Event, runtime: &Runtime) -> Void {
    let data = MessageEventData::from_event(event)?;
    let conversation = data.conversation();

    let result = cache_and_follow(&data.message, runtime).await;

    mark_read(&data.message, &conversation, runtime).await;

    result
}

/// Stores the baseline reactions and follows the thread rooted at this message.
async fn cache_and_follow(message: &Message, runtime: &Runtime) -> Void {
    runtime.store.put(&message.id, message.reactions.clone());

    if !message.is_thread_reply() && message.user_id != runtime.chat.bot_user_id() {
        runtime.chat.follow_thread(&message.workspace, &message.id).await?;
    }

    Ok(())
}

/// Marks the conversation (or, for replies, the thread) as read; failures are only logged.
async fn mark_read(message: &Message, conversation: &Conversation, runtime: &Runtime) {
    let result = match message.thread_root_id.as_deref().filter(|id| !id.is_empty()) {
        None => runtime.chat.view_log(&conversation.workspace, &conversation.id).await,
        Some(thread_root_id) => runtime.chat.view_log_thread(&message.workspace, thread_root_id).await,
    };

    if let Err(err) = result {
        warn!("Can't mark message `{}` as read: {:#}", message.id, err);
    }
}
