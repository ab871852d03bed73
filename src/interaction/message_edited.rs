//! This module handles edited messages, which is how reaction changes arrive.

use tracing::{debug, info, instrument};

use crate::{
    base::{
        diff::added_reactions,
        types::{Event, MessageEventData, Void},
    },
    interaction::notify,
    runtime::Runtime,
};

/// Handles the message edited event.
///
/// The previous reactions are read before the cache is overwritten. Messages the bot has
/// never seen have no baseline, so they are cached without notifying anyone.
#[instrument(skip_all)]
pub async fn handle_message_edited(event: &Event, runtime: &Runtime) -> Void {
    let message = MessageEventData::from_event(event)?.message;

    let previous = runtime.store.get(&message.id);
    runtime.store.put(&message.id, message.reactions.clone());

    let Some(previous) = previous else {
        debug!("Message `{}` has no cached reactions; skipping.", message.id);
        return Ok(());
    };

    let added = added_reactions(&previous, &message.reactions);
    if added.is_empty() {
        return Ok(());
    }

    info!("{} reaction(s) added to message `{}`.", added.len(), message.id);

    notify::notify_added_reactions(&message, &added, runtime).await;

    Ok(())
}
