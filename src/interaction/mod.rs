//! Event handling and user interactions for reaction-bot.
//!
//! This module routes incoming events to their handlers:
//! - `message_created`: caches the baseline reactions, follows the thread and marks it read
//! - `message_edited`: diffs the reactions against the cache and notifies the author
//!
//! Events are handled one at a time, in arrival order.

pub mod message_created;
pub mod message_edited;
pub mod notify;

use tracing::{debug, error, instrument};

use crate::{base::types::Event, runtime::Runtime};

/// Event type tag for newly posted messages.
pub const MESSAGE_CREATED: &str = "message_created";

/// Event type tag for edited messages, including reaction changes.
pub const MESSAGE_EDITED: &str = "message_edited";

/// Handles a single event.
///
/// Errors are logged here and never propagated, so one bad event can't stop the
/// processing of the next.
#[instrument(skip_all, fields(kind = %event.kind))]
pub async fn handle_event(event: Event, runtime: &Runtime) {
    let result = match event.kind.as_str() {
        MESSAGE_CREATED if carries_message(&event) => message_created::handle_message_created(&event, runtime).await,
        MESSAGE_EDITED if carries_message(&event) => message_edited::handle_message_edited(&event, runtime).await,
        _ => {
            debug!("Ignoring `{}` event.", event.kind);
            Ok(())
        }
    };

    // Log any errors.
    if let Err(err) = &result {
        error!("Error while handling `{}` event: {:#}", event.kind, err);
    }
}

fn carries_message(event: &Event) -> bool {
    event.data.get("message").is_some()
}
