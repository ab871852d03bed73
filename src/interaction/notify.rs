//! Direct-message notifications for added reactions.

use tracing::{debug, error, instrument, warn};

use crate::{
    base::{
        notification::{UNKNOWN_USER_DISPLAY_NAME, display_name_or_placeholder, notification_body},
        types::{Message, Reaction, Void, Workspace},
    },
    runtime::Runtime,
};

/// Notifies the author of `message` about each added reaction, one after another.
///
/// Self-reactions are skipped. A failure on one reaction is logged and doesn't stop the
/// rest. Returns the number of notifications sent.
#[instrument(skip_all, fields(message_id = %message.id))]
pub async fn notify_added_reactions(message: &Message, added: &[Reaction], runtime: &Runtime) -> usize {
    let mut sent = 0;

    for reaction in added {
        if reaction.user_id == message.user_id {
            debug!("Skipping self-reaction :{}:.", reaction.emoji_name);
            continue;
        }

        match notify_reaction(message, reaction, runtime).await {
            Ok(()) => sent += 1,
            Err(err) => error!("Failed to notify `{}` about :{}: from `{}`: {:#}", message.user_id, reaction.emoji_name, reaction.user_id, err),
        }
    }

    sent
}

/// Sends one notification to the message author.
async fn notify_reaction(message: &Message, reaction: &Reaction, runtime: &Runtime) -> Void {
    let direct = runtime.chat.create_direct(&message.workspace, &message.user_id).await?;
    let display_name = resolve_display_name(&message.workspace, &reaction.user_id, runtime).await;

    let body = notification_body(&display_name, reaction, message, &runtime.config.limoo_url);

    runtime.chat.send_message(&direct.workspace, &direct.id, &body).await
}

/// Looks up the reacting user's name, falling back to a placeholder.
async fn resolve_display_name(workspace: &Workspace, user_id: &str, runtime: &Runtime) -> String {
    match runtime.chat.get_user(workspace, user_id).await {
        Ok(user) => display_name_or_placeholder(user.as_ref().and_then(|u| u.display_name.as_deref())).to_string(),
        Err(err) => {
            warn!("Can't look up user `{}`: {:#}", user_id, err);
            UNKNOWN_USER_DISPLAY_NAME.to_string()
        }
    }
}
