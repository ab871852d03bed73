//! Runtime services and shared state for the reaction-bot.

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction,
    service::{chat::ChatClient, store::ReactionStore},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the reaction store, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The reaction store instance.
    pub store: ReactionStore,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// Fails if the reaction store can't be loaded or the bot can't log in.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the reaction store.
        let store = ReactionStore::json_file(&config.store_file_path).await?;

        // Initialize the chat client.
        let chat = ChatClient::limoo(&config).await?;

        Ok(Self { config, store, chat })
    }

    /// Listen for events and handle them in arrival order until Ctrl-C or the listener ends.
    pub async fn start(&self) -> Void {
        let (sender, mut events) = mpsc::unbounded_channel();

        let chat = self.chat.clone();
        let listener = tokio::spawn(async move { chat.listen(sender).await });

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => interaction::handle_event(event, self).await,
                    None => break,
                },
                _ = &mut shutdown => {
                    info!("Shutting down ...");
                    break;
                }
            }
        }

        // Stop listening, and persist whatever is still queued.

        drop(events);
        listener.abort();

        if let Ok(Err(err)) = listener.await {
            error!("Event listener failed: {:#}", err);
        }

        self.store.flush().await?;

        info!("Reaction store flushed ({} messages).", self.store.len());

        Ok(())
    }
}
