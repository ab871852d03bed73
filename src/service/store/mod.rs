//! Reaction cache for the reaction-bot.
//!
//! The store maps message IDs to the last reaction list the bot has seen for that message.
//! Reads and writes hit memory; persistence happens in the background.

pub mod json_file;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Reaction, Void};

// Traits.

/// Generic reaction store trait that stores must implement.
#[async_trait]
pub trait GenericReactionStore: Send + Sync + 'static {
    /// Gets the last cached reaction list for a message, or `None` if the message was never seen.
    fn get(&self, message_id: &str) -> Option<Vec<Reaction>>;

    /// Overwrites the reaction list for a message.
    ///
    /// This returns immediately; the store persists the change in the background and
    /// only logs persistence failures.
    fn put(&self, message_id: &str, reactions: Vec<Reaction>);

    /// Number of messages currently tracked.
    fn len(&self) -> usize;

    /// Whether no messages are tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persists the current contents, after any writes already scheduled by `put`.
    async fn flush(&self) -> Void;
}

// Structs.

/// Reaction store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ReactionStore {
    inner: Arc<dyn GenericReactionStore>,
}

impl Deref for ReactionStore {
    type Target = dyn GenericReactionStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ReactionStore {
    pub fn new(inner: Arc<dyn GenericReactionStore>) -> Self {
        Self { inner }
    }
}
