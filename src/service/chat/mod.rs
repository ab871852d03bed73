//! Chat service integration for reaction-bot.
//!
//! This module provides functionality for interacting with the workspace service:
//! - Receiving message events
//! - Opening direct conversations and sending messages
//! - Looking up users
//! - Following threads and marking conversations as read
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Limoo.

pub mod limoo;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::base::types::{Conversation, Event, Res, User, Void, Workspace};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the calls the bot makes against a chat platform. Implementing
/// this trait allows different chat services to be used with the reaction-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Used to skip following threads the bot started itself.
    fn bot_user_id(&self) -> &str;

    /// Listen for events and forward them, in arrival order, to `events`.
    ///
    /// Returns once the receiving side has been dropped, or with an error if the
    /// listener can't be kept alive.
    async fn listen(&self, events: mpsc::UnboundedSender<Event>) -> Void;

    /// Create, or fetch the existing, direct conversation between the bot and a user.
    async fn create_direct(&self, workspace: &Workspace, user_id: &str) -> Res<Conversation>;

    /// Send a new text message into a conversation.
    async fn send_message(&self, workspace: &Workspace, conversation_id: &str, text: &str) -> Void;

    /// Fetch a user profile; `None` if no such user exists.
    async fn get_user(&self, workspace: &Workspace, user_id: &str) -> Res<Option<User>>;

    /// Mark a conversation as read.
    async fn view_log(&self, workspace: &Workspace, conversation_id: &str) -> Void;

    /// Mark a thread as read.
    async fn view_log_thread(&self, workspace: &Workspace, thread_root_id: &str) -> Void;

    /// Follow a thread, so the bot receives its replies.
    async fn follow_thread(&self, workspace: &Workspace, thread_root_id: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
