use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// The workspace that owns a message or conversation.
///
/// The `id` addresses the workspace in API paths, while the `key` is the
/// human-readable slug used in permalinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    #[serde(default)]
    pub key: String,
}

/// A single (emoji, reacting user) pair attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji_name: String,
    pub user_id: String,
}

impl Reaction {
    pub fn new(emoji_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            emoji_name: emoji_name.into(),
            user_id: user_id.into(),
        }
    }
}

/// A message snapshot, as carried by a single event.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    #[serde(default)]
    pub thread_root_id: Option<String>,
    pub user_id: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub text: String,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    /// Not part of the message record itself; filled in from the event envelope.
    #[serde(skip)]
    pub workspace: Workspace,
}

impl Message {
    /// Whether this message is a reply inside somebody else's thread.
    pub fn is_thread_reply(&self) -> bool {
        self.thread_root_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationType {
    Direct,
    Public,
    Private,
    #[serde(other)]
    Other,
}

/// A conversation (channel) within a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub conversation_type: ConversationType,
    #[serde(skip)]
    pub workspace: Workspace,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A user profile, as returned by the user lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The raw inbound event envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub workspace: Workspace,
    #[serde(default)]
    pub data: Value,
}

/// The `data` object of `message_created` and `message_edited` events.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEventData {
    pub message: Message,
    #[serde(default)]
    pub conversation_type: Option<ConversationType>,
    #[serde(default)]
    pub conversation_display_name: Option<String>,
}

impl MessageEventData {
    /// Deserializes the event data and attaches the event's workspace to the message.
    pub fn from_event(event: &Event) -> Res<Self> {
        let mut data: Self = serde_json::from_value(event.data.clone())?;
        data.message.workspace = event.workspace.clone();

        Ok(data)
    }

    /// The conversation the message was posted in.
    pub fn conversation(&self) -> Conversation {
        Conversation {
            id: self.message.conversation_id.clone(),
            conversation_type: self.conversation_type.unwrap_or(ConversationType::Other),
            workspace: self.message.workspace.clone(),
            display_name: self.conversation_display_name.clone(),
        }
    }
}

// Tests.
