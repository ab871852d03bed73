//! Limoo implementation of the chat client.
//!
//! Outbound calls go through the REST API with a cookie session; inbound events
//! arrive over a websocket that carries the same session cookies.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{
    StatusCode, Url,
    cookie::{CookieStore, Jar},
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, http::header::COOKIE, protocol::Message as WsMessage},
};
use tracing::{debug, error, info, instrument, warn};

use crate::base::{
    config::Config,
    types::{Conversation, ConversationType, Event, Res, User, Void, Workspace},
};

use super::{ChatClient, GenericChatClient};

// Constants.

const LOGIN_PATH: &str = "/Limonad/j_spring_security_check";
const ME_PATH: &str = "/Limonad/api/v1/user/my";
const WEBSOCKET_PATH: &str = "/Limonad/websocket";
const WORKSPACE_API_PATH: &str = "/Limonad/api/v1/workspace/items";

// Extra methods on `ChatClient` applied by the limoo implementation.

impl ChatClient {
    /// Creates a new Limoo chat client, logging in as the bot.
    pub async fn limoo(config: &Config) -> Res<Self> {
        let client = LimooChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// How a single websocket session ended.
enum StreamEnd {
    /// Nobody is listening for events anymore.
    ReceiverDropped,
    /// The server closed the connection.
    Disconnected,
}

/// Body of the create-direct response.
#[derive(Debug, Deserialize)]
struct DirectConversation {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Limoo client implementation.
pub struct LimooChatClient {
    base_url: String,
    username: String,
    password: String,
    bot_user_id: String,
    http: reqwest::Client,
    cookies: Arc<Jar>,
    reconnect_delay: std::time::Duration,
}

impl LimooChatClient {
    /// Create a new Limoo chat client.
    #[instrument(name = "LimooChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder().cookie_provider(cookies.clone()).timeout(config.request_timeout()).build()?;

        let mut client = Self {
            base_url: config.limoo_url.trim_end_matches('/').to_string(),
            username: config.bot_username.clone(),
            password: config.bot_password.clone(),
            bot_user_id: String::new(),
            http,
            cookies,
            reconnect_delay: config.reconnect_delay(),
        };

        // Get the bot's user ID.

        client.login().await?;

        let response = client.execute(client.http.get(client.url(ME_PATH))).await?.error_for_status()?;
        let bot_user: User = response.json().await?;
        client.bot_user_id = bot_user.id;

        info!("Limoo bot user ID: {}", client.bot_user_id);

        Ok(client)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn workspace_url(&self, workspace: &Workspace, path: &str) -> String {
        format!("{}{}/{}/{}", self.base_url, WORKSPACE_API_PATH, workspace.id, path)
    }

    fn websocket_url(&self) -> String {
        let url = self.url(WEBSOCKET_PATH);

        if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            url
        }
    }

    /// Log in and store the session cookies.
    #[instrument(skip(self))]
    async fn login(&self) -> Void {
        self.http
            .post(self.url(LOGIN_PATH))
            .form(&[("j_username", self.username.as_str()), ("j_password", self.password.as_str())])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Failed to log in as `{}`: {}", self.username, e))?;

        Ok(())
    }

    /// Send a request, logging in again once if the session has expired.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Res<reqwest::Response> {
        let retry = request.try_clone();
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && let Some(retry) = retry
        {
            warn!("Session expired, logging in again ...");
            self.login().await?;
            return Ok(retry.send().await?);
        }

        Ok(response)
    }

    /// POST to a workspace endpoint and fail on non-success statuses.
    async fn post(&self, url: String, body: serde_json::Value) -> Res<reqwest::Response> {
        Ok(self.execute(self.http.post(url).json(&body)).await?.error_for_status()?)
    }

    /// Open one websocket session and forward its events until it ends.
    #[instrument(skip_all)]
    async fn stream_events(&self, events: &mpsc::UnboundedSender<Event>) -> Res<StreamEnd> {
        let mut request = self.websocket_url().into_client_request()?;

        let base_url = Url::parse(&self.base_url)?;
        if let Some(cookie) = self.cookies.cookies(&base_url) {
            request.headers_mut().insert(COOKIE, cookie);
        }

        let (mut stream, _) = connect_async(request).await.context("Failed to open event stream")?;

        info!("Event stream connected.");

        while let Some(frame) = stream.next().await {
            let text = match frame? {
                WsMessage::Text(text) => text,
                WsMessage::Close(_) => break,
                _ => continue,
            };

            let event = match serde_json::from_str::<Event>(&text) {
                Ok(event) => event,
                Err(e) => {
                    warn!("Skipping unparseable event: {}", e);
                    continue;
                }
            };

            debug!("Received `{}` event.", event.kind);

            if events.send(event).is_err() {
                return Ok(StreamEnd::ReceiverDropped);
            }
        }

        Ok(StreamEnd::Disconnected)
    }
}

#[async_trait]
impl GenericChatClient for LimooChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn listen(&self, events: mpsc::UnboundedSender<Event>) -> Void {
        loop {
            match self.stream_events(&events).await {
                Ok(StreamEnd::ReceiverDropped) => return Ok(()),
                Ok(StreamEnd::Disconnected) => warn!("Event stream closed."),
                Err(e) => error!("Event stream failed: {:#}", e),
            }

            if events.is_closed() {
                return Ok(());
            }

            info!("Reconnecting in {:?} ...", self.reconnect_delay);
            tokio::time::sleep(self.reconnect_delay).await;

            if let Err(e) = self.login().await {
                error!("Failed to log in again: {:#}", e);
            }
        }
    }

    #[instrument(skip(self, workspace))]
    async fn create_direct(&self, workspace: &Workspace, user_id: &str) -> Res<Conversation> {
        let body = json!({
            "type": "direct",
            "user_ids": [self.bot_user_id, user_id],
        });

        let response = self
            .post(self.workspace_url(workspace, "conversation/items"), body)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create direct conversation: {}", e))?;
        let direct: DirectConversation = response.json().await?;

        Ok(Conversation {
            id: direct.id,
            conversation_type: ConversationType::Direct,
            workspace: workspace.clone(),
            display_name: direct.display_name,
        })
    }

    #[instrument(skip(self, workspace, text))]
    async fn send_message(&self, workspace: &Workspace, conversation_id: &str, text: &str) -> Void {
        let url = self.workspace_url(workspace, &format!("conversation/items/{conversation_id}/message/items"));

        self.post(url, json!({ "text": text })).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, workspace))]
    async fn get_user(&self, workspace: &Workspace, user_id: &str) -> Res<Option<User>> {
        let url = self.workspace_url(workspace, &format!("user/items/{user_id}"));
        let response = self.execute(self.http.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(response.error_for_status()?.json().await?))
    }

    #[instrument(skip(self, workspace))]
    async fn view_log(&self, workspace: &Workspace, conversation_id: &str) -> Void {
        let url = self.workspace_url(workspace, &format!("conversation/items/{conversation_id}/view_log"));

        self.post(url, json!({})).await?;

        Ok(())
    }

    #[instrument(skip(self, workspace))]
    async fn view_log_thread(&self, workspace: &Workspace, thread_root_id: &str) -> Void {
        let url = self.workspace_url(workspace, &format!("thread/items/{thread_root_id}/view_log"));

        self.post(url, json!({})).await?;

        Ok(())
    }

    #[instrument(skip(self, workspace))]
    async fn follow_thread(&self, workspace: &Workspace, thread_root_id: &str) -> Void {
        let url = self.workspace_url(workspace, &format!("thread/items/{thread_root_id}/follow"));

        self.post(url, json!({})).await?;

        Ok(())
    }
}

// Tests.
