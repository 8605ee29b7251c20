use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::ChatReply;
use super::ChatRequest;
use super::Credentials;
use super::Registration;
use super::SessionToken;
use super::UserProfile;

#[async_trait]
pub trait Api {
    /// Used at startup to warn early when the backend cannot be reached.
    async fn health_check(&self) -> Result<()>;

    /// Exchanges credentials for a bearer token. `Ok(None)` means the backend
    /// answered without a token, which is not treated as an error.
    async fn login(&self, credentials: &Credentials) -> Result<Option<SessionToken>>;

    /// Sends a query to the routing chat endpoint. Any decodable payload
    /// becomes a reply, including backend-reported errors. `Err` is reserved
    /// for transport and decoding failures.
    async fn chat(&self, token: &SessionToken, request: &ChatRequest) -> Result<ChatReply>;

    /// Same contract as `chat`, bypassing routing to address a named agent.
    async fn call_agent(
        &self,
        token: &SessionToken,
        agent: &str,
        request: &ChatRequest,
    ) -> Result<ChatReply>;

    /// Creates an account. Backend rejections, such as an email that is
    /// already registered, come back as `Err` carrying the backend's detail.
    async fn register(&self, registration: &Registration) -> Result<UserProfile>;

    /// Names of every agent registered on the backend.
    async fn list_agents(&self) -> Result<Vec<String>>;

    /// Profile of the user the token belongs to.
    async fn current_user(&self, token: &SessionToken) -> Result<UserProfile>;
}

pub type ApiBox = Arc<dyn Api + Send + Sync>;
