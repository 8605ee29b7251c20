#[cfg(test)]
#[path = "medisense_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AgentAnswer;
use crate::domain::models::Api;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Credentials;
use crate::domain::models::Registration;
use crate::domain::models::SessionToken;
use crate::domain::models::UserProfile;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LoginResponse {
    access_token: Option<String>,
    token_type: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatResponse {
    agent_name: Option<String>,
    response: Option<String>,
    confidence: Option<f64>,
    error: Option<String>,
    detail: Option<serde_json::Value>,
}

impl From<ChatResponse> for ChatReply {
    fn from(res: ChatResponse) -> ChatReply {
        if let Some(error) = res.error.filter(|error| return !error.is_empty()) {
            return ChatReply::Failed(error);
        }

        // FastAPI reports auth and validation errors as `detail`.
        if res.agent_name.is_none() && res.response.is_none() {
            if let Some(detail) = res.detail {
                return ChatReply::Failed(detail_text(detail));
            }
        }

        return ChatReply::Answered(AgentAnswer {
            agent_name: res.agent_name.unwrap_or_default(),
            response: res.response.unwrap_or_default(),
            confidence: res.confidence,
        });
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AgentListResponse {
    agents: Vec<String>,
    count: Option<usize>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorResponse {
    detail: Option<serde_json::Value>,
}

fn detail_text(detail: serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(text) => return text,
        other => return other.to_string(),
    }
}

pub struct MediSense {
    client: reqwest::Client,
    url: String,
    timeout: String,
}

impl Default for MediSense {
    fn default() -> MediSense {
        return MediSense::new(
            &Config::get(ConfigKey::ApiURL),
            &Config::get(ConfigKey::HealthCheckTimeout),
        );
    }
}

impl MediSense {
    pub fn new(url: &str, timeout: &str) -> MediSense {
        return MediSense {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            timeout: timeout.to_string(),
        };
    }

    async fn post_chat(
        &self,
        url: String,
        token: &SessionToken,
        request: &ChatRequest,
    ) -> Result<ChatReply> {
        tracing::debug!(url = url.as_str(), "Sending chat request");

        let res = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .json(request)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.json::<ChatResponse>().await?;
        tracing::debug!(status = status, body = ?body, "Chat response");

        return Ok(ChatReply::from(body));
    }
}

#[async_trait]
impl Api for MediSense {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("MediSense API URL is not defined");
        }

        let res = self
            .client
            .get(format!("{url}/health", url = self.url))
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let status = match res {
            Ok(res) => res.status().as_u16(),
            Err(err) => {
                tracing::error!(error = ?err, "MediSense API is not reachable");
                bail!("MediSense API is not reachable at {}", self.url);
            }
        };
        if status >= 400 {
            tracing::error!(status = status, "MediSense API health check failed");
            bail!("MediSense API health check failed with status {status}");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn login(&self, credentials: &Credentials) -> Result<Option<SessionToken>> {
        tracing::debug!(email = credentials.email.as_str(), "Sending login request");

        let res = self
            .client
            .post(format!("{url}/api/v1/auth/login", url = self.url))
            .query(&[
                ("email", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.json::<LoginResponse>().await?;
        let token = body
            .access_token
            .and_then(|access_token| return SessionToken::parse(&access_token));

        if token.is_none() {
            tracing::warn!(status = status, "Login response did not contain a token");
        }

        return Ok(token);
    }

    #[allow(clippy::implicit_return)]
    async fn chat(&self, token: &SessionToken, request: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{url}/api/v1/agents/chat", url = self.url);
        return self.post_chat(url, token, request).await;
    }

    #[allow(clippy::implicit_return)]
    async fn call_agent(
        &self,
        token: &SessionToken,
        agent: &str,
        request: &ChatRequest,
    ) -> Result<ChatReply> {
        let mut url = reqwest::Url::parse(&format!("{url}/api/v1/agents/agent/", url = self.url))?;
        url.path_segments_mut()
            .map_err(|_| return anyhow::anyhow!("MediSense API URL cannot be a base"))?
            .pop_if_empty()
            .push(agent);

        return self.post_chat(url.to_string(), token, request).await;
    }

    #[allow(clippy::implicit_return)]
    async fn list_agents(&self) -> Result<Vec<String>> {
        let res = self
            .client
            .get(format!("{url}/api/v1/agents/agents", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to list agents");
            bail!("Failed to list agents");
        }

        let mut agents = res.json::<AgentListResponse>().await?.agents;
        agents.sort();

        return Ok(agents);
    }

    #[allow(clippy::implicit_return)]
    async fn register(&self, registration: &Registration) -> Result<UserProfile> {
        let res = self
            .client
            .post(format!("{url}/api/v1/auth/register", url = self.url))
            .json(registration)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let detail = res
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| return body.detail)
                .map(detail_text)
                .unwrap_or_else(|| return format!("status {status}"));
            tracing::error!(status = status, detail = detail.as_str(), "Registration failed");
            bail!("Registration failed: {detail}");
        }

        tracing::info!(email = registration.email.as_str(), "Registered account");
        return Ok(res.json::<UserProfile>().await?);
    }

    #[allow(clippy::implicit_return)]
    async fn current_user(&self, token: &SessionToken) -> Result<UserProfile> {
        let res = self
            .client
            .get(format!("{url}/api/v1/auth/me", url = self.url))
            .header(reqwest::header::AUTHORIZATION, token.bearer())
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let detail = res
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| return body.detail)
                .map(detail_text)
                .unwrap_or_else(|| return format!("status {status}"));
            tracing::error!(status = status, detail = detail.as_str(), "Failed to fetch current user");
            bail!("Failed to fetch current user: {detail}");
        }

        return Ok(res.json::<UserProfile>().await?);
    }
}
