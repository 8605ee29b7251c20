#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::future;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::task::JoinHandle;

use crate::domain::models::Action;
use crate::domain::models::ApiBox;
use crate::domain::models::ChatReply;
use crate::domain::models::ChatRequest;
use crate::domain::models::Credentials;
use crate::domain::models::Event;
use crate::domain::models::LoginOutcome;
use crate::domain::models::Notice;
use crate::domain::models::SessionToken;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /agents (/al) - Lists every agent registered on the backend.
- /agent (/ag) [AGENT_NAME] [QUERY] - Sends a query straight to one agent, skipping routing.
- /whoami (/w) - Shows the account the current session belongs to.
- /clear (/cl) - Clears the response panel.
- /logout (/lo) - Forgets the session token and returns to the login form.
- /quit /exit (/q) - Exit MediSense.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Tab - Switch between the email and password fields
- Enter - Log in, or send the current query
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- ESC - Cancel the request in progress
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

pub async fn login(api: &ApiBox, credentials: Credentials) -> Event {
    match api.login(&credentials).await {
        Ok(Some(token)) => {
            tracing::info!(email = credentials.email.as_str(), "Logged in");
            return Event::LoginResponse(LoginOutcome::Authenticated(token));
        }
        Ok(None) => {
            return Event::LoginResponse(LoginOutcome::NoToken);
        }
        Err(err) => {
            tracing::error!(error = ?err, "Login failed");
            return Event::LoginResponse(LoginOutcome::Failed);
        }
    }
}

pub async fn chat(api: &ApiBox, token: SessionToken, request: ChatRequest) -> Event {
    match api.chat(&token, &request).await {
        Ok(reply) => return Event::ChatResponse(reply),
        Err(err) => {
            tracing::error!(error = ?err, "Chat failed");
            return Event::ChatResponse(ChatReply::failed());
        }
    }
}

async fn call_agent(
    api: &ApiBox,
    token: SessionToken,
    agent: String,
    request: ChatRequest,
) -> Event {
    match api.call_agent(&token, &agent, &request).await {
        Ok(reply) => return Event::ChatResponse(reply),
        Err(err) => {
            tracing::error!(error = ?err, agent = agent.as_str(), "Agent call failed");
            return Event::ChatResponse(ChatReply::failed());
        }
    }
}

async fn list_agents(api: &ApiBox) -> Event {
    match api.list_agents().await {
        Ok(agents) if agents.is_empty() => {
            return Event::RequestNotice(Notice::info("The backend has no agents registered."));
        }
        Ok(agents) => {
            return Event::RequestNotice(Notice::info(&format!(
                "Available agents: {}",
                agents.join(", ")
            )));
        }
        Err(err) => {
            tracing::error!(error = ?err, "Listing agents failed");
            return Event::RequestNotice(Notice::error("Failed to list agents"));
        }
    }
}

async fn whoami(api: &ApiBox, token: SessionToken) -> Event {
    match api.current_user(&token).await {
        Ok(profile) => return Event::RequestNotice(Notice::info(&profile.describe())),
        Err(err) => {
            tracing::error!(error = ?err, "Fetching current user failed");
            return Event::RequestNotice(Notice::error(&err.to_string()));
        }
    }
}

async fn run(api: ApiBox, action: Action) -> Option<Event> {
    let event = match action {
        Action::Login(credentials) => login(&api, credentials).await,
        Action::Chat(token, request) => chat(&api, token, request).await,
        Action::CallAgent(token, agent, request) => call_agent(&api, token, agent, request).await,
        Action::ListAgents() => list_agents(&api).await,
        Action::WhoAmI(token) => whoami(&api, token).await,
        Action::Abort() => return None,
    };

    return Some(event);
}

/// Resolves once the in-flight request finishes, or never when idle.
async fn completion(
    worker: &mut Option<JoinHandle<Option<Event>>>,
) -> Result<Option<Event>, JoinError> {
    match worker.as_mut() {
        Some(handle) => return handle.await,
        None => return future::pending().await,
    }
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs requests from the UI one at a time. Every request produces exactly
    /// one completion event unless it is rejected or aborted, each of which
    /// produces its own event instead. The worker slot is cleared before a
    /// completion is forwarded, so the UI never sees a result while the
    /// request still counts as in flight.
    pub async fn start(
        api: ApiBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let mut worker: Option<JoinHandle<Option<Event>>> = None;

        loop {
            tokio::select! {
                biased;

                joined = completion(&mut worker), if worker.is_some() => {
                    worker = None;
                    match joined {
                        Ok(Some(event)) => {
                            if tx.send(event).is_err() {
                                tracing::debug!("UI closed before the request completed");
                            }
                        }
                        Ok(None) => (),
                        Err(err) if err.is_cancelled() => (),
                        Err(err) => {
                            tracing::error!(error = ?err, "Request worker failed");
                        }
                    }
                }
                action = rx.recv() => {
                    let Some(action) = action else {
                        break;
                    };

                    if let Action::Abort() = action {
                        if let Some(handle) = worker.take() {
                            handle.abort();
                            tracing::info!("Aborted in-flight request");
                            tx.send(Event::RequestAborted())?;
                        }
                        continue;
                    }

                    if worker.is_some() {
                        tracing::warn!("Rejected request while another is in flight");
                        tx.send(Event::RequestRejected())?;
                        continue;
                    }

                    worker = Some(tokio::spawn(run(api.clone(), action)));
                }
            }
        }

        return Ok(());
    }
}
