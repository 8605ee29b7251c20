use super::ChatRequest;
use super::Credentials;
use super::SessionToken;

/// Requests sent from the UI loop to the actions worker.
pub enum Action {
    Abort(),
    CallAgent(SessionToken, String, ChatRequest),
    Chat(SessionToken, ChatRequest),
    ListAgents(),
    Login(Credentials),
    WhoAmI(SessionToken),
}
