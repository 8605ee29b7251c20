#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;

/// Shown in place of a reply when the chat request never produced a
/// decodable response.
pub const CHAT_FAILURE_MESSAGE: &str = "Failed to get response";

/// Body sent to the chat and direct agent endpoints. `context` is always an
/// empty object and `session_id` is always `null`, letting the backend
/// allocate a session per request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub context: serde_json::Map<String, serde_json::Value>,
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(query: &str) -> ChatRequest {
        return ChatRequest {
            query: query.to_string(),
            context: serde_json::Map::new(),
            session_id: None,
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentAnswer {
    pub agent_name: String,
    pub response: String,
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChatReply {
    Answered(AgentAnswer),
    Failed(String),
}

impl ChatReply {
    pub fn failed() -> ChatReply {
        return ChatReply::Failed(CHAT_FAILURE_MESSAGE.to_string());
    }

    pub fn is_failure(&self) -> bool {
        return matches!(self, ChatReply::Failed(_));
    }

    /// Lines displayed in the response panel. Missing answer fields render
    /// blank after their label.
    pub fn as_lines(&self) -> Vec<String> {
        match self {
            ChatReply::Answered(answer) => {
                let confidence = answer
                    .confidence
                    .map(|confidence| return confidence.to_string())
                    .unwrap_or_default();

                let mut response_lines = answer.response.lines();
                let mut lines = vec![
                    format!("Agent: {}", answer.agent_name),
                    format!("Response: {}", response_lines.next().unwrap_or_default()),
                ];
                lines.extend(response_lines.map(|line| return line.to_string()));
                lines.push(format!("Confidence: {confidence}"));

                return lines;
            }
            ChatReply::Failed(message) => {
                return vec![format!("Error: {message}")];
            }
        }
    }
}
