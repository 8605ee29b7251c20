/// Nothing listens on port 1, so connections are refused immediately.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn chat_response_fixture() -> &'static str {
    return r#"
{
    "agent_name": "Scheduler",
    "response": "Your appointment is booked",
    "confidence": 0.92,
    "provenance": [{"source": "appointment_agent"}],
    "metadata": {"routing_confidence": 0.88, "guardrails_applied": 0}
}
"#
    .trim();
}

pub fn login_response_fixture() -> &'static str {
    return r#"{"access_token": "token123", "token_type": "bearer"}"#;
}
