#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::fmt;

/// Opaque bearer credential returned by the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns `None` for empty or whitespace-only values, as those can never
    /// authenticate a request.
    pub fn parse(value: &str) -> Option<SessionToken> {
        if value.trim().is_empty() {
            return None;
        }

        return Some(SessionToken(value.to_string()));
    }

    pub fn bearer(&self) -> String {
        return format!("Bearer {}", self.0);
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "SessionToken(***)");
    }
}

/// In-memory authentication state. Nothing here is ever written to disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(SessionToken),
}

impl Session {
    pub fn login(&mut self, token: SessionToken) {
        *self = Session::LoggedIn(token);
    }

    pub fn logout(&mut self) {
        *self = Session::LoggedOut;
    }

    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Session::LoggedIn(token) => return Some(token),
            Session::LoggedOut => return None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        return self.token().is_some();
    }
}
