use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use super::SessionToken;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Credentials {
        return Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
    }

    pub fn is_complete(&self) -> bool {
        return !self.email.is_empty() && !self.password.is_empty();
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish();
    }
}

/// Body of `POST /api/v1/auth/register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub phone_number: Option<String>,
    pub password: String,
}

impl Registration {
    pub fn new(email: &str, full_name: &str, password: &str) -> Registration {
        return Registration {
            email: email.trim().to_string(),
            full_name: full_name.trim().to_string(),
            role: "patient".to_string(),
            phone_number: None,
            password: password.to_string(),
        };
    }

    pub fn with_role(mut self, role: &str) -> Registration {
        self.role = role.to_string();
        return self;
    }

    /// Blank numbers are left out of the request.
    pub fn with_phone_number(mut self, phone_number: &str) -> Registration {
        let phone_number = phone_number.trim();
        if !phone_number.is_empty() {
            self.phone_number = Some(phone_number.to_string());
        }
        return self;
    }

    pub fn is_complete(&self) -> bool {
        return !self.email.is_empty() && !self.full_name.is_empty() && !self.password.is_empty();
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("Registration")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("phone_number", &self.phone_number)
            .field("password", &"***")
            .finish();
    }
}

#[derive(Debug, PartialEq)]
pub enum LoginOutcome {
    /// The backend returned a usable `access_token`.
    Authenticated(SessionToken),
    /// The call completed but no token came back, e.g. wrong credentials.
    NoToken,
    /// Transport or decoding failure.
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: String,
}

impl UserProfile {
    pub fn describe(&self) -> String {
        let mut name = self.full_name.trim().to_string();
        if name.is_empty() {
            name = self.email.to_string();
        } else {
            name = format!("{name} <{}>", self.email);
        }

        if self.role.is_empty() {
            return format!("Signed in as {name}");
        }

        return format!("Signed in as {name} ({})", self.role);
    }
}
