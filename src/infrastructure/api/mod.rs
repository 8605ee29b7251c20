mod medisense;

use std::sync::Arc;

pub use medisense::*;

use crate::domain::models::ApiBox;

pub struct ApiManager {}

impl ApiManager {
    /// Builds the HTTP client from the loaded configuration.
    pub fn get() -> ApiBox {
        return Arc::new(MediSense::default());
    }
}
