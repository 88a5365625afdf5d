//! Request DTOs for the user statistics API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::NewUser;

/// Request body for user creation (POST /users)
///
/// # Fields
/// - `username`: Unique login name
/// - `email`: Unique contact address
/// - `full_name`: Optional display name
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl CreateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.username.trim().is_empty() {
            return Some("Username cannot be empty".to_string());
        }
        if self.email.trim().is_empty() {
            return Some("Email cannot be empty".to_string());
        }
        None
    }

    /// Converts the request into the record handed to the store.
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            username: self.username,
            email: self.email,
            full_name: self.full_name,
        }
    }
}
