//! Types for authentication

use serde::{Deserialize, Serialize};

use crate::users::LoginUser;

/// Login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The access token
    pub access_token: String,

    /// The token type
    pub token_type: String,

    /// The user data
    pub user: LoginUser,
}

/// Form body of `POST /auth/login`. The backend expects the email in the
/// `username` field.
#[derive(Debug, Serialize)]
pub(crate) struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}
