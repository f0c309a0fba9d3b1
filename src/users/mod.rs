//! The signed-in user's account

mod types;

use crate::error::Result;
use crate::fetch::Fetch;

pub use types::*;

/// Client for `/users/me`
#[derive(Clone)]
pub struct UsersClient {
    fetch: Fetch,
}

impl UsersClient {
    pub(crate) fn new(fetch: Fetch) -> Self {
        Self { fetch }
    }

    /// Get the user data for the currently authenticated user
    pub async fn me(&self) -> Result<User> {
        self.fetch.get("users/me").execute().await
    }

    /// Update the current user. Only the fields set on `update` are sent.
    ///
    /// The stored session picks up the new profile so a restart shows it.
    pub async fn update_me(&self, update: &UserUpdate) -> Result<User> {
        let user: User = self.fetch.put("users/me").json(update).execute().await?;
        self.fetch.session().refresh_user(LoginUser::from(&user))?;
        Ok(user)
    }

    /// Delete the current user's account
    pub async fn delete_me(&self) -> Result<()> {
        self.fetch.delete("users/me").execute_empty().await
    }
}
