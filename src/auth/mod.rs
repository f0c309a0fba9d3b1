//! Authentication and session bootstrap

mod types;

use log::{info, warn};

use crate::error::Result;
use crate::fetch::Fetch;
use crate::session::Session;
use crate::users::{NewUser, User, UsersClient};

pub use types::*;

/// Client for `/auth`
#[derive(Clone)]
pub struct Auth {
    fetch: Fetch,
}

impl Auth {
    pub(crate) fn new(fetch: Fetch) -> Self {
        Self { fetch }
    }

    /// Sign in with email and password.
    ///
    /// Credentials are sent form-encoded. On success the token is persisted
    /// through the session context; on failure nothing is stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let form = LoginForm {
            username: email,
            password,
        };

        let response: LoginResponse = self
            .fetch
            .post("auth/login")
            .inline_credentials()
            .form(&form)
            .execute()
            .await?;

        self.fetch.session().begin(Session::new(
            response.access_token.clone(),
            response.token_type.clone(),
            Some(response.user.clone()),
        ))?;
        info!("Signed in as {}", response.user.username);

        Ok(response)
    }

    /// Create an account without signing in. See [`Auth::sign_up`].
    pub async fn register(&self, user: &NewUser) -> Result<User> {
        self.fetch
            .post("auth/register")
            .inline_credentials()
            .json(user)
            .execute()
            .await
    }

    /// Create an account and sign in with it
    pub async fn sign_up(&self, user: &NewUser) -> Result<LoginResponse> {
        let created = self.register(user).await?;
        info!("Registered {}", created.username);
        self.login(&user.email, &user.password).await
    }

    /// Pick up a session persisted by an earlier run and check it against
    /// the server.
    ///
    /// Returns `Ok(None)` when there is no usable session. A rejected token
    /// is reported as `Ok(None)` rather than `AuthExpired`: the adapter has
    /// already cleared it and emitted [`SessionEvent::Expired`]. Any other
    /// failure clears the stored token and is returned.
    ///
    /// [`SessionEvent::Expired`]: crate::session::SessionEvent::Expired
    pub async fn restore(&self) -> Result<Option<User>> {
        if self.fetch.session().init()?.is_none() {
            return Ok(None);
        }

        match UsersClient::new(self.fetch.clone()).me().await {
            Ok(user) => {
                info!("Restored session for {}", user.username);
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                warn!("Stored session was rejected: {}", err);
                Ok(None)
            }
            Err(err) => {
                warn!("Stored session could not be confirmed: {}", err);
                self.fetch.session().discard();
                Err(err)
            }
        }
    }

    /// Sign out locally. The backend keeps no server-side session.
    pub fn logout(&self) -> Result<()> {
        self.fetch.session().end()
    }

    /// Get the current session
    pub fn session(&self) -> Option<Session> {
        self.fetch.session().current()
    }
}
