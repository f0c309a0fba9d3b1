//! HTTP client adapter for the LifeHub API
//!
//! Every outbound call goes through [`Fetch`]. It resolves paths against the
//! configured base URL, attaches the bearer token held by the
//! [`SessionContext`], and turns failures into [`Error`]s. A 401 on an
//! authenticated call clears the stored credentials and emits
//! [`SessionEvent::Expired`](crate::session::SessionEvent::Expired); nothing
//! is retried.

use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::session::SessionContext;

/// Shared HTTP adapter
#[derive(Clone)]
pub struct Fetch {
    client: Client,
    base_url: Url,
    timeout: Duration,
    session: SessionContext,
}

impl Fetch {
    /// Create a new adapter for `options.base_url`
    pub fn new(options: &ClientOptions, session: SessionContext) -> Result<Self> {
        let base_url = parse_base_url(&options.base_url)?;
        let client = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(|e| Error::general(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout: options.request_timeout,
            session,
        })
    }

    /// The session this adapter authenticates with
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The base URL every path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, Method::GET, path)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, Method::POST, path)
    }

    /// Create a PUT request
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, Method::PUT, path)
    }

    /// Create a PATCH request
    pub fn patch(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, Method::PATCH, path)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, Method::DELETE, path)
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout)
        } else if err.is_builder() {
            Error::invalid_input(err)
        } else if err.is_decode() {
            Error::Json(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// Make sure relative paths land under the base path rather than replacing
/// its last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Credentials {
    /// Send the session token; a 401 means the session is dead
    Session,
    /// The request carries its own credentials (login); no token is sent
    Inline,
}

/// Helper for building and executing one request
pub struct FetchBuilder<'a> {
    fetch: &'a Fetch,
    method: Method,
    path: String,
    request: Result<RequestBuilder>,
    credentials: Credentials,
}

impl<'a> FetchBuilder<'a> {
    fn new(fetch: &'a Fetch, method: Method, path: &str) -> Self {
        let request = fetch
            .url(path)
            .map(|url| fetch.client.request(method.clone(), url));

        Self {
            fetch,
            method,
            path: path.to_string(),
            request,
            credentials: Credentials::Session,
        }
    }

    /// Add query parameters. Fields that serialize to nothing are left out.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Self {
        self.request = self.request.map(|req| req.query(params));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.request = self.request.map(|req| req.json(body));
        self
    }

    /// Add a form-encoded body to the request
    pub fn form<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.request = self.request.map(|req| req.form(body));
        self
    }

    /// Mark the request as carrying its own credentials. No bearer token is
    /// attached and a 401 is an ordinary request error.
    pub fn inline_credentials(mut self) -> Self {
        self.credentials = Credentials::Inline;
        self
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let fetch = self.fetch;
        let response = self.send().await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| fetch.transport_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute the request and discard the response body
    pub async fn execute_empty(self) -> Result<()> {
        self.send().await?;
        Ok(())
    }

    async fn send(self) -> Result<Response> {
        let FetchBuilder {
            fetch,
            method,
            path,
            request,
            credentials,
        } = self;

        let mut request = request?;
        if credentials == Credentials::Session {
            if let Some(token) = fetch.session.access_token() {
                request = request.bearer_auth(token);
            }
        }

        debug!("{} {}", method, path);
        let response = request
            .send()
            .await
            .map_err(|e| fetch.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = error_detail(response).await;
        if status == StatusCode::UNAUTHORIZED {
            return Err(match credentials {
                Credentials::Session => {
                    warn!("{} {} was unauthorized: {}", method, path, detail);
                    fetch.session.expire();
                    Error::AuthExpired(detail)
                }
                Credentials::Inline => {
                    fetch.session.discard();
                    Error::request(status.as_u16(), detail)
                }
            });
        }

        debug!("{} {} failed with {}: {}", method, path, status, detail);
        Err(Error::request(status.as_u16(), detail))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Pull the server's `detail` out of an error response.
///
/// FastAPI sends either `{"detail": "message"}` or, for validation
/// failures, `{"detail": [{"msg": "..."}, ...]}`.
async fn error_detail(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody {
            detail: Value::String(message),
        }) => message,
        Ok(ErrorBody {
            detail: Value::Array(items),
        }) => items
            .iter()
            .map(|item| match item.get("msg").and_then(Value::as_str) {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !text.trim().is_empty() => text,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}
