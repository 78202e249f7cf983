use std::{fmt, sync::Arc, time::Duration};

use crate::api::token::{Token, TokenStore};
use crate::api::types::AuthResponse;
use crate::api::{ApiError, AuthError};
use crate::config::ClientConfig;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Error as SerdeError;
use spdlog::{Logger, prelude::*};
use thiserror::Error;
use url::Url;

const LOGIN_PATH: &str = "/resources/auth/login";

/// Client of the verification service. Every method is one HTTP round trip;
/// nothing is retried. Dropping a returned future cancels the request.
///
/// The bearer token is obtained by [`ApiClient::connect`] and never renewed
/// behind the caller's back: check [`ApiClient::token_expired`] and call
/// [`ApiClient::refresh_token`] when needed.
pub struct ApiClient {
    base_url: Url,
    username: String,
    password: String,
    token: TokenStore,
    token_lifetime: TimeDelta,
    timeout: Option<Duration>,
    client: reqwest::Client,
    logger: Arc<Logger>,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("bad base url: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("base url {0} cannot carry a path")]
    UnsupportedUrl(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("applicant {0} not found")]
    NotFound(String),

    #[error("unexpected response body: {0}")]
    Decode(#[from] SerdeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiClient {
    /// Builds a client without talking to the service. Most callers want
    /// [`ApiClient::connect`].
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;

        Ok(ApiClient {
            base_url,
            username: config.username,
            password: config.password,
            token: TokenStore::default(),
            token_lifetime: config.token_lifetime,
            timeout: config.timeout,
            client: reqwest::Client::new(),
            logger: config.logger,
        })
    }

    /// Builds a client and obtains its first token.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        let client = ApiClient::new(config)?;
        client.refresh_token().await?;

        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    // performs POST /resources/auth/login with basic credentials
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let url = self.url(&[LOGIN_PATH]);
        debug!(logger: self.logger, "POST {}", url);

        let request = self
            .client
            .post(url)
            .basic_auth(username, Some(password));
        let response = self.with_timeout(request).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AuthError::Status(status));
        }

        let body = response.text().await?;
        let auth: AuthResponse = serde_json::from_str(&body)?;

        if auth.status != "ok" {
            return Err(AuthError::Rejected(auth.status));
        }
        if auth.payload.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(auth.payload)
    }

    /// Logs in again with the configured credentials and replaces the token.
    pub async fn refresh_token(&self) -> Result<(), ClientError> {
        let value = self.authenticate(&self.username, &self.password).await?;
        let expires_at = Utc::now() + self.token_lifetime;

        self.token.set(Token { value, expires_at });
        info!(logger: self.logger, "Obtained token for {}, valid until {}", self.username, expires_at);

        Ok(())
    }

    pub fn token_expired(&self) -> bool {
        self.token.is_expired_at(Utc::now())
    }

    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.get().map(|token| token.expires_at)
    }

    /// Joins path segments onto the base address. Every segment is split on
    /// `/` and empty pieces are dropped, so stray slashes never matter.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        // Holds for every client: parse_base_url refuses urls that cannot be
        // a base, and the base is never changed after construction.
        debug_assert!(!url.cannot_be_a_base(), "{url} cannot carry a path");
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(
                segments
                    .iter()
                    .flat_map(|segment| segment.split('/'))
                    .filter(|piece| !piece.is_empty()),
            );
        }

        url
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(logger: self.logger, "GET {}", url);
        let request = self.client.get(url);

        let body = self.send(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn post<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<String, ClientError> {
        debug!(logger: self.logger, "POST {}", url);
        let request = self.client.post(url).json(body);

        self.send(request).await
    }

    pub(crate) async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<String, ClientError> {
        debug!(logger: self.logger, "POST {} (multipart)", url);
        let request = self.client.post(url).multipart(form);

        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let token = self.token.get().ok_or(AuthError::MissingToken)?;
        let request = self.with_timeout(request.bearer_auth(token.value));

        let res = request.send().await?;
        self.handle_response(res).await
    }

    fn with_timeout(&self, request: RequestBuilder) -> RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn handle_response(&self, response: Response) -> Result<String, ClientError> {
        let status = response.status();
        let message = response.text().await?;
        trace!(logger: self.logger, "{} <- {}", status, message);

        if status.is_client_error() || status.is_server_error() {
            return Err(ClientError::Api(ApiError::from_response(status, &message)));
        }

        Ok(message)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("token_expires_at", &self.token_expires_at())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Addresses without a scheme are taken as https.
fn parse_base_url(addr: &str) -> Result<Url, ClientError> {
    let url = if addr.contains("://") {
        Url::parse(addr)?
    } else {
        Url::parse(&format!("https://{addr}"))?
    };

    if url.cannot_be_a_base() {
        return Err(ClientError::UnsupportedUrl(addr.to_string()));
    }

    Ok(url)
}
