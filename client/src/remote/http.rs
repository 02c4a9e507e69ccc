//! HTTP implementation of the user store.

use super::UserStore;
use crate::config::Config;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use roster_engine::{FetchError, MutationError, PageNumber, PageResponse, UserId, UserPatch};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// User store backed by a reqres-style REST API.
///
/// - `GET {base}/users?page=n`
/// - `PUT {base}/users/{id}`
/// - `DELETE {base}/users/{id}`
#[derive(Clone)]
pub struct HttpUserStore {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl fmt::Debug for HttpUserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpUserStore")
            .field("base_url", &self.base_url)
            .field("has_token", &self.credentials.bearer_token().is_some())
            .finish()
    }
}

impl HttpUserStore {
    /// Create a store for `base_url`.
    ///
    /// Every request is bounded by `timeout`; a request that exceeds it fails
    /// as a network failure.
    pub fn new(
        base_url: impl Into<String>,
        credentials: impl CredentialProvider + 'static,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::debug!(base_url = %base_url, ?timeout, "Created user store client");

        Ok(Self {
            client,
            base_url,
            credentials: Arc::new(credentials),
        })
    }

    /// Create a store from the client configuration.
    pub fn from_config(
        config: &Config,
        credentials: impl CredentialProvider + 'static,
    ) -> Result<Self> {
        Self::new(config.api_url.clone(), credentials, config.timeout)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    /// Attach the bearer credential, if the provider has one.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }
}

#[async_trait]
impl UserStore for HttpUserStore {
    async fn fetch_page(&self, page: PageNumber) -> std::result::Result<PageResponse, FetchError> {
        let url = format!("{}/users", self.base_url);
        tracing::debug!(page, url = %url, "Fetching users");

        let response = self
            .client
            .get(&url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<PageResponse>()
            .await
            .map_err(|e| FetchError::MalformedBody {
                message: e.to_string(),
            })
    }

    async fn update_user(
        &self,
        id: UserId,
        patch: &UserPatch,
    ) -> std::result::Result<(), MutationError> {
        tracing::debug!(user_id = id, "Updating user");

        let request = self.authorize(self.client.put(self.user_url(id)).json(patch));
        let response = request.send().await.map_err(MutationError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MutationError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> std::result::Result<(), MutationError> {
        tracing::debug!(user_id = id, "Deleting user");

        let request = self.authorize(self.client.delete(self.user_url(id)));
        let response = request.send().await.map_err(MutationError::network)?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NO_CONTENT {
            return Err(MutationError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
