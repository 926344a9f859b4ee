//! HTTP transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::api::transport::{ApiReply, ApiRequest, Method, Transport};
use crate::domain::error::{LibraryError, Result};

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

/// Sends [`ApiRequest`]s to a base URL over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Builds a transport for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] if the URL does not parse, cannot carry
    /// path segments, or the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| LibraryError::Config(format!("invalid api_base_url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LibraryError::Config(format!(
                "api_base_url {base_url} cannot be used as a base"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LibraryError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, timeout_secs = timeout.as_secs(), "http transport ready");
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for `request`, with path segments and query percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Config`] if the base URL cannot take segments.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| LibraryError::Config(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(request.path.iter());
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        let url = self.url_for(&request)?;

        let mut builder = self.client.request(request.method.into(), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LibraryError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LibraryError::Network(e.to_string()))?;

        Ok(ApiReply { status, body })
    }
}
