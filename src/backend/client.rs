//! Tenant-scoped client for the remote backend API.
//!
//! The client is an ordinary value: construct it once and pass it to whatever
//! needs the backend. The tenant header is added while building each request,
//! never by a hidden interceptor.

use std::time::Duration;

use reqwest::header::HeaderName;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::EdgeConfig;
use crate::routing::TenantId;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid tenant header name '{0}'")]
    InvalidHeader(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    tenant_header: HeaderName,
}

impl BackendClient {
    /// Build from the backend section, tagging with the same header the edge injects.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()?;
        Self::with_client(client, &config.backend.base_url, &config.tenancy.tenant_header)
    }

    /// Use an existing `reqwest::Client` (shared connection pool).
    pub fn with_client(client: Client, base_url: &str, tenant_header: &str) -> Result<Self, BackendError> {
        let tenant_header = HeaderName::from_bytes(tenant_header.as_bytes())
            .map_err(|_| BackendError::InvalidHeader(tenant_header.to_string()))?;
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url, tenant_header })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tenant_header(&self) -> &HeaderName {
        &self.tenant_header
    }

    /// Resolve an API path against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a request, tagging it with `tenant` when given.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        tenant: Option<&TenantId>,
    ) -> Result<RequestBuilder, BackendError> {
        let builder = self.client.request(method, self.url(path)?);
        Ok(match tenant {
            Some(tenant) => builder.header(self.tenant_header.clone(), tenant.as_str()),
            None => builder,
        })
    }

    /// GET a JSON document for a tenant.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        tenant: Option<&TenantId>,
    ) -> Result<T, BackendError> {
        let response = self.request(Method::GET, path, tenant)?.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), path = %path, "Backend request failed");
            return Err(BackendError::Status { status: status.as_u16(), body });
        }
        Ok(response.json().await?)
    }
}
