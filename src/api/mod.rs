//! HTTP plumbing for the clinic backend.
//!
//! Every data operation in the portal is a call to the backend REST API. This
//! module owns the shared `reqwest` client, attaches the bearer token, and
//! turns non-2xx responses into [`ApiError`]s. The per-resource calls live next
//! to their types under `crate::models::*::queries`.

pub mod error;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use self::error::ApiError;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Error body shape used by the backend: `{"message": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Cheap to clone; the inner client shares one connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .user_agent(concat!("ivfcare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a backend path (with or without leading slash) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(t) => builder.bearer_auth(t),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path, token).send().await?;
        decode(resp).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, token: Option<&str>, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self.request(Method::GET, path, token).query(query).send().await?;
        decode(resp).await
    }

    pub async fn post<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.request(Method::POST, path, token).json(body).send().await?;
        decode(resp).await
    }

    pub async fn put<T, B>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.request(Method::PUT, path, token).json(body).send().await?;
        decode(resp).await
    }

    /// PUT/POST where the response body is irrelevant.
    pub async fn send<B>(&self, method: Method, path: &str, token: Option<&str>, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, path, token);
        if let Some(b) = body {
            builder = builder.json(b);
        }
        let resp = builder.send().await?;
        check_status(resp).await.map(|_| ())
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    log::warn!("Backend answered HTTP {} ({})", status.as_u16(), message.as_deref().unwrap_or("-"));
    Err(ApiError::from_status(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let resp = check_status(resp).await?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
