//! HTTP client adapter.
//!
//! Every authenticated request re-reads the bearer token from session storage
//! at dispatch time, so a login or logout takes effect on the very next call.
//! There is no retry layer: each call is a single attempt and non-success
//! responses become [`Error::Api`] carrying the server's `detail` message.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::store::{self, SessionStorage};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    storage: Arc<dyn SessionStorage>,
}

impl ApiClient {
    pub fn new(base: Url, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_client(reqwest::Client::new(), base, storage)
    }

    pub fn with_client(http: reqwest::Client, base: Url, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            http,
            base,
            storage,
        }
    }

    /// The resolved API origin.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    pub fn url(&self, path: &str) -> Result<Url> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// Starts a request carrying the stored bearer token, if any.
    pub async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let mut builder = self.http.request(method.clone(), url);

        match store::read_token(self.storage.as_ref()).await? {
            Some(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| Error::InvalidToken)?;
                builder = builder.header(AUTHORIZATION, value);
                debug!(%method, path, "dispatching authenticated request");
            }
            None => debug!(%method, path, "dispatching request without credentials"),
        }

        Ok(builder)
    }

    /// Starts a request that never carries credentials (login, signup).
    pub fn anonymous(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        debug!(%method, path, "dispatching anonymous request");
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Sends `builder` and decodes a JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Sends `builder` and discards the body.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        check(builder.send().await?).await?;
        Ok(())
    }

    /// Sends `builder` and returns the raw JSON value. An empty body reads as
    /// `Null`; a body that is not JSON is an error.
    pub async fn send_value(&self, builder: RequestBuilder) -> Result<serde_json::Value> {
        let response = check(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path).await?;
        self.send_json(builder).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, path).await?;
        self.send_empty(builder).await
    }
}

/// Passes success responses through; turns everything else into `Error::Api`.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let detail = extract_detail(&body);
    debug!(%status, ?detail, "request failed");
    Err(Error::Api { status, detail })
}

/// Pulls a string `detail` field out of an error body.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TOKEN_KEY};

    fn client(storage: MemoryStore) -> ApiClient {
        ApiClient::new(Url::parse("http://127.0.0.1:8000").unwrap(), Arc::new(storage))
    }

    #[test]
    fn detail_extraction() {
        assert_eq!(
            extract_detail(br#"{"detail":"Event full"}"#).as_deref(),
            Some("Event full")
        );
        assert_eq!(extract_detail(br#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(extract_detail(br#"{"message":"nope"}"#), None);
        assert_eq!(extract_detail(b"<html>502</html>"), None);
    }

    #[tokio::test]
    async fn bearer_is_read_at_dispatch_time() {
        let storage = MemoryStore::new();
        let api = client(storage.clone());

        let request = api.request(Method::GET, "/api/events").await.unwrap().build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());

        storage.set(TOKEN_KEY, "abc").await.unwrap();
        let request = api.request(Method::GET, "/api/events").await.unwrap().build().unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");
        assert_eq!(request.url().as_str(), "http://127.0.0.1:8000/api/events");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let api = ApiClient::new(
            Url::parse("https://campus.edu/backend").unwrap(),
            Arc::new(MemoryStore::new()),
        );
        assert_eq!(
            api.url("/api/events").unwrap().as_str(),
            "https://campus.edu/backend/api/events"
        );
        assert_eq!(
            api.url("api/events/3").unwrap().as_str(),
            "https://campus.edu/backend/api/events/3"
        );

        let api = ApiClient::new(
            Url::parse("https://campus.edu/backend/").unwrap(),
            Arc::new(MemoryStore::new()),
        );
        assert_eq!(
            api.url("/analytics/event/1").unwrap().as_str(),
            "https://campus.edu/backend/analytics/event/1"
        );
    }

    #[tokio::test]
    async fn anonymous_requests_skip_the_token() {
        let storage = MemoryStore::new();
        storage.set(TOKEN_KEY, "abc").await.unwrap();
        let api = client(storage);

        let request = api.anonymous(Method::POST, "/api/auth/login").unwrap().build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }
}
