// API client module: a small blocking HTTP client for version 2 of the
// Mapillary API. Requests are authenticated with a client identifier sent
// as a query parameter, and responses are decoded from JSON into whatever
// shape the caller asks for.

use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default location of the Mapillary API, version 2.
pub const DEFAULT_BASE_URL: &str = "https://a.mapillary.com/v2";

/// Client to make requests to the Mapillary API version 2.
///
/// The base URL is fixed at construction and never rewritten; every request
/// joins its relative path into a fresh URL, so a client can be shared
/// across threads.
#[derive(Clone, Debug)]
pub struct Client {
    http: HttpClient,
    base: Url,
    client_id: String,
    timeout: Option<Duration>,
}

/// Response of the `search/im/randomselected` endpoint: one image picked at
/// random from the selected set. Field names mirror the ones documented by
/// the service.
#[derive(Serialize, Deserialize, Debug)]
pub struct RandomSelectedImage {
    /// Key of the image in the Mapillary storage.
    pub key: String,
}

impl Client {
    /// Create a client bound to the default API location and the given
    /// client identifier. No network activity happens here.
    pub fn new(client_id: &str) -> Result<Self> {
        Self::with_base_url(client_id, DEFAULT_BASE_URL)
    }

    /// Create a client against an explicit base URL. Useful for pointing
    /// at a local mock server in tests.
    pub fn with_base_url(client_id: &str, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Failed to parse base URL {}", base_url))?;
        let http = HttpClient::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Client {
            http,
            base,
            client_id: client_id.to_string(),
            timeout: None,
        })
    }

    /// Apply a deadline to every subsequent request. Requests wait
    /// indefinitely unless one is set.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// The client identifier sent with every request.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Perform an HTTP request against the API and decode the JSON response
    /// body into `T`. Callers that want the raw shape can decode into a
    /// `serde_json::Value`.
    ///
    /// `path` is joined onto the base URL's path, and the caller's `params`
    /// are forwarded unmodified with `client_id` appended to them. The body
    /// is parsed whatever the status code: the v2 API leaves status handling
    /// to the caller.
    pub fn request<T>(&self, method: Method, path: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut url = self.base.clone();
        url.set_path(&join_path(url.path(), path));
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("client_id", &self.client_id);
        }
        debug!(method = %method, path = url.path(), "sending API request");

        let mut request = self.http.request(method, url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().context("Failed to send API request")?;
        // Read the whole body before decoding so the connection is released
        // even when the decode fails.
        let body = response.text().context("Failed to read response body")?;
        serde_json::from_str(&body).context("Failed to parse response body as JSON")
    }

    /// Perform an HTTP GET against the API. See [`Client::request`].
    pub fn get<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, params)
    }

    /// Fetch one image picked at random from the selected set.
    pub fn random_selected_image(&self) -> Result<RandomSelectedImage> {
        self.get("search/im/randomselected", &[])
    }
}

/// Join `path` onto `base`, collapsing redundant slashes and resolving `.`
/// and `..` segments. Always returns a rooted path.
fn join_path(base: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}
