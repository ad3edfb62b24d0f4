//! Transport

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::api::{ApiError, Endpoint, Envelope};

/// One call against an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Operation being called.
    pub endpoint: Endpoint,

    /// Value for the `{id}` placeholder.
    pub id: Option<String>,

    /// Query string pairs.
    pub query: Vec<(String, String)>,

    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Bare call with no id, query or body.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            id: None,
            query: Vec::new(),
            body: None,
        }
    }

    /// Fill the `{id}` placeholder.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Append query string pairs.
    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// [`ApiError::Decode`] when `body` does not serialize.
    pub fn with_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call and return the envelope of a successful response.
    ///
    /// Non-2xx statuses and `success: false` are both failures.
    async fn send(&self, request: ApiRequest) -> Result<Envelope, ApiError>;
}

/// [`Transport`] over HTTP, keeping the session cookie between calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base: Url,
    http: Client,
}

impl HttpTransport {
    /// Client for the API at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self { base, http })
    }

    /// Base URL calls are made against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Full URL of a request.
    ///
    /// # Errors
    ///
    /// [`ApiError::Url`] when the path does not join onto the base.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let path = request.endpoint.path_for(request.id.as_deref());
        let mut url = self.base.join(&path)?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Envelope, ApiError> {
        let url = self.url_for(&request)?;
        let endpoint = request.endpoint.name;

        debug!(endpoint, method = ?request.endpoint.method, %url, "sending request");

        let mut builder = self.http.request(request.endpoint.method.into(), url);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.inspect_err(|source| {
            error!(endpoint, "request failed: {source}");
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        read_envelope(status, &body).inspect_err(|source| {
            debug!(endpoint, status, "request rejected: {source}");
        })
    }
}

/// Turn a raw response into an envelope, treating non-2xx and
/// `success: false` the same way.
///
/// # Errors
///
/// - [`ApiError::Rejected`]: failure with a message.
/// - [`ApiError::Status`]: non-2xx without a message.
/// - [`ApiError::Decode`]: 2xx with a body that is not an envelope.
pub fn read_envelope(status: u16, body: &[u8]) -> Result<Envelope, ApiError> {
    let ok = (200..300).contains(&status);

    let envelope = match serde_json::from_slice::<Envelope>(body) {
        Ok(envelope) => envelope,
        Err(_) if !ok => return Err(ApiError::Status(status)),
        Err(source) => return Err(ApiError::Decode(source)),
    };

    if ok && envelope.is_success() {
        return Ok(envelope);
    }

    match envelope.message() {
        Some(message) => Err(ApiError::rejected(status, message)),
        None => Err(ApiError::Status(status)),
    }
}
