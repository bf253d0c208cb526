//! Sending requests.
//!
//! Generated clients are generic over [`DispatchRequest`], so tests can
//! answer requests from memory while real callers use
//! [`ReqwestDispatcher`].

use std::borrow::Cow;
use std::future::Future;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::DispatchError;
use crate::request::ServiceRequest;

/// A received HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a [`ServiceRequest`] and returns whatever response arrives.
///
/// Implementations only fail when no response is obtained; error statuses
/// are returned as ordinary responses.
pub trait DispatchRequest {
    fn dispatch(
        &self,
        request: &ServiceRequest,
    ) -> impl Future<Output = Result<HttpResponse, DispatchError>> + Send;
}

/// A [`DispatchRequest`] backed by `reqwest`.
///
/// Requests go to `https://<hostname><path>` unless an endpoint override is
/// set, in which case the override replaces scheme and host. Parameters are
/// sent as the query string and the payload, if any, as the body.
///
/// ## Examples
///
/// ```no_run
/// use shapegen::{DispatchRequest, ReqwestDispatcher, ServiceRequest};
///
/// # async fn run() -> Result<(), shapegen::DispatchError> {
/// let dispatcher = ReqwestDispatcher::new().with_endpoint("http://localhost:4566");
/// let request = ServiceRequest::new("GET", "widgets", "us-east-1", "/");
/// let response = dispatcher.dispatch(&request).await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestDispatcher {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl ReqwestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing client, sharing its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: None,
        }
    }

    /// Sends every request to `endpoint` instead of the derived host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    fn url_for(&self, request: &ServiceRequest) -> String {
        match &self.endpoint {
            Some(endpoint) => format!(
                "{}{}",
                endpoint.trim_end_matches('/'),
                request.resolved_path()
            ),
            None => format!("https://{}{}", request.hostname(), request.resolved_path()),
        }
    }
}

impl DispatchRequest for ReqwestDispatcher {
    fn dispatch(
        &self,
        request: &ServiceRequest,
    ) -> impl Future<Output = Result<HttpResponse, DispatchError>> + Send {
        let client = self.client.clone();
        let url = self.url_for(request);
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|_| DispatchError::InvalidMethod(request.method().to_string()));
        let headers = request.headers().to_vec();
        let params = request.params().pairs().to_vec();
        let payload = request.payload().cloned();

        async move {
            let method = method?;
            debug!(%method, %url, params = params.len(), "dispatching request");

            let mut builder = client.request(method, &url);
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if !params.is_empty() {
                builder = builder.query(&params);
            }
            if let Some(payload) = payload {
                builder = builder.body(payload);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            debug!(status, bytes = body.len(), "received response");

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
