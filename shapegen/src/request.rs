//! Outbound request representation.

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::params::Params;

/// Characters escaped in a single path segment (everything but unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters escaped in a greedy `{Name+}` placeholder, which may span segments.
const GREEDY: &AsciiSet = &SEGMENT.remove(b'/');

/// A request under construction.
///
/// Generated operation methods create one per call, let the input encoder
/// fill in headers, path parameters, query parameters and the payload, and
/// hand it to a [`DispatchRequest`](crate::DispatchRequest).
///
/// ## Examples
///
/// ```
/// use shapegen::ServiceRequest;
///
/// let mut request = ServiceRequest::new("GET", "widgets", "eu-west-1", "/widgets/{WidgetId}");
/// request.set_path_param("WidgetId", "w 1");
/// request.add_header("x-amz-request-payer", "requester");
/// request.params_mut().put("max-items", "10");
///
/// assert_eq!(request.resolved_path(), "/widgets/w%201");
/// assert_eq!(request.hostname(), "widgets.eu-west-1.amazonaws.com");
/// assert_eq!(request.header("X-Amz-Request-Payer"), Some("requester"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    method: String,
    endpoint_prefix: String,
    region: String,
    path: String,
    path_params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    params: Params,
    payload: Option<Bytes>,
    hostname: Option<String>,
}

impl ServiceRequest {
    pub fn new(method: &str, endpoint_prefix: &str, region: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            endpoint_prefix: endpoint_prefix.to_string(),
            region: region.to_string(),
            path: path.to_string(),
            path_params: Vec::new(),
            headers: Vec::new(),
            params: Params::new(),
            payload: None,
            hostname: None,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn endpoint_prefix(&self) -> &str {
        &self.endpoint_prefix
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The unexpanded path template.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Appends a header. Repeated names are kept.
    pub fn add_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Binds the `{name}` or `{name+}` placeholder of the path template.
    pub fn set_path_param(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.path_params.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.path_params.push((name.to_string(), value)),
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Sets the raw request body. The bytes are sent unchanged.
    pub fn set_payload(&mut self, payload: impl Into<Bytes>) {
        self.payload = Some(payload.into());
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Overrides the host derived from endpoint prefix and region.
    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = Some(hostname.into());
    }

    pub fn hostname(&self) -> String {
        match &self.hostname {
            Some(hostname) => hostname.clone(),
            None => format!("{}.{}.amazonaws.com", self.endpoint_prefix, self.region),
        }
    }

    /// The path template with bound placeholders substituted.
    ///
    /// Values are percent-encoded; `{name+}` placeholders keep `/`.
    /// Unbound placeholders are left as written.
    pub fn resolved_path(&self) -> String {
        let mut resolved = String::with_capacity(self.path.len());
        let mut rest = self.path.as_str();

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
                break;
            };
            resolved.push_str(&rest[..open]);

            let placeholder = &rest[open + 1..close];
            let (name, greedy) = match placeholder.strip_suffix('+') {
                Some(name) => (name, true),
                None => (placeholder, false),
            };

            match self.path_param(name) {
                Some(value) => {
                    let set = if greedy { GREEDY } else { SEGMENT };
                    resolved.extend(utf8_percent_encode(value, set));
                }
                None => resolved.push_str(&rest[open..=close]),
            }
            rest = &rest[close + 1..];
        }

        resolved.push_str(rest);
        resolved
    }

    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }
}
