//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Probes are described as plain data. The core builds `HttpRequest` values
//! and classifies `HttpResponse` values without touching the network; the
//! host executes the round-trip through a [`ProbeTransport`].
//!
//! Probe responses never carry a body. The metadata-only probe has none and
//! the first-byte probe only exists to coax headers out of servers that
//! refuse `HEAD`.
//!
//! [`ProbeTransport`]: crate::transport::ProbeTransport

use std::fmt;

/// HTTP method for a probe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Head,
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Head => "HEAD",
            HttpMethod::Get => "GET",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound probe described as plain data.
///
/// Redirects are the transport's job: it must follow them and report the
/// final response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// The response a transport observed for an `HttpRequest`, after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// URL of the final hop once redirects were followed.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Value of header `name`, compared case-insensitively. Repeated
    /// headers are joined with `", "` in the order they arrived.
    pub fn header(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
