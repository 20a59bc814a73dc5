//! HTTP transport seam.
//!
//! [`SnapticClient`](crate::SnapticClient) never talks to `reqwest` directly;
//! it hands fully-built [`HttpRequest`]s to a [`Transport`]. The default
//! [`ReqwestTransport`] sends them with a blocking `reqwest` client. Tests and
//! callers with special needs (proxies, recording) can supply their own.

use crate::error::Result;
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use std::time::Duration;

const USER_AGENT: &str = concat!("snaptic-rs/", env!("CARGO_PKG_VERSION"));

/// A request ready to go on the wire. `path` is relative to the API host and
/// may carry a query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// A fully-read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs one blocking HTTP round trip.
///
/// Implementations must read the whole response body before returning and
/// must not keep the connection checked out afterwards.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Blocking [`Transport`] backed by [`reqwest::blocking::Client`].
pub struct ReqwestTransport {
    http: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport for `host:port`, over TLS when `use_ssl` is set.
    ///
    /// `timeout` bounds each connection attempt, and also the whole request
    /// from connect until the body has been read.
    pub fn new(host: &str, port: u16, use_ssl: bool, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        let scheme = if use_ssl { "https" } else { "http" };
        Ok(Self {
            http,
            base_url: format!("{scheme}://{host}:{port}"),
        })
    }

    /// Scheme, host and port every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let resp = self
            .http
            .request(request.method, &url)
            .headers(request.headers)
            .body(request.body)
            .send()?;
        let status = resp.status().as_u16();
        // Consuming the body drops the response, which releases the connection.
        let body = resp.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
