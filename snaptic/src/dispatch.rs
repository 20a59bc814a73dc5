//! Request dispatch: one logical operation, one HTTP round trip.
//!
//! Every request carries the auth headers from [`Credentials`]. POSTs add a
//! `Content-Type` of either `application/x-www-form-urlencoded` or the
//! multipart type. Only HTTP 200 counts as success; any other status becomes
//! [`SnapticError::Api`] with the raw body attached.

use crate::auth::Credentials;
use crate::error::{Result, SnapticError};
use crate::multipart::MultipartBody;
use crate::transport::{HttpRequest, Transport};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

pub(crate) struct Dispatcher {
    transport: Box<dyn Transport>,
    credentials: Credentials,
}

impl Dispatcher {
    pub(crate) fn new(transport: Box<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub(crate) fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    pub(crate) fn get(&self, path: &str) -> Result<Vec<u8>> {
        self.execute(Method::GET, path, HeaderMap::new(), Vec::new())
    }

    pub(crate) fn delete(&self, path: &str) -> Result<Vec<u8>> {
        self.execute(Method::DELETE, path, HeaderMap::new(), Vec::new())
    }

    /// POST `fields` as an urlencoded form.
    pub(crate) fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        self.execute(Method::POST, path, headers, form_encode(fields).into_bytes())
    }

    pub(crate) fn post_multipart(&self, path: &str, multipart: MultipartBody) -> Result<Vec<u8>> {
        let mut headers = HeaderMap::new();
        let content_type = HeaderValue::from_str(&multipart.content_type)
            .map_err(|e| SnapticError::Config(format!("invalid content type: {e}")))?;
        headers.insert(CONTENT_TYPE, content_type);
        self.execute(Method::POST, path, headers, multipart.body)
    }

    fn execute(
        &self,
        method: Method,
        path: &str,
        extra: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let mut headers = self.credentials.auth_headers()?;
        headers.extend(extra);

        tracing::debug!(%method, path, bytes = body.len(), "sending request");
        let resp = self.transport.send(HttpRequest {
            method: method.clone(),
            path: path.to_owned(),
            headers,
            body,
        })?;
        tracing::debug!(%method, path, status = resp.status, bytes = resp.body.len(), "response");

        if resp.status != 200 {
            tracing::warn!(%method, path, status = resp.status, "request failed");
            return Err(SnapticError::Api {
                status: resp.status,
                body: resp.body,
            });
        }
        Ok(resp.body)
    }
}

/// Encode `fields` as `application/x-www-form-urlencoded`.
pub(crate) fn form_encode(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
