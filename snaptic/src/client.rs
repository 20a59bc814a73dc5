//! Blocking client for the Snaptic REST API.
//!
//! Each public operation performs one HTTP round trip (plus one per image
//! when image bytes are requested) and blocks until the whole response body
//! has been read.
//!
//! # Caching
//!
//! The client keeps the last fetched user, note list and raw notes JSON.
//! `fetch_*` methods always hit the server and overwrite the matching cache;
//! the lazy accessors [`notes`](SnapticClient::notes),
//! [`user`](SnapticClient::user) and [`raw_json`](SnapticClient::raw_json)
//! only fetch when nothing is cached. Caches are never invalidated on their
//! own, not even by `post_note`/`edit_note`/`delete_note`.
//!
//! # Concurrency
//!
//! A `SnapticClient` is meant for one thread at a time. Cache updates need
//! `&mut self`, and the client is neither `Send` nor `Sync`; use one client per
//! thread when requests must run in parallel.

use crate::auth::Credentials;
use crate::dispatch::Dispatcher;
use crate::error::{Result, SnapticError};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Note, User};
use std::time::Duration;

/// Default API host.
pub const API_SERVER: &str = "api.snaptic.com";

/// Connection settings and credentials.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub use_ssl: bool,
    pub port: u16,
    /// Applied to each request.
    pub timeout: Duration,
    pub credentials: Credentials,
}

impl ClientConfig {
    /// Defaults: `api.snaptic.com`, TLS on port 443, 10 second timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            host: API_SERVER.to_owned(),
            use_ssl: true,
            port: 443,
            timeout: Duration::from_secs(10),
            credentials,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_ssl(mut self, use_ssl: bool) -> Self {
        self.use_ssl = use_ssl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking HTTP client for the Snaptic API.
///
/// API methods are implemented in separate modules (`notes`, `images`,
/// `user`) as `impl SnapticClient` blocks.
pub struct SnapticClient {
    dispatch: Dispatcher,
    last_user: Option<User>,
    last_notes: Option<Vec<Note>>,
    last_raw_json: Option<Vec<u8>>,
}

impl SnapticClient {
    /// Create a client that talks to the configured host over `reqwest`.
    ///
    /// Fails with [`SnapticError::Config`] if the credentials offer no usable
    /// authentication mode.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(
            &config.host,
            config.port,
            config.use_ssl,
            config.timeout,
        )?;
        Self::with_transport(config.credentials, transport)
    }

    /// Create a client on top of a custom [`Transport`].
    pub fn with_transport(
        credentials: Credentials,
        transport: impl Transport + 'static,
    ) -> Result<Self> {
        credentials.mode()?;
        Ok(Self {
            dispatch: Dispatcher::new(Box::new(transport), credentials),
            last_user: None,
            last_notes: None,
            last_raw_json: None,
        })
    }

    /// Replace the credentials used for subsequent requests.
    ///
    /// The old credentials stay in place if the new ones are unusable.
    pub fn set_credentials(&mut self, credentials: Credentials) -> Result<()> {
        credentials.mode()?;
        self.dispatch.set_credentials(credentials);
        Ok(())
    }

    /// Return the credentials in use.
    pub fn credentials(&self) -> &Credentials {
        self.dispatch.credentials()
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatch
    }

    /// Cached notes, fetching them first if nothing is cached.
    pub fn notes(&mut self) -> Result<&[Note]> {
        if self.last_notes.is_none() {
            self.fetch_notes()?;
        }
        Ok(self.last_notes.as_deref().unwrap_or_default())
    }

    /// Cached user, fetching it first if nothing is cached.
    pub fn user(&mut self) -> Result<&User> {
        if self.last_user.is_none() {
            self.fetch_user()?;
        }
        self.last_user
            .as_ref()
            .ok_or_else(|| SnapticError::Config("user not available".into()))
    }

    /// Cached raw notes JSON, fetching it first if nothing is cached.
    pub fn raw_json(&mut self) -> Result<&[u8]> {
        if self.last_raw_json.is_none() {
            self.fetch_raw_json()?;
        }
        Ok(self.last_raw_json.as_deref().unwrap_or_default())
    }

    /// Notes from the last successful note-list fetch, without any network access.
    pub fn cached_notes(&self) -> Option<&[Note]> {
        self.last_notes.as_deref()
    }

    /// User from the last successful user fetch, without any network access.
    pub fn cached_user(&self) -> Option<&User> {
        self.last_user.as_ref()
    }

    pub(crate) fn store_notes(&mut self, notes: &[Note]) {
        self.last_notes = Some(notes.to_vec());
    }

    pub(crate) fn store_user(&mut self, user: &User) {
        self.last_user = Some(user.clone());
    }

    pub(crate) fn store_raw_json(&mut self, json: &[u8]) {
        self.last_raw_json = Some(json.to_vec());
    }
}
