//! Credentials and session persistence.
//!
//! The API accepts exactly one of two authentication schemes on every request:
//!
//! - HTTP Basic: `Authorization: Basic base64(username:password)`
//! - Session cookie: `Cookie: cookie_epass=<token>`
//!
//! When both are configured, username/password wins. A username without a
//! password (or the reverse) is rejected rather than silently falling back to
//! the cookie.
//!
//! Credentials can be persisted to `~/.config/snaptic/session.json`:
//!
//! ```json
//! { "username": "harry12", "password": "...", "cookie_epass": null }
//! ```

use crate::error::{Result, SnapticError};
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Account credentials, persisted as a JSON file on disk.
///
/// `Debug` output redacts the password and the cookie token.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account user name (Basic auth).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Account password (Basic auth).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Pre-issued `cookie_epass` session token (cookie auth).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_epass: Option<String>,
}

/// The credential mode selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode<'a> {
    Basic { username: &'a str, password: &'a str },
    Cookie(&'a str),
}

impl Credentials {
    /// Username/password credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            cookie_epass: None,
        }
    }

    /// Cookie credentials.
    pub fn cookie(token: impl Into<String>) -> Self {
        Self {
            cookie_epass: Some(token.into()),
            ..Self::default()
        }
    }

    /// Pick the credential mode used for requests.
    ///
    /// Empty strings count as unset.
    pub fn mode(&self) -> Result<AuthMode<'_>> {
        let username = non_empty(self.username.as_deref());
        let password = non_empty(self.password.as_deref());
        match (username, password) {
            (Some(username), Some(password)) => Ok(AuthMode::Basic { username, password }),
            (Some(_), None) | (None, Some(_)) => Err(SnapticError::Config(
                "both username and password are required for basic auth".into(),
            )),
            (None, None) => non_empty(self.cookie_epass.as_deref())
                .map(AuthMode::Cookie)
                .ok_or_else(|| {
                    SnapticError::Config(
                        "no username/password combination or cookie provided".into(),
                    )
                }),
        }
    }

    /// Build the authentication headers attached to every request.
    pub fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        match self.mode()? {
            AuthMode::Basic { username, password } => {
                let token = B64.encode(format!("{username}:{password}"));
                headers.insert(AUTHORIZATION, header_value(&format!("Basic {token}"))?);
            }
            AuthMode::Cookie(token) => {
                headers.insert(COOKIE, header_value(&format!("cookie_epass={token}"))?);
            }
        }
        Ok(headers)
    }

    /// Check whether any usable credential mode is configured.
    pub fn is_configured(&self) -> bool {
        self.mode().is_ok()
    }

    /// Load credentials from `~/.config/snaptic/session.json`.
    ///
    /// Returns empty credentials if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Save credentials to `~/.config/snaptic/session.json`.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Delete `~/.config/snaptic/session.json`.
    pub fn clear() -> Result<()> {
        Self::clear_at(&Self::path()?)
    }

    /// Load credentials from a session file. A missing file yields empty credentials.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write credentials to a session file, creating parent directories if
    /// needed. On Unix the file is only readable by its owner.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        let mut file = owner_only_options().open(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// Delete a session file. Does nothing if it does not exist.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn path() -> Result<PathBuf> {
        let config = dirs::config_dir()
            .ok_or_else(|| SnapticError::Config("cannot determine config directory".into()))?;
        Ok(config.join("snaptic").join("session.json"))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("cookie_epass", &redacted(&self.cookie_epass))
            .finish()
    }
}

fn owner_only_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| SnapticError::Config(format!("invalid credential characters: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header() {
        let headers = Credentials::basic("harry", "secret").auth_headers().unwrap();
        // base64("harry:secret")
        assert_eq!(headers[AUTHORIZATION], "Basic aGFycnk6c2VjcmV0");
        assert!(headers.get(COOKIE).is_none());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn cookie_auth_header() {
        let headers = Credentials::cookie("abc123").auth_headers().unwrap();
        assert_eq!(headers[COOKIE], "cookie_epass=abc123");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn basic_takes_precedence_over_cookie() {
        let creds = Credentials {
            cookie_epass: Some("abc123".into()),
            ..Credentials::basic("harry", "secret")
        };
        let headers = creds.auth_headers().unwrap();
        assert!(headers.contains_key(AUTHORIZATION));
        assert!(!headers.contains_key(COOKIE));
    }

    #[test]
    fn no_credentials_is_config_error() {
        let err = Credentials::default().auth_headers().unwrap_err();
        assert!(matches!(err, SnapticError::Config(_)));
    }

    #[test]
    fn partial_basic_credentials_are_rejected() {
        let only_user = Credentials {
            username: Some("harry".into()),
            cookie_epass: Some("abc123".into()),
            ..Credentials::default()
        };
        assert!(matches!(only_user.mode(), Err(SnapticError::Config(_))));

        let only_password = Credentials {
            password: Some("secret".into()),
            ..Credentials::default()
        };
        assert!(matches!(only_password.mode(), Err(SnapticError::Config(_))));
    }

    #[test]
    fn empty_strings_count_as_unset() {
        let creds = Credentials {
            username: Some(String::new()),
            password: Some(String::new()),
            cookie_epass: Some("tok".into()),
        };
        assert_eq!(creds.mode().unwrap(), AuthMode::Cookie("tok"));
        assert!(!Credentials::cookie("").is_configured());
    }

    #[test]
    fn credentials_json_shape() {
        let json = serde_json::to_string(&Credentials::cookie("tok")).unwrap();
        assert_eq!(json, r#"{"cookie_epass":"tok"}"#);
        let back: Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Credentials::cookie("tok"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials {
            cookie_epass: Some("tok123".into()),
            ..Credentials::basic("harry", "hunter2")
        };
        let out = format!("{creds:?}");
        assert!(out.contains("harry"));
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("tok123"));
    }

    #[test]
    fn missing_session_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let creds = Credentials::load_from(&dir.path().join("session.json")).unwrap();
        assert_eq!(creds, Credentials::default());
        assert!(!creds.is_configured());
    }

    #[test]
    fn session_save_load_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snaptic").join("session.json");
        let creds = Credentials::basic("harry", "secret");

        creds.save_to(&path).unwrap();
        assert!(path.exists());
        assert_eq!(Credentials::load_from(&path).unwrap(), creds);

        // Saving again replaces the previous session.
        Credentials::cookie("tok").save_to(&path).unwrap();
        assert_eq!(Credentials::load_from(&path).unwrap(), Credentials::cookie("tok"));

        Credentials::clear_at(&path).unwrap();
        assert!(!path.exists());
        Credentials::clear_at(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        Credentials::cookie("tok").save_to(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
