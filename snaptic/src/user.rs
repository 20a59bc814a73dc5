//! User and tags API.
//!
//! ## `fetch_user`: `GET /v1/user.json`
//!
//! ```json
//! {
//!   "user": {
//!     "id": 1813083,
//!     "user_name": "harry12",
//!     "created_at": "2010-01-24T23:37:07.411Z",
//!     "email": "harry@example.com"
//!   }
//! }
//! ```
//!
//! ## `fetch_tags`: `GET /v1/tags/tags.json`
//!
//! ```json
//! { "tags": [ { "name": "food", "count": "1" }, { "name": "ice", "count": "1" } ] }
//! ```

use crate::client::SnapticClient;
use crate::endpoint;
use crate::error::{Result, SnapticError};
use crate::mapper;
use crate::types::{TagCount, User};

impl SnapticClient {
    /// Fetch the account owner and update the user cache.
    pub fn fetch_user(&mut self) -> Result<User> {
        let json = self.dispatcher().get(&endpoint::user())?;
        let user = mapper::parse_user(&json)?;
        self.store_user(&user);
        Ok(user)
    }

    /// Id of the cached user.
    ///
    /// # Errors
    ///
    /// [`SnapticError::Config`] if no user has been fetched yet; call
    /// [`fetch_user`](Self::fetch_user) first.
    pub fn user_id(&self) -> Result<u64> {
        self.cached_user()
            .map(|u| u.id)
            .ok_or_else(|| SnapticError::Config("user id not set; fetch the user first".into()))
    }

    /// Fetch the account's tags as raw JSON bytes.
    pub fn fetch_tags(&self) -> Result<Vec<u8>> {
        self.dispatcher().get(&endpoint::tags())
    }

    /// Fetch the account's tags with their note counts.
    pub fn fetch_tag_counts(&self) -> Result<Vec<TagCount>> {
        mapper::parse_tags(&self.fetch_tags()?)
    }
}
