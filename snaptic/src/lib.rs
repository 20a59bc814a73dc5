//! Snaptic notes API client library.
//!
//! Provides authenticated, blocking access to the Snaptic REST API: notes
//! (list, cursor windows, create, edit, delete), image attachments, the
//! account user and tags.
//!
//! # Authentication
//!
//! Every request carries either HTTP Basic credentials or a `cookie_epass`
//! session cookie. Credentials can be persisted to
//! `~/.config/snaptic/session.json`.
//!
//! ```no_run
//! use snaptic::auth::Credentials;
//! use snaptic::{ClientConfig, SnapticClient};
//!
//! let mut client = SnapticClient::new(ClientConfig::new(Credentials::basic("harry", "secret")))?;
//!
//! // Most recent 20 notes
//! for note in client.fetch_notes_from_cursor(-1)? {
//!     println!("{}", note.text);
//! }
//!
//! // Edit locally, then push
//! let mut note = client.notes()?[0].clone();
//! note.text = "Harry says coolio".into();
//! client.edit_note(&note)?;
//! # Ok::<(), snaptic::SnapticError>(())
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                                   | Endpoint                              |
//! |------------------------------------------|---------------------------------------|
//! | [`SnapticClient::fetch_notes`]           | `GET /v1/notes.json`                  |
//! | [`SnapticClient::fetch_notes_from_cursor`] | `GET /v1/notes.json?cursor=<n>`     |
//! | [`SnapticClient::fetch_cursor_info`]     | `GET /v1/notes.json?cursor=<n>`       |
//! | [`SnapticClient::post_note`]             | `POST /v1/notes.json`                 |
//! | [`SnapticClient::edit_note`]             | `POST /v1/notes/<id>.json`            |
//! | [`SnapticClient::delete_note`]           | `DELETE /v1/notes/<id>`               |
//! | [`SnapticClient::attach_image_to_note`]  | `POST /v1/images/<id>.json`           |
//! | [`SnapticClient::fetch_image_data`]      | `GET /viewImage.action?viewNodeId=<id>` |
//! | [`SnapticClient::fetch_user`]            | `GET /v1/user.json`                   |
//! | [`SnapticClient::fetch_tags`]            | `GET /v1/tags/tags.json`              |
//!
//! Only HTTP 200 is success. Anything else is returned as
//! [`SnapticError::Api`] carrying the status and raw body.

pub mod auth;
pub mod client;
mod dispatch;
pub mod endpoint;
pub mod error;
mod images;
pub mod mapper;
#[cfg(test)]
mod mock;
pub mod multipart;
mod notes;
pub mod transport;
pub mod types;
mod user;

pub use client::{ClientConfig, SnapticClient};
pub use error::{Result, SnapticError};
