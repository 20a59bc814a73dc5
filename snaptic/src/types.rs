//! Data types for Snaptic API responses.
//!
//! Values are built by [`mapper`](crate::mapper) from the raw JSON returned by
//! the API. Ids are the numeric identifiers the server assigns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The account owner.
///
/// Returned by [`SnapticClient::fetch_user`](crate::SnapticClient::fetch_user).
///
/// API JSON path: `response.user` with fields `id`, `user_name`,
/// `created_at`, `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub user_name: String,
    /// ISO-8601 timestamp as sent by the server.
    pub created_at: String,
    pub email: String,
}

/// Kind of media attached to a note. Only images exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum MediaType {
    Image,
}

/// An image attached to a [`Note`].
///
/// API JSON fields (inside `note.media[]`): `type`, `id`, `revision_id`,
/// `width`, `height`, `src`, optionally `md5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "type")]
    pub kind: MediaType,
    /// Content hash, when the server supplies one.
    pub md5: Option<String>,
    pub id: u64,
    pub revision_id: Option<u64>,
    pub width: u32,
    pub height: u32,
    /// Where the server serves the image from.
    pub src: String,
    /// Image bytes. Only populated when explicitly requested, see
    /// [`SnapticClient::fetch_notes_with_image_data`](crate::SnapticClient::fetch_notes_with_image_data).
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
}

/// The `children` field of a note.
///
/// Current servers send a plain count; a list of child note ids is accepted
/// as well so that neither shape is silently misread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Count(u64),
    Ids(Vec<u64>),
}

impl Children {
    /// Number of child notes, whichever shape the server sent.
    pub fn count(&self) -> u64 {
        match self {
            Self::Count(n) => *n,
            Self::Ids(ids) => ids.len() as u64,
        }
    }
}

impl Default for Children {
    fn default() -> Self {
        Self::Count(0)
    }
}

/// A note.
///
/// Fields can be changed freely; nothing is sent to the server until the note
/// is passed to [`SnapticClient::edit_note`](crate::SnapticClient::edit_note).
///
/// API JSON fields (inside `response.notes[]`): `id`, `created_at`,
/// `modified_at`, `reminder_at`, `text`, `summary`, `source`, `source_url`,
/// `user` (`{ id, user_name }`), `children`, `media`, `tags`, `location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub created_at: String,
    pub modified_at: String,
    pub reminder_at: Option<String>,
    #[serde(rename = "id")]
    note_id: Option<u64>,
    pub text: String,
    pub summary: String,
    pub source: String,
    pub source_url: String,
    /// Id of the owning user.
    pub user: Option<u64>,
    pub children: Children,
    pub media: Vec<Image>,
    pub tags: Vec<String>,
    /// Not mapped from the server payload yet; always empty.
    pub location: Vec<Value>,
}

impl Note {
    /// A new, unsaved note. It has no id, so it can be posted but not edited.
    pub fn draft(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            created_at: String::new(),
            modified_at: String::new(),
            reminder_at: None,
            note_id: None,
            summary: text.clone(),
            text,
            source: String::new(),
            source_url: String::new(),
            user: None,
            children: Children::default(),
            media: Vec::new(),
            tags: Vec::new(),
            location: Vec::new(),
        }
    }

    /// Server-assigned id. `None` for drafts.
    pub fn note_id(&self) -> Option<u64> {
        self.note_id
    }

    pub(crate) fn set_note_id(&mut self, id: u64) {
        self.note_id = Some(id);
    }

    /// Whether any media is attached.
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }

    /// Form fields sent when the note is edited. Only the text is pushed.
    pub fn form_fields(&self) -> [(&'static str, &str); 1] {
        [("text", self.text.as_str())]
    }
}

/// Position of a cursor window within the note list.
///
/// Returned by [`SnapticClient::fetch_cursor_info`](crate::SnapticClient::fetch_cursor_info).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorInfo {
    pub previous_cursor: i64,
    pub next_cursor: i64,
    /// Number of notes in this window.
    pub count: u64,
}

/// Tag usage count.
///
/// API JSON path: `response.tags[]` with fields `name`, `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_has_no_id_and_no_media() {
        let note = Note::draft("hello");
        assert_eq!(note.note_id(), None);
        assert!(!note.has_media());
        assert_eq!(note.form_fields(), [("text", "hello")]);
    }

    #[test]
    fn drafts_do_not_share_containers() {
        let mut a = Note::draft("a");
        let b = Note::draft("b");
        a.tags.push("food".into());
        assert!(b.tags.is_empty());
    }

    #[test]
    fn children_count_for_both_shapes() {
        assert_eq!(Children::Count(3).count(), 3);
        assert_eq!(Children::Ids(vec![1, 2]).count(), 2);
    }
}
