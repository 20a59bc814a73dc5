//! JSON → domain value mapping.
//!
//! The API is treated as schema-free apart from a handful of required keys.
//! A missing required key is a [`SnapticError::MalformedResponse`]; optional
//! containers (`tags`, `media`, `location`) default to empty.
//!
//! # Notes payload
//!
//! ```json
//! {
//!   "notes": [{
//!     "id": 2276722,
//!     "created_at": "2010-04-22T04:19:16.543Z",
//!     "modified_at": "2010-04-22T04:19:16.543Z",
//!     "reminder_at": null,
//!     "text": "Harry says snaptic is da bomb",
//!     "summary": "Harry says snaptic is da bomb",
//!     "source": "3banana",
//!     "source_url": "https://snaptic.com/",
//!     "user": { "user_name": "harry12", "id": 1813083 },
//!     "children": 0,
//!     "tags": [],
//!     "media": [{ "type": "image", "id": 9, "revision_id": 1,
//!                 "width": 640, "height": 480, "src": "https://..." }],
//!     "location": null
//!   }],
//!   "previous_cursor": -1, "next_cursor": 1, "count": 20
//! }
//! ```
//!
//! Entries without an `id` are skipped.

use crate::error::{Result, SnapticError};
use crate::types::{Children, CursorInfo, Image, MediaType, Note, TagCount, User};
use serde_json::Value;

/// Parse a notes payload without fetching image bytes.
pub fn parse_notes(source: &[u8]) -> Result<Vec<Note>> {
    parse_notes_with(source, None::<fn(&Image) -> Result<Vec<u8>>>)
}

/// Parse a notes payload. When `fetch_image` is given it is called once per
/// image to fill [`Image::data`].
pub fn parse_notes_with<F>(source: &[u8], mut fetch_image: Option<F>) -> Result<Vec<Note>>
where
    F: FnMut(&Image) -> Result<Vec<u8>>,
{
    let json: Value = serde_json::from_slice(source)?;
    let entries = json
        .get("notes")
        .ok_or_else(|| malformed("no `notes` key in response"))?
        .as_array()
        .ok_or_else(|| malformed("`notes` is not an array"))?;

    let mut notes = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(id) = entry.get("id") else {
            tracing::debug!("skipping note entry without id");
            continue;
        };
        let mut note = parse_note(entry)?;
        note.set_note_id(id_value(id, "note.id")?);
        if let Some(fetch) = fetch_image.as_mut() {
            for image in &mut note.media {
                image.data = Some(fetch(image)?);
            }
        }
        notes.push(note);
    }
    Ok(notes)
}

/// Parse a `{"user": {...}}` payload.
pub fn parse_user(source: &[u8]) -> Result<User> {
    let json: Value = serde_json::from_slice(source)?;
    let u = json
        .get("user")
        .ok_or_else(|| malformed("no `user` key in response"))?;
    Ok(User {
        id: id_value(required(u, "id", "user")?, "user.id")?,
        user_name: string(required(u, "user_name", "user")?, "user.user_name")?,
        created_at: string(required(u, "created_at", "user")?, "user.created_at")?,
        email: string(required(u, "email", "user")?, "user.email")?,
    })
}

/// Parse the cursor envelope of a cursor window payload.
pub fn parse_cursor_info(source: &[u8]) -> Result<CursorInfo> {
    let json: Value = serde_json::from_slice(source)?;
    Ok(CursorInfo {
        previous_cursor: int_value(
            required(&json, "previous_cursor", "cursor")?,
            "previous_cursor",
        )?,
        next_cursor: int_value(required(&json, "next_cursor", "cursor")?, "next_cursor")?,
        count: id_value(required(&json, "count", "cursor")?, "count")?,
    })
}

/// Parse a `{"tags": [{"name": .., "count": ..}]}` payload.
pub fn parse_tags(source: &[u8]) -> Result<Vec<TagCount>> {
    let json: Value = serde_json::from_slice(source)?;
    let tags = json
        .get("tags")
        .ok_or_else(|| malformed("no `tags` key in response"))?
        .as_array()
        .ok_or_else(|| malformed("`tags` is not an array"))?;
    tags.iter()
        .map(|t| -> Result<TagCount> {
            Ok(TagCount {
                name: string(required(t, "name", "tag")?, "tag.name")?,
                count: id_value(required(t, "count", "tag")?, "tag.count")?,
            })
        })
        .collect()
}

fn parse_note(v: &Value) -> Result<Note> {
    let mut note = Note::draft(string(required(v, "text", "note")?, "note.text")?);
    note.created_at = string(required(v, "created_at", "note")?, "note.created_at")?;
    note.modified_at = string(required(v, "modified_at", "note")?, "note.modified_at")?;
    note.reminder_at = v["reminder_at"].as_str().map(String::from);
    note.summary = v["summary"].as_str().unwrap_or_default().to_owned();
    note.source = v["source"].as_str().unwrap_or_default().to_owned();
    note.source_url = v["source_url"].as_str().unwrap_or_default().to_owned();
    note.user = match &v["user"]["id"] {
        Value::Null => None,
        id => Some(id_value(id, "note.user.id")?),
    };
    note.children = parse_children(&v["children"])?;
    note.tags = parse_tag_names(&v["tags"])?;
    note.media = parse_media(&v["media"])?;
    Ok(note)
}

fn parse_children(v: &Value) -> Result<Children> {
    match v {
        Value::Null => Ok(Children::default()),
        Value::Array(ids) => ids
            .iter()
            .map(|id| id_value(id, "note.children[]"))
            .collect::<Result<Vec<u64>>>()
            .map(Children::Ids),
        other => id_value(other, "note.children").map(Children::Count),
    }
}

fn parse_tag_names(v: &Value) -> Result<Vec<String>> {
    let Some(arr) = optional_array(v, "note.tags")? else {
        return Ok(Vec::new());
    };
    arr.iter().map(|t| string(t, "note.tags[]")).collect()
}

fn parse_media(v: &Value) -> Result<Vec<Image>> {
    let Some(arr) = optional_array(v, "note.media")? else {
        return Ok(Vec::new());
    };
    arr.iter()
        .filter(|item| item["type"].as_str() == Some("image"))
        .map(parse_image)
        .collect()
}

fn parse_image(v: &Value) -> Result<Image> {
    Ok(Image {
        kind: MediaType::Image,
        md5: v["md5"].as_str().map(String::from),
        id: id_value(required(v, "id", "image")?, "image.id")?,
        revision_id: match &v["revision_id"] {
            Value::Null => None,
            id => Some(id_value(id, "image.revision_id")?),
        },
        width: dimension(&v["width"]),
        height: dimension(&v["height"]),
        src: string(required(v, "src", "image")?, "image.src")?,
        data: None,
    })
}

fn required<'a>(v: &'a Value, key: &str, ctx: &str) -> Result<&'a Value> {
    v.get(key)
        .ok_or_else(|| malformed(&format!("missing `{key}` in {ctx}")))
}

fn optional_array<'a>(v: &'a Value, ctx: &str) -> Result<Option<&'a Vec<Value>>> {
    match v {
        Value::Null => Ok(None),
        Value::Array(arr) => Ok(Some(arr)),
        _ => Err(malformed(&format!("{ctx} is not an array"))),
    }
}

fn string(v: &Value, ctx: &str) -> Result<String> {
    v.as_str()
        .map(String::from)
        .ok_or_else(|| malformed(&format!("{ctx} is not a string")))
}

/// Non-negative integer, sent either as a number or a numeric string.
fn id_value(v: &Value, ctx: &str) -> Result<u64> {
    v.as_u64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| malformed(&format!("{ctx} is not a non-negative integer")))
}

fn int_value(v: &Value, ctx: &str) -> Result<i64> {
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| malformed(&format!("{ctx} is not an integer")))
}

fn dimension(v: &Value) -> u32 {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn malformed(msg: &str) -> SnapticError {
    SnapticError::MalformedResponse(msg.to_owned())
}
