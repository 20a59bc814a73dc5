//! Notes API.
//!
//! # Endpoints
//!
//! | Method                                  | HTTP                              |
//! |-----------------------------------------|-----------------------------------|
//! | `fetch_notes` / `fetch_raw_json`        | `GET /v1/notes.json`              |
//! | `fetch_notes_from_cursor` / `fetch_raw_cursor` / `fetch_cursor_info` | `GET /v1/notes.json?cursor=<n>` |
//! | `post_note`                             | `POST /v1/notes.json`, `text=<value>` |
//! | `edit_note`                             | `POST /v1/notes/<id>.json`, `text=<value>` |
//! | `delete_note`                           | `DELETE /v1/notes/<id>`           |
//!
//! # Cursors
//!
//! Cursor `-1` is the most recent 20 notes, `1` the 20 before those, and so
//! on. Cursor `0` returns every note in the account.
//!
//! A cursor response carries the window position next to the notes:
//!
//! ```json
//! { "notes": [ ... ], "previous_cursor": -1, "next_cursor": 1, "count": 20 }
//! ```

use crate::client::SnapticClient;
use crate::endpoint;
use crate::error::{Result, SnapticError};
use crate::mapper;
use crate::types::{CursorInfo, Note};

/// A write against the notes endpoints. A create posts bare text; an edit
/// posts the note's own form fields to the note's path.
#[derive(Debug, Clone, Copy)]
enum NoteWrite<'a> {
    Create { text: &'a str },
    Edit { note_id: u64, note: &'a Note },
}

impl<'a> NoteWrite<'a> {
    fn path(&self) -> String {
        match self {
            Self::Create { .. } => endpoint::notes(),
            Self::Edit { note_id, .. } => endpoint::note(*note_id),
        }
    }

    fn fields(&self) -> [(&'static str, &'a str); 1] {
        match *self {
            Self::Create { text } => [("text", text)],
            Self::Edit { note, .. } => note.form_fields(),
        }
    }
}

impl SnapticClient {
    /// Fetch every note in the account and update the notes cache.
    pub fn fetch_notes(&mut self) -> Result<Vec<Note>> {
        let json = self.dispatcher().get(&endpoint::notes())?;
        let notes = mapper::parse_notes(&json)?;
        self.store_notes(&notes);
        Ok(notes)
    }

    /// Like [`fetch_notes`](Self::fetch_notes), but also downloads the bytes
    /// of every attached image into [`Image::data`](crate::types::Image::data).
    ///
    /// Costs one extra request per image.
    pub fn fetch_notes_with_image_data(&mut self) -> Result<Vec<Note>> {
        let json = self.dispatcher().get(&endpoint::notes())?;
        let notes = mapper::parse_notes_with(
            &json,
            Some(|image: &crate::types::Image| self.fetch_image_data(image.id)),
        )?;
        self.store_notes(&notes);
        Ok(notes)
    }

    /// Fetch the notes of one cursor window (at most 20, unless `cursor` is 0).
    ///
    /// Does not touch the notes cache.
    pub fn fetch_notes_from_cursor(&self, cursor: i64) -> Result<Vec<Note>> {
        mapper::parse_notes(&self.fetch_raw_cursor(cursor)?)
    }

    /// Fetch the position metadata of one cursor window.
    pub fn fetch_cursor_info(&self, cursor: i64) -> Result<CursorInfo> {
        mapper::parse_cursor_info(&self.fetch_raw_cursor(cursor)?)
    }

    /// Fetch one cursor window as raw JSON bytes.
    pub fn fetch_raw_cursor(&self, cursor: i64) -> Result<Vec<u8>> {
        self.dispatcher().get(&endpoint::notes_cursor(cursor))
    }

    /// Fetch every note as raw JSON bytes and update the raw JSON cache.
    pub fn fetch_raw_json(&mut self) -> Result<Vec<u8>> {
        let json = self.dispatcher().get(&endpoint::notes())?;
        self.store_raw_json(&json);
        Ok(json)
    }

    /// Create a new note. Returns the server's response body.
    pub fn post_note(&self, text: &str) -> Result<Vec<u8>> {
        self.write_note(NoteWrite::Create { text })
    }

    /// Push the text of an existing note to the server.
    ///
    /// # Errors
    ///
    /// - [`SnapticError::Config`]: the note has no id (e.g. a draft)
    /// - [`SnapticError::Api`]: the server rejected the edit
    pub fn edit_note(&self, note: &Note) -> Result<Vec<u8>> {
        let note_id = note
            .note_id()
            .ok_or_else(|| SnapticError::Config("note has no id; post it first".into()))?;
        self.write_note(NoteWrite::Edit { note_id, note })
    }

    /// Delete a note by id. Returns the server's response body.
    pub fn delete_note(&self, note_id: u64) -> Result<Vec<u8>> {
        self.dispatcher().delete(&endpoint::note_delete(note_id))
    }

    fn write_note(&self, write: NoteWrite<'_>) -> Result<Vec<u8>> {
        let path = write.path();
        tracing::debug!(%path, "writing note");
        self.dispatcher().post_form(&path, &write.fields())
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Credentials;
    use crate::client::SnapticClient;
    use crate::dispatch::form_encode;
    use crate::error::SnapticError;
    use crate::mock::MockTransport;
    use crate::types::Note;
    use reqwest::Method;

    fn client(mock: &MockTransport) -> SnapticClient {
        SnapticClient::with_transport(Credentials::basic("u", "p"), mock.clone()).unwrap()
    }

    fn notes_json(n: usize) -> String {
        let entries: Vec<String> = (1..=n)
            .map(|i| {
                format!(
                    r#"{{"id":{i},"created_at":"c","modified_at":"m","reminder_at":null,
                    "text":"post number {i}","summary":"s","source":"3banana",
                    "source_url":"u","children":0,"tags":[],"media":[]}}"#
                )
            })
            .collect();
        format!(
            r#"{{"notes":[{}],"previous_cursor":-1,"next_cursor":1,"count":{n}}}"#,
            entries.join(",")
        )
    }

    #[test]
    fn fetch_notes_updates_cache() {
        let mock = MockTransport::new();
        mock.respond(200, notes_json(2));
        let mut client = client(&mock);

        let notes = client.fetch_notes().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(client.cached_notes().unwrap(), notes.as_slice());

        // Served from cache.
        assert_eq!(client.notes().unwrap().len(), 2);
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn fetch_notes_malformed_response() {
        let mock = MockTransport::new();
        mock.respond(200, r#"{"user":{}}"#);
        let mut client = client(&mock);
        assert!(matches!(
            client.fetch_notes(),
            Err(SnapticError::MalformedResponse(_))
        ));
        assert!(client.cached_notes().is_none());
    }

    #[test]
    fn cursor_fetch_issues_one_get() {
        let mock = MockTransport::new();
        mock.respond(200, notes_json(20));
        let client = client(&mock);

        let notes = client.fetch_notes_from_cursor(-1).unwrap();
        assert_eq!(notes.len(), 20);

        let reqs = mock.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, Method::GET);
        assert_eq!(reqs[0].path, "/v1/notes.json?cursor=-1");
        assert!(client.cached_notes().is_none());
    }

    #[test]
    fn post_note_goes_to_create_endpoint() {
        let mock = MockTransport::new();
        mock.respond(200, "created");
        let body = client(&mock).post_note("hello").unwrap();
        assert_eq!(body, b"created");

        let reqs = mock.requests();
        let req = &reqs[0];
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/v1/notes.json");
        assert_eq!(req.body, b"text=hello");
    }

    #[test]
    fn edit_note_goes_to_note_endpoint() {
        let mock = MockTransport::new();
        mock.respond(200, notes_json(1)).respond(200, "edited");
        let mut client = client(&mock);

        let mut note = client.fetch_notes().unwrap().remove(0);
        note.set_note_id(42);
        note.text = "x".into();
        client.edit_note(&note).unwrap();

        let reqs = mock.requests();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[1].method, Method::POST);
        assert_eq!(reqs[1].path, "/v1/notes/42.json");
        assert_eq!(reqs[1].body, b"text=x");
    }

    #[test]
    fn edit_sends_the_note_form_fields() {
        let mock = MockTransport::new();
        mock.respond(200, notes_json(1)).respond(200, "edited");
        let mut client = client(&mock);

        let mut note = client.fetch_notes().unwrap().remove(0);
        note.text = "milk & eggs".into();
        note.summary = "ignored".into();
        client.edit_note(&note).unwrap();

        let expected = form_encode(&note.form_fields());
        let reqs = mock.requests();
        assert_eq!(reqs[1].path, "/v1/notes/1.json");
        assert_eq!(reqs[1].body, expected.as_bytes());
        assert_eq!(reqs[1].body, b"text=milk%20%26%20eggs");
    }

    #[test]
    fn local_edits_do_not_touch_server_or_cache() {
        let mock = MockTransport::new();
        mock.respond(200, notes_json(1));
        let mut client = client(&mock);

        let mut notes = client.fetch_notes().unwrap();
        notes[0].text = "changed locally".into();
        assert_eq!(client.cached_notes().unwrap()[0].text, "post number 1");
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn edit_without_id_is_config_error() {
        let mock = MockTransport::new();
        let err = client(&mock).edit_note(&Note::draft("x")).unwrap_err();
        assert!(matches!(err, SnapticError::Config(_)));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn delete_note_path() {
        let mock = MockTransport::new();
        mock.respond(200, "");
        client(&mock).delete_note(7).unwrap();
        let reqs = mock.requests();
        let req = &reqs[0];
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.path, "/v1/notes/7");
    }

    #[test]
    fn delete_note_not_found() {
        let mock = MockTransport::new();
        mock.respond(404, "not found");
        let err = client(&mock).delete_note(7).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.response_body(), Some(&b"not found"[..]));
    }

    #[test]
    fn fetch_notes_with_image_data_fetches_each_image() {
        let mock = MockTransport::new();
        mock.respond(
            200,
            r#"{"notes":[{"id":1,"created_at":"c","modified_at":"m","text":"t",
                "media":[{"type":"image","id":5,"src":"/x"},{"type":"image","id":6,"src":"/y"}]}]}"#,
        )
        .respond(200, "five")
        .respond(200, "six");
        let mut client = client(&mock);

        let notes = client.fetch_notes_with_image_data().unwrap();
        assert_eq!(notes[0].media[0].data.as_deref(), Some(&b"five"[..]));
        assert_eq!(notes[0].media[1].data.as_deref(), Some(&b"six"[..]));

        let paths: Vec<String> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            [
                "/v1/notes.json",
                "/viewImage.action?viewNodeId=5",
                "/viewImage.action?viewNodeId=6"
            ]
        );
    }
}
