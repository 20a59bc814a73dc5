//! Endpoint paths.
//!
//! Paths are plain concatenations of the version prefix and fixed endpoint
//! fragments; the server matches them literally.
//!
//! | Function          | Path                                  |
//! |-------------------|---------------------------------------|
//! | [`notes`]         | `/v1/notes.json`                      |
//! | [`notes_cursor`]  | `/v1/notes.json?cursor=<n>`           |
//! | [`note`]          | `/v1/notes/<id>.json`                 |
//! | [`note_delete`]   | `/v1/notes/<id>`                      |
//! | [`image_upload`]  | `/v1/images/<id>.json`                |
//! | [`image_view`]    | `/viewImage.action?viewNodeId=<id>`   |
//! | [`user`]          | `/v1/user.json`                       |
//! | [`tags`]          | `/v1/tags/tags.json`                  |

pub const API_VERSION: &str = "v1";

const NOTES_JSON: &str = "/notes.json";
const NOTES: &str = "/notes/";
const TAGS_JSON: &str = "/tags/tags.json";
const IMAGES: &str = "/images/";
const IMAGES_VIEW: &str = "/viewImage.action?viewNodeId=";
const USER_JSON: &str = "/user.json";
const CURSOR: &str = "?cursor=";

fn versioned(fragment: &str) -> String {
    format!("/{API_VERSION}{fragment}")
}

pub fn notes() -> String {
    versioned(NOTES_JSON)
}

pub fn notes_cursor(cursor: i64) -> String {
    format!("{}{CURSOR}{cursor}", notes())
}

pub fn note(id: u64) -> String {
    format!("{}{id}.json", versioned(NOTES))
}

pub fn note_delete(id: u64) -> String {
    format!("{}{id}", versioned(NOTES))
}

pub fn image_upload(note_id: u64) -> String {
    format!("{}{note_id}.json", versioned(IMAGES))
}

/// Image bytes are served outside the versioned API.
pub fn image_view(image_id: u64) -> String {
    format!("{IMAGES_VIEW}{image_id}")
}

pub fn user() -> String {
    versioned(USER_JSON)
}

pub fn tags() -> String {
    versioned(TAGS_JSON)
}
