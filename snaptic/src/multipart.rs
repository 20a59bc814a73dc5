//! `multipart/form-data` body encoding for image uploads.
//!
//! Body layout (CRLF line endings):
//!
//! ```text
//! --<boundary>
//! Content-Disposition: form-data; name="image"; filename="a.jpg"
//! Content-Type: image/jpeg
//!
//! <raw bytes>
//! --<boundary>--
//! ```
//!
//! The boundary is fixed. File content is not scanned for it. Quotes and line
//! breaks in field and file names are percent-encoded so they cannot end the
//! quoted string or the header line.

/// Boundary token separating parts.
pub const BOUNDARY: &str = "----------ThIs_Is_tHe_bouNdaRY_$";

const CRLF: &[u8] = b"\r\n";

/// One file part of a multipart body.
#[derive(Debug, Clone, Copy)]
pub struct FilePart<'a> {
    /// Form field name (`image` for note attachments).
    pub field: &'a str,
    /// File name reported to the server; also drives the part's content type.
    pub filename: &'a str,
    /// Raw file content.
    pub data: &'a [u8],
}

/// An encoded multipart body and its matching `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Encode `files` into a single `multipart/form-data` body.
pub fn encode(files: &[FilePart<'_>]) -> MultipartBody {
    let mut body = Vec::with_capacity(files.iter().map(|f| f.data.len() + 256).sum());
    for part in files {
        push_line(&mut body, format!("--{BOUNDARY}").as_bytes());
        push_line(
            &mut body,
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                escape_quoted(part.field),
                escape_quoted(part.filename)
            )
            .as_bytes(),
        );
        push_line(
            &mut body,
            format!("Content-Type: {}", content_type_for(part.filename)).as_bytes(),
        );
        push_line(&mut body, b"");
        push_line(&mut body, part.data);
    }
    push_line(&mut body, format!("--{BOUNDARY}--").as_bytes());

    MultipartBody {
        content_type: format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
    }
}

/// Guess a MIME type from the file name, falling back to
/// `application/octet-stream`.
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_owned()
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn push_line(buf: &mut Vec<u8>, line: &[u8]) {
    buf.extend_from_slice(line);
    buf.extend_from_slice(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_image_part_layout() {
        let encoded = encode(&[FilePart {
            field: "image",
            filename: "a.jpg",
            data: b"DATA",
        }]);

        let expected = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"a.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\
             \r\n\
             DATA\r\n\
             --{BOUNDARY}--\r\n"
        );
        assert_eq!(String::from_utf8(encoded.body).unwrap(), expected);
        assert_eq!(
            encoded.content_type,
            format!("multipart/form-data; boundary={BOUNDARY}")
        );
    }

    #[test]
    fn binary_payload_is_kept_verbatim() {
        let data = [0u8, 0xff, 0x10, b'\r', b'\n'];
        let encoded = encode(&[FilePart {
            field: "image",
            filename: "raw.png",
            data: &data,
        }]);
        assert!(
            encoded
                .body
                .windows(data.len())
                .any(|w| w == data.as_slice())
        );
    }

    #[test]
    fn parts_keep_their_order() {
        let encoded = encode(&[
            FilePart {
                field: "first",
                filename: "1.png",
                data: b"one",
            },
            FilePart {
                field: "second",
                filename: "2.gif",
                data: b"two",
            },
        ]);
        let text = String::from_utf8(encoded.body).unwrap();
        let first = text.find("name=\"first\"").unwrap();
        let second = text.find("name=\"second\"").unwrap();
        assert!(first < second);
        assert_eq!(text.matches(&format!("--{BOUNDARY}\r\n")).count(), 2);
        assert!(text.contains("Content-Type: image/gif"));
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(content_type_for("blob.zzzunknown"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn quotes_and_line_breaks_in_file_name_are_escaped() {
        let encoded = encode(&[FilePart {
            field: "image",
            filename: "a\"; name=\"evil.jpg\r\nX-Injected: 1",
            data: b"DATA",
        }]);
        let text = String::from_utf8(encoded.body).unwrap();
        let disposition = text.lines().nth(1).unwrap();
        assert_eq!(
            disposition,
            "Content-Disposition: form-data; name=\"image\"; \
             filename=\"a%22; name=%22evil.jpg%0D%0AX-Injected: 1\""
        );
        assert!(!text.contains("name=\"evil.jpg\""));
        assert!(!text.lines().any(|l| l.starts_with("X-Injected")));
    }

    #[test]
    fn empty_file_list_is_just_terminator() {
        let encoded = encode(&[]);
        assert_eq!(encoded.body, format!("--{BOUNDARY}--\r\n").into_bytes());
    }
}
