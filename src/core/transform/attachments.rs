//! Attachment re-linking
//!
//! Result attachments cannot be copied across projects, so they are
//! appended to the comment as Markdown links to the original files.

use crate::domain::Attachment;
use std::fmt::Write;

/// Percent-decode a filename using query-string rules
///
/// `+` decodes to a space and every `%` must be followed by two hex
/// digits. Decoded bytes that are not valid UTF-8 become U+FFFD.
///
/// # Errors
///
/// Returns a description of the first malformed escape.
pub fn decode_filename(raw: &str) -> Result<String, String> {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes
                    .get(i + 1..i + 3)
                    .ok_or_else(|| format!("truncated escape at byte {i}"))?;
                match (hex_value(escape[0]), hex_value(escape[1])) {
                    (Some(high), Some(low)) => decoded.push(high << 4 | low),
                    _ => {
                        return Err(format!(
                            "invalid escape '%{}' at byte {i}",
                            String::from_utf8_lossy(escape)
                        ))
                    }
                }
                i += 3;
            }
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            byte => {
                decoded.push(byte);
                i += 1;
            }
        }
    }

    Ok(String::from_utf8_lossy(&decoded).into_owned())
}

fn hex_value(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).map(|d| d as u8)
}

/// Append one `\n\n[name](url)` link per attachment, in order
///
/// Filenames that fail to decode are used as they are.
pub fn link_attachments(comment: &str, attachments: &[Attachment]) -> String {
    let mut linked = comment.to_string();

    for attachment in attachments {
        let name = decode_filename(&attachment.filename).unwrap_or_else(|error| {
            tracing::warn!(
                filename = %attachment.filename,
                error = %error,
                "Could not decode attachment filename, using it as is"
            );
            attachment.filename.clone()
        });
        let _ = write!(linked, "\n\n[{name}]({})", attachment.url);
    }

    linked
}
