//! `data:` URI helpers.
//!
//! Artifacts and previews travel to the browser and to the content service
//! as `data:<mime>;base64,<payload>` strings.

use base64::{engine::general_purpose::STANDARD, Engine};

/// Build a base64 `data:` URI.
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Decoded payload size of a base64 `data:` URI.
///
/// Only the part after the first comma counts, minus `=` padding, so the
/// header and base64 expansion never inflate the result. Returns 0 when
/// there is no payload.
pub fn payload_size(uri: &str) -> usize {
    let Some((_, payload)) = uri.split_once(',') else {
        return 0;
    };
    let payload = payload.trim_end();
    let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
    (payload.len() * 3 / 4).saturating_sub(padding)
}

/// MIME type declared by a `data:` URI, if any.
pub fn mime_type(uri: &str) -> Option<&str> {
    let header = uri.strip_prefix("data:")?.split_once(',')?.0;
    let mime = header.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// Decode the payload of a base64 `data:` URI.
pub fn decode_payload(uri: &str) -> Option<Vec<u8>> {
    let (header, payload) = uri.strip_prefix("data:")?.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(payload.trim_end()).ok()
}
