//! Data URI codec for inline images.
//!
//! Only one shape is accepted, byte for byte:
//!
//! ```text
//! data:image/<subtype>;base64,<payload>
//! ```
//!
//! The subtype becomes the file extension of the stored asset after a small
//! normalization step:
//!
//! | Subtype | Extension |
//! |---------|-----------|
//! | `jpeg` | `jpg` |
//! | `svg`, `svg+xml`, ... | `svg` |
//! | anything else | unchanged (case-sensitive) |
//!
//! The transfer encoding must be the literal `;base64,` directly after the
//! subtype. Extra media-type parameters (`;charset=utf-8;base64,`) are
//! rejected as [`CodecError::UnsupportedEncoding`] rather than skipped over.
//!
//! Both [`classify`] and [`decode`] are pure; nothing here touches storage.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

/// The byte sequence every image data URI starts with.
pub const IMAGE_DATA_URI_HEADER: &str = "data:image/";

/// The only supported transfer encoding, including its delimiters.
const BASE64_MARKER: &[u8] = b";base64,";

/// Standard alphabet, padding required, non-zero trailing bits in the final
/// symbol accepted.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("data is not an image data URI")]
    NotADataUri,
    #[error("data URI has no ';' after the media subtype")]
    MissingMimeDelimiter,
    #[error("data URI transfer encoding is not ';base64,'")]
    UnsupportedEncoding,
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Whether `text` starts with the image data URI header.
pub fn is_image_data_uri(text: &str) -> bool {
    text.starts_with(IMAGE_DATA_URI_HEADER)
}

/// Return the normalized file extension of an image data URI.
///
/// - `data:image/jpeg;base64,...` → `"jpg"`
/// - `data:image/svg+xml;base64,...` → `"svg"`
/// - `data:image/png;base64,...` → `"png"`
pub fn classify(data: &[u8]) -> Result<String, CodecError> {
    let (subtype, _) = split_header(data)?;
    Ok(normalize_subtype(&String::from_utf8_lossy(subtype)))
}

/// Decode the payload of an image data URI into raw bytes.
///
/// Trailing NUL bytes are stripped from the decoded output, so payloads that
/// legitimately end in `0x00` do not survive a round trip.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let (_, rest) = split_header(data)?;
    let payload = rest
        .strip_prefix(BASE64_MARKER)
        .ok_or(CodecError::UnsupportedEncoding)?;

    let mut raw = PAYLOAD_ENGINE.decode(payload)?;
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    raw.truncate(end);
    Ok(raw)
}

/// Split a data URI into its subtype and everything from the first `;` on.
fn split_header(data: &[u8]) -> Result<(&[u8], &[u8]), CodecError> {
    let src = data
        .strip_prefix(IMAGE_DATA_URI_HEADER.as_bytes())
        .ok_or(CodecError::NotADataUri)?;
    let idx = src
        .iter()
        .position(|&b| b == b';')
        .ok_or(CodecError::MissingMimeDelimiter)?;
    Ok(src.split_at(idx))
}

fn normalize_subtype(subtype: &str) -> String {
    if subtype == "jpeg" {
        "jpg".to_string()
    } else if subtype.starts_with("svg") {
        "svg".to_string()
    } else {
        subtype.to_string()
    }
}
