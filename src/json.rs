//! Single-image JSON payloads.
//!
//! Some producers send one image as a small JSON object instead of HTML:
//!
//! ```json
//! { "data": "data:image/png;base64,iVBORw0...", "name": "avatar.png", "size": 2048 }
//! ```
//!
//! [`extract_image`] stores the data URI through the same [`DataUriSaver`] the
//! HTML rewriter uses and puts the asset URL back into `data`. A `data` value
//! that is already a URL passes through unchanged.

use crate::config::{Environment, StoreConfig};
use crate::data_uri;
use crate::store::{AssetStore, DataUriSaver, SaveOutcome, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonImageError {
    #[error("JSON error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An image carried inline in a JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageData {
    /// A data URI on input; the stored asset URL on output.
    pub data: String,
    pub name: String,
    pub size: i64,
}

/// Store the data URI in `raw` and return the payload pointing at its URL.
///
/// An empty `raw` or a JSON `null` yields an empty [`ImageData`] and stores
/// nothing.
pub fn extract_image<S>(raw: &[u8], saver: &S) -> Result<ImageData, JsonImageError>
where
    S: DataUriSaver + ?Sized,
{
    if raw.is_empty() {
        return Ok(ImageData::default());
    }

    let Some(mut image) = serde_json::from_slice::<Option<ImageData>>(raw)? else {
        return Ok(ImageData::default());
    };
    if !data_uri::is_image_data_uri(&image.data) {
        return Ok(image);
    }

    if let SaveOutcome::Saved(asset) = saver.save(&image.data)? {
        image.data = asset.file_url().to_string();
    }
    Ok(image)
}

/// [`extract_image`] with a store configured from `env`.
pub fn save_image_data(env: &Environment, raw: &[u8]) -> Result<ImageData, JsonImageError> {
    let store = AssetStore::new(StoreConfig::from_environment(env));
    extract_image(raw, &store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_uri::CodecError;
    use crate::test_helpers::{BASE_URL, FailOnCall, data_uri, file_count, temp_store};
    use std::collections::BTreeMap;
    use std::fs;

    #[test]
    fn empty_payload_is_noop() {
        let (tmp, store) = temp_store();
        assert_eq!(extract_image(b"", &store).unwrap(), ImageData::default());
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[test]
    fn null_payload_is_noop() {
        let (tmp, store) = temp_store();
        assert_eq!(extract_image(b"null", &store).unwrap(), ImageData::default());
        assert_eq!(extract_image(b" null\n", &store).unwrap(), ImageData::default());
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[test]
    fn data_uri_is_replaced_with_url() {
        let (tmp, store) = temp_store();
        let payload = serde_json::json!({
            "data": data_uri("png", b"avatar"),
            "name": "avatar.png",
            "size": 6,
        });

        let image = extract_image(payload.to_string().as_bytes(), &store).unwrap();
        assert!(image.data.starts_with(&format!("{BASE_URL}/")));
        assert_eq!(image.name, "avatar.png");
        assert_eq!(image.size, 6);

        let file_name = image.data.rsplit('/').next().unwrap();
        assert_eq!(fs::read(tmp.path().join(file_name)).unwrap(), b"avatar");
    }

    #[test]
    fn accepts_trait_object_saver() {
        let (tmp, store) = temp_store();
        let saver: &dyn DataUriSaver = &store;
        let payload = serde_json::json!({ "data": data_uri("gif", b"GIF89a") });

        let image = extract_image(payload.to_string().as_bytes(), saver).unwrap();
        assert!(image.data.ends_with(".gif"));
        assert_eq!(file_count(tmp.path()), 1);
    }

    #[test]
    fn url_passes_through_unchanged() {
        let (tmp, store) = temp_store();
        let raw = br#"{"data":"https://example.com/cat.png","name":"cat","size":1}"#;

        let image = extract_image(raw, &store).unwrap();
        assert_eq!(image.data, "https://example.com/cat.png");
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[test]
    fn non_image_data_uri_passes_through() {
        let (tmp, store) = temp_store();
        let raw = br#"{"data":"data:text/plain;base64,aGk="}"#;

        let image = extract_image(raw, &store).unwrap();
        assert_eq!(image.data, "data:text/plain;base64,aGk=");
        assert_eq!(file_count(tmp.path()), 0);
    }

    #[test]
    fn missing_fields_default() {
        let (_tmp, store) = temp_store();
        let image = extract_image(b"{}", &store).unwrap();
        assert_eq!(image, ImageData::default());
    }

    #[test]
    fn invalid_json_is_deserialize_error() {
        let (_tmp, store) = temp_store();
        assert!(matches!(
            extract_image(b"{not json", &store),
            Err(JsonImageError::Deserialize(_))
        ));
    }

    #[test]
    fn malformed_data_uri_is_store_error() {
        let (_tmp, store) = temp_store();
        let raw = br#"{"data":"data:image/png;utf8,abc"}"#;
        assert!(matches!(
            extract_image(raw, &store),
            Err(JsonImageError::Store(StoreError::Codec(
                CodecError::UnsupportedEncoding
            )))
        ));
    }

    #[test]
    fn saver_failure_propagates() {
        let (_tmp, store) = temp_store();
        let saver = FailOnCall::new(store, 1);
        let payload = serde_json::json!({ "data": data_uri("png", b"x") });
        assert!(matches!(
            extract_image(payload.to_string().as_bytes(), &saver),
            Err(JsonImageError::Store(StoreError::WriteFailure { .. }))
        ));
    }

    #[test]
    fn save_image_data_uses_environment() {
        let tmp = tempfile::TempDir::new().unwrap();
        let env = Environment {
            paths: BTreeMap::from([(
                "upload".to_string(),
                tmp.path().to_string_lossy().into_owned(),
            )]),
            urls: BTreeMap::from([
                ("base_url".to_string(), "https://site.test".to_string()),
                ("upload".to_string(), "/media".to_string()),
            ]),
        };
        let payload = serde_json::json!({ "data": data_uri("jpeg", b"jfif") });

        let image = save_image_data(&env, payload.to_string().as_bytes()).unwrap();
        assert!(image.data.starts_with("https://site.test/media/"));
        assert!(image.data.ends_with(".jpg"));
        assert_eq!(file_count(tmp.path()), 1);
    }
}
