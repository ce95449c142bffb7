//! The record describing a stored asset.
//!
//! An [`Asset`] is produced once per successfully stored data URI and never
//! changes afterwards. `file_name` and `file_url` are derived from the id, the
//! extension and the store's base URL; there are no setters for them. The
//! record is written out as JSON but never read back, so the only way to get
//! one is [`Asset::image`].

use crate::naming::{asset_file_name, asset_url};
use serde::Serialize;

/// `asset_type` tag for images.
pub const ASSET_TYPE_IMAGE: i32 = 1;

/// A persisted, externally reachable file plus its metadata.
///
/// Serialized field names match the JSON payloads downstream consumers read:
/// `id, name, owner_id, asset_type, file_name, file_url, thumbnail_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    id: String,
    name: String,
    owner_id: String,
    asset_type: i32,
    file_name: String,
    file_url: String,
    thumbnail_url: String,
}

impl Asset {
    /// Build the record for an image stored as `<id>.<extension>` under `base_url`.
    ///
    /// The name defaults to the id; owner and thumbnail are left empty for
    /// other collaborators to fill in on their own records.
    pub fn image(id: &str, extension: &str, base_url: &str) -> Self {
        let file_name = asset_file_name(id, extension);
        let file_url = asset_url(base_url, &file_name);
        Self {
            id: id.to_string(),
            name: id.to_string(),
            owner_id: String::new(),
            asset_type: ASSET_TYPE_IMAGE,
            file_name,
            file_url,
            thumbnail_url: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn asset_type(&self) -> i32 {
        self.asset_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_url(&self) -> &str {
        &self.file_url
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }
}
