//! Centralized naming for stored assets.
//!
//! Every stored asset follows the same two rules:
//!
//! - **File name**: `<id>.<extension>`, e.g. `0f8e...c1.png`
//! - **URL**: `<base_url>/<file name>`, e.g. `https://cdn.example.com/uploads/0f8e...c1.png`
//!
//! Ids come from an [`IdSupplier`]. The store treats ids as opaque strings and
//! relies on the supplier never handing out the same id twice within the
//! process, which is what keeps concurrent writers off each other's files.

use uuid::Uuid;

/// Source of collision-free asset ids.
pub trait IdSupplier: Send + Sync {
    /// Return an id never returned before by this supplier.
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in their 32-character hex form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSupplier for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Canonical file name for an asset id and extension.
pub fn asset_file_name(id: &str, extension: &str) -> String {
    format!("{id}.{extension}")
}

/// Canonical URL of a stored file under `base_url`.
///
/// `base_url` is used verbatim; a trailing slash is not trimmed.
pub fn asset_url(base_url: &str, file_name: &str) -> String {
    format!("{base_url}/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn file_name_joins_id_and_extension() {
        assert_eq!(asset_file_name("abc123", "png"), "abc123.png");
    }

    #[test]
    fn file_name_with_empty_extension_keeps_dot() {
        assert_eq!(asset_file_name("abc123", ""), "abc123.");
    }

    #[test]
    fn url_joins_with_single_slash() {
        assert_eq!(
            asset_url("https://cdn.example.com/uploads", "abc123.png"),
            "https://cdn.example.com/uploads/abc123.png"
        );
    }

    #[test]
    fn url_with_empty_base_is_rooted() {
        assert_eq!(asset_url("", "abc123.png"), "/abc123.png");
    }

    #[test]
    fn uuid_ids_are_filename_safe() {
        let id = UuidIds.next_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn uuid_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| UuidIds.next_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
