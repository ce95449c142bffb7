//! Shared test utilities for the inline-assets test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, store) = temp_store();
//! let html = format!(r#"<img src="{}">"#, data_uri("png", b"pixels"));
//! rewrite_images(&html, &store).unwrap();
//! assert_eq!(file_count(tmp.path()), 1);
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use crate::config::StoreConfig;
use crate::naming::IdSupplier;
use crate::store::{AssetStore, DataUriSaver, SaveOutcome, StoreError};

/// Base URL used by [`temp_store`].
pub const BASE_URL: &str = "https://cdn.example.com/uploads";

// =========================================================================
// Fixture setup
// =========================================================================

/// A store writing into a fresh temp directory with random ids.
///
/// Keep the `TempDir` alive for as long as the store is used.
pub fn temp_store() -> (TempDir, AssetStore) {
    let tmp = TempDir::new().unwrap();
    let store = AssetStore::new(StoreConfig::new(tmp.path(), BASE_URL));
    (tmp, store)
}

/// Encode `raw` as `data:image/<subtype>;base64,...`.
pub fn data_uri(subtype: &str, raw: &[u8]) -> String {
    format!("data:image/{subtype};base64,{}", STANDARD.encode(raw))
}

/// Number of regular files directly inside `dir`.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .count()
}

/// Whether `name` looks like `<[A-Za-z0-9_-]+>.<ext>`.
pub fn is_filename_safe(name: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty()
        && !ext.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// =========================================================================
// Test doubles
// =========================================================================

/// Ids `asset-1`, `asset-2`, ... in call order.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicUsize,
}

impl IdSupplier for SequentialIds {
    fn next_id(&self) -> String {
        format!("asset-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Delegates to `inner` but fails the `fail_at`-th call (1-based) with a
/// [`StoreError::WriteFailure`], as if the disk had filled up.
pub struct FailOnCall<S> {
    inner: S,
    fail_at: usize,
    calls: AtomicUsize,
}

impl<S> FailOnCall<S> {
    pub fn new(inner: S, fail_at: usize) -> Self {
        Self {
            inner,
            fail_at,
            calls: AtomicUsize::new(0),
        }
    }
}

impl<S: DataUriSaver> DataUriSaver for FailOnCall<S> {
    fn save(&self, src: &str) -> Result<SaveOutcome, StoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_at {
            return Err(StoreError::WriteFailure {
                path: PathBuf::from("/dev/full"),
                source: io::Error::other("no space left on device"),
            });
        }
        self.inner.save(src)
    }
}
