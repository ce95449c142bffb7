//! Persisting decoded data URIs as files.
//!
//! [`AssetStore::save`] is the single place where a data URI turns into a file
//! on disk. The sequence for an image data URI is:
//!
//! ```text
//! classify → next id → decode → write <storage_dir>/<id>.<ext> → Asset
//! ```
//!
//! Input without the `data:image/` header is not an error: the store answers
//! [`SaveOutcome::Skipped`] and the caller keeps its original reference.
//! Codec errors surface before any file is touched, so a malformed data URI
//! never leaves anything behind.
//!
//! The store holds only immutable configuration and a thread-safe id supplier.
//! A single instance can serve many threads at once; each successful call
//! writes exactly one uniquely named file.

use crate::asset::Asset;
use crate::config::StoreConfig;
use crate::data_uri::{self, CodecError};
use crate::naming::{IdSupplier, UuidIds, asset_file_name};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of a successful [`DataUriSaver::save`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The data URI was decoded and written; here is its record.
    Saved(Asset),
    /// The input was not an image data URI. Nothing was written.
    Skipped,
}

/// Anything that can turn a `src`-style string into a stored asset.
///
/// [`AssetStore`] is the production implementation; the rewriter and the JSON
/// adapter only depend on this trait.
pub trait DataUriSaver: Send + Sync {
    fn save(&self, src: &str) -> Result<SaveOutcome, StoreError>;
}

/// Writes decoded images into a storage directory.
#[derive(Debug, Clone)]
pub struct AssetStore<I = UuidIds> {
    config: StoreConfig,
    ids: I,
}

impl AssetStore<UuidIds> {
    /// Store with random UUID ids.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_ids(config, UuidIds)
    }
}

impl<I: IdSupplier> AssetStore<I> {
    pub fn with_ids(config: StoreConfig, ids: I) -> Self {
        Self { config, ids }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.config.storage_dir
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Decode `src` and write it to the storage directory.
    ///
    /// Returns [`SaveOutcome::Skipped`] without touching the filesystem when
    /// `src` is not an image data URI.
    pub fn save(&self, src: &str) -> Result<SaveOutcome, StoreError> {
        if !data_uri::is_image_data_uri(src) {
            return Ok(SaveOutcome::Skipped);
        }

        let extension = data_uri::classify(src.as_bytes())?;
        let id = self.ids.next_id();
        let raw = data_uri::decode(src.as_bytes())?;

        let path = self
            .config
            .storage_dir
            .join(asset_file_name(&id, &extension));
        write_asset_file(&path, &raw).map_err(|source| StoreError::WriteFailure {
            path: path.clone(),
            source,
        })?;

        let asset = Asset::image(&id, &extension, &self.config.base_url);
        tracing::debug!(
            id = asset.id(),
            path = %path.display(),
            bytes = raw.len(),
            "stored data URI"
        );
        Ok(SaveOutcome::Saved(asset))
    }
}

impl<I: IdSupplier> DataUriSaver for AssetStore<I> {
    fn save(&self, src: &str) -> Result<SaveOutcome, StoreError> {
        AssetStore::save(self, src)
    }
}

/// Create or truncate `path` and write `bytes`, mode 0644 on unix.
fn write_asset_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.flush()
}
