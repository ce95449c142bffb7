//! # inline-assets
//!
//! Turns images embedded as data URIs into stored files and URLs.
//!
//! Producers (rich-text editors, mobile clients) often embed images directly
//! in the content they send: an `<img src="data:image/png;base64,...">` in an
//! HTML body, or a `{"data": "data:image/..."}` field in JSON. This crate
//! decodes those payloads, writes each one to the upload directory under a
//! fresh unique name, and rewrites the reference to the file's public URL, so
//! downstream consumers only ever see lightweight links.
//!
//! ```text
//! <img src="data:image/png;base64,iVBOR...">
//!        │ decode + write uploads/3f2c...e1.png
//!        ▼
//! <img src="http://localhost:8080/uploads/3f2c...e1.png">
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`data_uri`] | Data URI codec: detect, classify (extension), decode |
//! | [`naming`] | Id supplier and the `<id>.<ext>` / `<base>/<file>` naming rules |
//! | [`asset`] | The immutable [`Asset`](asset::Asset) record of a stored file |
//! | [`store`] | [`AssetStore`](store::AssetStore): data URI → file on disk → `Asset` |
//! | [`html`] | Rewrites every `<img src>` of an HTML fragment, all or nothing |
//! | [`json`] | Same, for a single `ImageData` JSON object |
//! | [`batch`] | Parallel rewriting of many HTML files |
//! | [`config`] | `config.toml` loading and the `Environment` of named paths/URLs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Skipped Is Not an Error
//!
//! A `src` that is already a URL is the common case, not a failure. The store
//! answers [`SaveOutcome::Skipped`](store::SaveOutcome::Skipped) for it, which
//! keeps "leave this alone" separate from real errors in every caller.
//!
//! ## Strict Wire Format
//!
//! Only `data:image/<subtype>;base64,<payload>` is accepted. A data URI with
//! extra media-type parameters (`;charset=...`) is rejected rather than
//! guessed at, so nothing half-understood ever reaches the upload directory.
//!
//! ## No Rollback
//!
//! When the n-th image of a document fails, the caller gets the original
//! document back, but files already written for images 1..n-1 stay on disk.
//! They are unreferenced, harmless, and logged; cleaning the upload directory
//! is left to whoever owns it.
//!
//! ## Configuration Is a Value
//!
//! Storage directory and base URL are captured once in a
//! [`StoreConfig`](config::StoreConfig) when the store is built. There is no
//! global state, so one store can be shared by reference across threads.

pub mod asset;
pub mod batch;
pub mod config;
pub mod data_uri;
pub mod html;
pub mod json;
pub mod naming;
pub mod output;
pub mod store;

pub use asset::Asset;
pub use config::{Environment, StoreConfig};
pub use html::{RewriteError, rewrite_images};
pub use json::{ImageData, extract_image};
pub use store::{AssetStore, DataUriSaver, SaveOutcome, StoreError};

#[cfg(test)]
pub(crate) mod test_helpers;
