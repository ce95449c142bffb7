//! Rewriting inline images in HTML fragments.
//!
//! [`rewrite_images`] walks every `<img>` in document order and hands its
//! `src` to a [`DataUriSaver`]:
//!
//! | Saver answer | Effect on the element |
//! |--------------|-----------------------|
//! | `Saved(asset)` | `src` becomes `asset.file_url()` |
//! | `Skipped` | untouched |
//! | error | traversal stops, the whole call fails |
//!
//! # All or nothing
//!
//! A failed call never returns partially rewritten HTML: the
//! [`RewriteError`] carries the original input text, untouched. Files the
//! saver already wrote for earlier elements stay on disk; they are reported in
//! a `warn` log line but not removed.
//!
//! # Output shape
//!
//! The result is the serialized *contents of `<body>`* only. Head, doctype
//! and the `<html>` wrapper are not round-tripped. Callers feed fragments
//! (rich-text editor output, comment bodies) and get fragments back.

use crate::asset::Asset;
use crate::store::{DataUriSaver, SaveOutcome, StoreError};
use kuchikiki::traits::TendrilSink;
use kuchikiki::{ElementData, NodeDataRef, NodeRef};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HtmlError {
    #[error("HTML parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A failed rewrite, holding the input exactly as it was passed in.
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct RewriteError {
    original: String,
    #[source]
    kind: HtmlError,
}

impl RewriteError {
    fn new(original: &str, kind: HtmlError) -> Self {
        Self {
            original: original.to_string(),
            kind,
        }
    }

    /// The unmodified input text.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn into_original(self) -> String {
        self.original
    }

    pub fn kind(&self) -> &HtmlError {
        &self.kind
    }
}

/// A parsed HTML document.
pub struct Document {
    root: NodeRef,
}

/// Handle to one `<img>` element of a [`Document`].
pub struct ImageElement {
    node: NodeDataRef<ElementData>,
}

impl ImageElement {
    /// The `src` attribute, or `""` when absent.
    pub fn src(&self) -> String {
        self.node
            .attributes
            .borrow()
            .get("src")
            .unwrap_or_default()
            .to_string()
    }

    pub fn set_src(&self, value: &str) {
        self.node
            .attributes
            .borrow_mut()
            .insert("src", value.to_string());
    }
}

impl Document {
    /// Parse HTML text. Missing `<html>`/`<body>` wrappers are synthesized.
    pub fn parse(html: &str) -> Result<Self, HtmlError> {
        let root = kuchikiki::parse_html().one(html);
        Ok(Self { root })
    }

    /// All `<img>` elements in document order.
    pub fn images(&self) -> Result<Vec<ImageElement>, HtmlError> {
        let selection = self
            .root
            .select("img")
            .map_err(|()| HtmlError::Parse("cannot select img elements".into()))?;
        Ok(selection.map(|node| ImageElement { node }).collect())
    }

    /// Serialize the children of `<body>`.
    pub fn body_html(&self) -> Result<String, HtmlError> {
        let body = self
            .root
            .select_first("body")
            .map_err(|()| HtmlError::Parse("document has no body".into()))?;
        let mut out = Vec::new();
        for child in body.as_node().children() {
            child
                .serialize(&mut out)
                .map_err(|e| HtmlError::Parse(e.to_string()))?;
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// Result of a successful rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Serialized `<body>` contents.
    pub html: String,
    /// Assets stored for rewritten elements, in document order.
    pub saved: Vec<Asset>,
    /// Number of `<img>` elements left as they were.
    pub skipped: usize,
}

/// Replace data URI `src` attributes with stored asset URLs.
///
/// See the [module docs](self) for the failure contract.
pub fn rewrite_images<S>(html: &str, saver: &S) -> Result<String, RewriteError>
where
    S: DataUriSaver + ?Sized,
{
    rewrite_document(html, saver).map(|r| r.html)
}

/// [`rewrite_images`], also reporting which assets were stored.
pub fn rewrite_document<S>(html: &str, saver: &S) -> Result<Rewritten, RewriteError>
where
    S: DataUriSaver + ?Sized,
{
    let fail = |kind: HtmlError| RewriteError::new(html, kind);

    let document = Document::parse(html).map_err(fail)?;
    let images = document.images().map_err(fail)?;

    let mut saved = Vec::new();
    let mut skipped = 0;
    for image in &images {
        let src = image.src();
        match saver.save(&src) {
            Ok(SaveOutcome::Saved(asset)) => {
                image.set_src(asset.file_url());
                saved.push(asset);
            }
            Ok(SaveOutcome::Skipped) => {
                let src = truncate_src(&src);
                tracing::debug!(src, "img left unchanged");
                skipped += 1;
            }
            Err(err) => {
                if !saved.is_empty() {
                    let files: Vec<&str> = saved.iter().map(Asset::file_name).collect();
                    tracing::warn!(?files, "rewrite aborted; stored files are kept");
                }
                return Err(fail(err.into()));
            }
        }
    }

    let html = document.body_html().map_err(fail)?;
    Ok(Rewritten {
        html,
        saved,
        skipped,
    })
}

/// Keep log lines short when a `src` is a long URL.
fn truncate_src(src: &str) -> &str {
    match src.char_indices().nth(80) {
        Some((idx, _)) => &src[..idx],
        None => src,
    }
}
