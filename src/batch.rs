//! Rewriting many HTML files at once.
//!
//! Each file is an independent [`rewrite_document`] call, so files are
//! processed in parallel using [rayon](https://docs.rs/rayon). A failure in
//! one file does not affect the others: every file gets its own
//! [`FileResult`], in the order the files were given.
//!
//! Directories are walked recursively for `.html` and `.htm` files.

use crate::html::{RewriteError, Rewritten, rewrite_document};
use crate::store::DataUriSaver;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{}: {source}", path.display())]
    Rewrite {
        path: PathBuf,
        #[source]
        source: RewriteError,
    },
}

/// Outcome of rewriting one file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub outcome: Result<Rewritten, BatchError>,
}

/// Expand `inputs` into a list of HTML files.
///
/// Files are taken as given, whatever their extension. Directories contribute
/// their `.html`/`.htm` files, sorted by path.
pub fn collect_html_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(input) {
            let entry = entry?;
            if entry.file_type().is_file() && is_html(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

/// Rewrite every file in parallel.
///
/// With `in_place`, successful results are written back to their file;
/// failed files are never touched.
pub fn rewrite_files<S>(files: &[PathBuf], saver: &S, in_place: bool) -> Vec<FileResult>
where
    S: DataUriSaver + ?Sized,
{
    files
        .par_iter()
        .map(|path| FileResult {
            path: path.clone(),
            outcome: rewrite_file(path, saver, in_place),
        })
        .collect()
}

fn rewrite_file<S>(path: &Path, saver: &S, in_place: bool) -> Result<Rewritten, BatchError>
where
    S: DataUriSaver + ?Sized,
{
    let html = fs::read_to_string(path)?;
    let rewritten = rewrite_document(&html, saver).map_err(|source| BatchError::Rewrite {
        path: path.to_path_buf(),
        source,
    })?;
    if in_place {
        fs::write(path, &rewritten.html)?;
    }
    Ok(rewritten)
}
