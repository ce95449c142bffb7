//! CLI output formatting.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.
//!
//! ## Batch rewrite
//!
//! ```text
//! 001 pages/index.html (2 stored, 1 unchanged)
//!     3f2c…e1.png
//!     9ab0…47.jpg
//! 002 pages/about.html failed: data URI transfer encoding is not ';base64,'
//!
//! Stored 2 images in 1 of 2 files
//! ```
//!
//! ## Rewritten documents
//!
//! Without `--in-place` the rewritten HTML goes to stdout. A single document is
//! printed bare; with several, each is preceded by a `==> path <==` line.
//! Failed files print nothing here.

use crate::batch::FileResult;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Format the per-file report of a batch rewrite.
pub fn format_batch_output(results: &[FileResult]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stored = 0;
    let mut succeeded = 0;

    for (i, result) in results.iter().enumerate() {
        let header = format!("{} {}", format_index(i + 1), result.path.display());
        match &result.outcome {
            Ok(rewritten) => {
                lines.push(format!(
                    "{} ({} stored, {} unchanged)",
                    header,
                    rewritten.saved.len(),
                    rewritten.skipped
                ));
                for asset in &rewritten.saved {
                    lines.push(format!("{}{}", indent(1), asset.file_name()));
                }
                stored += rewritten.saved.len();
                succeeded += 1;
            }
            Err(err) => lines.push(format!("{} failed: {}", header, err)),
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Stored {} in {} of {}",
        plural(stored, "image", "images"),
        succeeded,
        plural(results.len(), "file", "files")
    ));
    lines
}

pub fn print_batch_output(results: &[FileResult]) {
    for line in format_batch_output(results) {
        println!("{}", line);
    }
}

/// Format rewritten HTML for stdout.
pub fn format_rewritten_documents(results: &[FileResult]) -> Vec<String> {
    let documents: Vec<_> = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|doc| (&r.path, doc)))
        .collect();

    if results.len() == 1 {
        return documents.iter().map(|(_, doc)| doc.html.clone()).collect();
    }

    let mut lines = Vec::new();
    for (i, (path, doc)) in documents.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("==> {} <==", path.display()));
        lines.push(doc.html.clone());
    }
    lines
}

pub fn print_rewritten_documents(results: &[FileResult]) {
    for line in format_rewritten_documents(results) {
        println!("{}", line);
    }
}
