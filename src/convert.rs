//! Converts a mirrored HTML tree into plain-text artifacts.
//!
//! Every `*.html` file under the input directory gets a `.txt` twin at the
//! same relative path under the output directory. Each artifact starts with
//! a provenance line `"{company}, {category}\n"` followed by the visible
//! text of the page.

use crate::error::ConvertError;
use crate::parsers::{TextLayout, html_to_text};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// First line of every text artifact
pub fn provenance_header(company: &str, category: &str) -> String {
    format!("{}, {}\n", company, category)
}

/// Converts every HTML file under `input_dir` into a text file under `output_dir`.
///
/// Returns the number of files written. The first unreadable or unwritable
/// file aborts the conversion. A missing `input_dir` converts nothing.
pub fn convert_tree(
    input_dir: &Path,
    output_dir: &Path,
    company: &str,
    category: &str,
    layout: TextLayout,
) -> Result<usize, ConvertError> {
    if !input_dir.is_dir() {
        ::log::debug!("No HTML mirror at {}, nothing to convert", input_dir.display());
        return Ok(0);
    }

    let header = provenance_header(company, category);
    let mut converted = 0;

    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| ConvertError::Walk {
            path: input_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_html_file(entry.path()) {
            continue;
        }

        let output_path = text_path(entry.path(), input_dir, output_dir);
        convert_file(entry.path(), &output_path, &header, layout)?;
        converted += 1;
    }

    ::log::info!(
        "Converted {} HTML files from {} to {}",
        converted,
        input_dir.display(),
        output_dir.display()
    );
    Ok(converted)
}

fn is_html_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".html"))
}

/// Mirrors `html_path` from `input_dir` into `output_dir` with a `.txt` extension
fn text_path(html_path: &Path, input_dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = html_path.strip_prefix(input_dir).unwrap_or(html_path);
    output_dir.join(relative).with_extension("txt")
}

fn convert_file(
    input: &Path,
    output: &Path,
    header: &str,
    layout: TextLayout,
) -> Result<(), ConvertError> {
    let html = fs::read_to_string(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let mut text = String::with_capacity(header.len() + html.len() / 2);
    text.push_str(header);
    text.push_str(&html_to_text(&html, layout));
    text.push('\n');

    let write_error = |source: std::io::Error| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    };
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(output, text).map_err(write_error)?;

    ::log::debug!("Wrote {}", output.display());
    Ok(())
}
