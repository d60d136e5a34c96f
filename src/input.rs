//! Document discovery and heading extraction.
//!
//! Paths given on the command line may be files or directories; directories are walked
//! recursively for files matching the configured extensions. Each document is parsed with
//! tree-sitter and every captured heading becomes a [`Section`] spanning up to the next heading.

use crate::error::{Result, SpyError};
use crate::formats::Format;
use crate::section::Section;
use std::fs;
use std::path::{Path, PathBuf};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Collect documents under `paths` whose extension is one of `extensions`, sorted per directory.
///
/// An empty `paths` scans the working directory. Files named explicitly are kept whatever their
/// extension.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub fn find_documents(paths: Vec<PathBuf>, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let paths = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };

    let mut documents = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(&path, extensions, &mut documents)?;
        } else if path.is_file() {
            documents.push(path);
        } else {
            return Err(SpyError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
    }
    Ok(documents)
}

fn walk(dir: &Path, extensions: &[String], documents: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, extensions, documents)?;
        } else if has_extension(&path, extensions) {
            documents.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

/// Read `path` and extract its sections.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn extract_sections(path: &Path, format: &impl Format) -> Result<Vec<Section>> {
    let text = fs::read_to_string(path)?;
    parse_sections(&text, &path.to_string_lossy(), format)
}

/// Extract one section per heading in `text`, in document order.
///
/// # Errors
///
/// Returns [`SpyError::Parse`] if the grammar cannot be loaded, the query does not compile or
/// parsing fails.
pub fn parse_sections(text: &str, file_path: &str, format: &impl Format) -> Result<Vec<Section>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| SpyError::Parse(e.to_string()))?;
    let tree = parser
        .parse(text, None)
        .ok_or_else(|| SpyError::Parse(format!("could not parse {file_path}")))?;
    let query = Query::new(&language, format.section_query())
        .map_err(|e| SpyError::Parse(e.to_string()))?;

    let source = text.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);

    let mut sections: Vec<Section> = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let heading = capture.node;
            let raw = format
                .heading_text(&heading)
                .and_then(|node| node.utf8_text(source).ok())
                .unwrap_or_default();
            let (title, anchor) = split_anchor(strip_closing_sequence(raw));
            sections.push(Section {
                title,
                level: format.heading_level(&heading),
                anchor,
                line_heading: heading.start_position().row,
                line_end: 0,
                file_path: file_path.to_string(),
            });
        }
    }

    // Each section runs until the next heading, the last one until the end of the file
    let total_lines = text.lines().count();
    let starts: Vec<usize> = sections.iter().map(|s| s.line_heading).collect();
    for (i, section) in sections.iter_mut().enumerate() {
        section.line_end = starts.get(i + 1).copied().unwrap_or(total_lines);
    }

    Ok(sections)
}

/// Drop an ATX closing sequence (`## Title ##`), which the grammar leaves in the heading text.
///
/// The run of `#` only counts as closing when it is the whole text or follows whitespace, so
/// `C#` keeps its hash.
fn strip_closing_sequence(raw: &str) -> &str {
    let trimmed = raw.trim_end();
    let body = trimmed.trim_end_matches('#');
    if body.len() == trimmed.len() {
        trimmed
    } else if body.is_empty() || body.ends_with(char::is_whitespace) {
        body.trim_end()
    } else {
        trimmed
    }
}

#[must_use]
/// Split a trailing `{#id}` attribute off a heading.
///
/// `"Install {#setup}"` yields `("Install", Some("setup"))`; text without a well-formed suffix is
/// returned trimmed with no anchor.
pub fn split_anchor(raw: &str) -> (String, Option<String>) {
    let trimmed = raw.trim();
    if let Some(body) = trimmed.strip_suffix('}') {
        if let Some(open) = body.rfind("{#") {
            let anchor = &body[open + 2..];
            if !anchor.is_empty() && !anchor.contains(char::is_whitespace) {
                return (body[..open].trim_end().to_string(), Some(anchor.to_string()));
            }
        }
    }
    (trimmed.to_string(), None)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
