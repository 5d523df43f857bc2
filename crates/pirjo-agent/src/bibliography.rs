//! Deterministic reference list built only from citations that match known
//! fragments, so no bibliographic entry can be invented.

use once_cell::sync::Lazy;
use pirjo_core::{FileMetadata, Fragment};
use regex::Regex;
use std::collections::HashSet;

static CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("citation pattern is valid"));

static REFERENCES_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*|__)?Referencias(?:\*\*|__)?:?[ \t]*$")
        .expect("heading pattern is valid")
});

/// Replace any model-written reference list with one entry per cited file.
///
/// Only the text before an existing `Referencias` heading is scanned.
/// Returns `text` unchanged when it cites none of `fragments`.
pub fn verify_bibliography(
    text: &str,
    fragments: &[Fragment],
    catalog: Option<&[FileMetadata]>,
) -> String {
    let known: HashSet<String> = fragments.iter().map(Fragment::key).collect();
    let body = match REFERENCES_HEADING.find(text) {
        Some(heading) => &text[..heading.start()],
        None => text,
    };

    let mut files: Vec<&str> = Vec::new();
    for capture in CITATION.captures_iter(body) {
        let Some(key) = capture.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if !known.contains(key) {
            continue;
        }
        let file = key.rsplitn(3, ':').nth(2).unwrap_or(key);
        if !files.contains(&file) {
            files.push(file);
        }
    }

    if files.is_empty() {
        return text.to_string();
    }

    let entries: Vec<String> = files
        .iter()
        .map(|file| reference_line(file, catalog))
        .collect();

    format!("{}\n\nReferencias\n{}", body.trim_end(), entries.join("\n"))
}

fn reference_line(file: &str, catalog: Option<&[FileMetadata]>) -> String {
    let Some(meta) = catalog.and_then(|entries| entries.iter().find(|m| m.file == file)) else {
        return format!("- {file}");
    };
    let author = non_empty(&meta.author).unwrap_or("s.a.");
    let year = non_empty(&meta.year).unwrap_or("s.f.");
    let title = non_empty(&meta.title).unwrap_or(file);
    format!("- {author} ({year}). {title}.")
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
