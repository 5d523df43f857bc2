//! PDF text and metadata extraction.
//!
//! Page text is decoded through each page font's encoding by lopdf. A page
//! whose content cannot be decoded contributes empty text; a file that cannot
//! be opened fails the whole extraction.

use crate::chunking::TokenChunker;
use crate::models::{FileMetadata, Fragment};
use lopdf::{Dictionary, Document, Object};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No se pudo leer el PDF {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("No se pudo fragmentar el texto de {file}: {message}")]
    Chunking { file: String, message: String },
}

/// Fragments of every input file plus one metadata record per input path.
#[derive(Debug, Clone, Default)]
pub struct ExtractedSources {
    pub fragments: Vec<Fragment>,
    pub metadata: Vec<FileMetadata>,
}

/// Extract and chunk `paths` in order.
pub fn extract_sources<P: AsRef<Path>>(
    paths: &[P],
    chunk_size: usize,
) -> Result<ExtractedSources, ExtractionError> {
    let mut out = ExtractedSources::default();

    for path in paths {
        let path = path.as_ref();
        let file = file_name(path);
        let doc = Document::load(path).map_err(|e| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        out.metadata.push(read_metadata(&doc, &file));

        for (page, text) in page_texts(&doc) {
            let chunker =
                TokenChunker::new(&text, chunk_size).map_err(|e| ExtractionError::Chunking {
                    file: file.clone(),
                    message: e.to_string(),
                })?;
            for (i, chunk) in chunker.chunks().enumerate() {
                out.fragments.push(Fragment {
                    file: file.clone(),
                    page,
                    chunk: i as u32 + 1,
                    text: chunk,
                });
            }
        }
        debug!(file = %file, fragments = out.fragments.len(), "extracted pdf");
    }

    Ok(out)
}

/// Basename of `path`, lossily converted
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// `(page_number, text)` for every page, 1-based, in page order
pub fn page_texts(doc: &Document) -> Vec<(u32, String)> {
    doc.get_pages()
        .into_keys()
        .map(|number| {
            let text = doc
                .extract_text(&[number])
                .map(|text| text.trim().to_string())
                .unwrap_or_else(|e| {
                    warn!(page = number, error = %e, "page text extraction failed");
                    String::new()
                });
            (number, text)
        })
        .collect()
}

/// Decode an `Info` string: UTF-16BE with BOM, UTF-8 with BOM, else Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Author, title and year from the trailer's `Info` dictionary
pub fn read_metadata(doc: &Document, file: &str) -> FileMetadata {
    let info = info_dictionary(doc);
    let field = |key: &[u8]| {
        info.map(|dict| info_string(doc, dict, key))
            .unwrap_or_default()
    };

    let title = field(b"Title");
    FileMetadata {
        file: file.to_string(),
        author: field(b"Author"),
        title: if title.is_empty() {
            file.to_string()
        } else {
            title
        },
        year: first_year(&field(b"CreationDate")).unwrap_or_default(),
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    resolve(doc, info)?.as_dict().ok()
}

fn info_string(doc: &Document, dict: &Dictionary, key: &[u8]) -> String {
    match dict.get(key).ok().and_then(|obj| resolve(doc, obj)) {
        Some(Object::String(bytes, _)) => decode_pdf_string(bytes)
            .trim_matches(|c: char| c.is_whitespace() || c == '\0')
            .to_string(),
        _ => String::new(),
    }
}

/// First run of four consecutive ASCII digits
fn first_year(date: &str) -> Option<String> {
    date.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .map(|w| String::from_utf8_lossy(w).into_owned())
}
