use serde::{Deserialize, Serialize};
use std::fmt;

/// A bounded slice of extracted page text; the unit of embedding and citation.
///
/// `page` and `chunk` are 1-based. Chunks are numbered per `(file, page)`.
/// Older sidecars and payloads name the chunk field `chunk_id`; it is accepted
/// on input and always written back as `chunk`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fragment {
    pub file: String,
    pub page: u32,
    #[serde(alias = "chunk_id")]
    pub chunk: u32,
    pub text: String,
}

impl Fragment {
    /// Citation key in the form `file:page:chunk`
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.file, self.page, self.chunk)
    }

    /// The key wrapped in square brackets, as it appears in generated text
    pub fn citation(&self) -> String {
        format!("[{}]", self.key())
    }
}

/// Bibliographic data read from a PDF's document info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file: String,
    /// Empty when the PDF carries no author
    pub author: String,
    /// Falls back to the file name
    pub title: String,
    /// Four digits, or empty
    pub year: String,
}

/// The five PIRJO block letters, in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKey {
    P,
    I,
    R,
    J,
    O,
}

impl BlockKey {
    pub const ALL: [BlockKey; 5] = [BlockKey::P, BlockKey::I, BlockKey::R, BlockKey::J, BlockKey::O];

    pub fn letter(self) -> &'static str {
        match self {
            BlockKey::P => "P",
            BlockKey::I => "I",
            BlockKey::R => "R",
            BlockKey::J => "J",
            BlockKey::O => "O",
        }
    }

    /// Human-readable Spanish label
    pub fn label(self) -> &'static str {
        match self {
            BlockKey::P => "Problema",
            BlockKey::I => "Información relevante",
            BlockKey::R => "Restricción o brecha",
            BlockKey::J => "Justificación",
            BlockKey::O => "Objetivo",
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(BlockKey::P),
            'I' => Some(BlockKey::I),
            'R' => Some(BlockKey::R),
            'J' => Some(BlockKey::J),
            'O' => Some(BlockKey::O),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Problema, Información, Restricción, Justificación, Objetivo.
///
/// Serializes as a JSON object with exactly the keys `P`, `I`, `R`, `J`, `O`
/// in that order. Deserialization fails if any key is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PirjoBlocks {
    #[serde(rename = "P")]
    pub problem: String,
    #[serde(rename = "I")]
    pub information: String,
    #[serde(rename = "R")]
    pub restriction: String,
    #[serde(rename = "J")]
    pub justification: String,
    #[serde(rename = "O")]
    pub objective: String,
}

impl PirjoBlocks {
    pub fn get(&self, key: BlockKey) -> &str {
        match key {
            BlockKey::P => &self.problem,
            BlockKey::I => &self.information,
            BlockKey::R => &self.restriction,
            BlockKey::J => &self.justification,
            BlockKey::O => &self.objective,
        }
    }

    pub fn set(&mut self, key: BlockKey, value: String) {
        let slot = match key {
            BlockKey::P => &mut self.problem,
            BlockKey::I => &mut self.information,
            BlockKey::R => &mut self.restriction,
            BlockKey::J => &mut self.justification,
            BlockKey::O => &mut self.objective,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockKey, &str)> + '_ {
        BlockKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// Compact JSON with non-ASCII text kept as is
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub introduction: String,
    pub blocks: PirjoBlocks,
    /// Basenames of the input paths, in input order
    pub files: Vec<String>,
}
