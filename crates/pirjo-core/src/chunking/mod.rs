//! Token-bounded, zero-overlap text chunking.
//!
//! Text is encoded once with `cl100k_base`; chunks are consecutive windows of
//! at most `chunk_size` tokens. Concatenating every chunk yields the input
//! text exactly. A window is shortened when its last token would end inside a
//! UTF-8 character, and widened only when a single character spans more than
//! `chunk_size` tokens.

pub mod tokenizer;

use anyhow::{ensure, Result};
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

pub use tokenizer::count_tokens;

/// Encoded text ready to be split. Every call to [`TokenChunker::chunks`]
/// starts a fresh pass over the same tokens.
#[derive(Clone)]
pub struct TokenChunker {
    bpe: &'static CoreBPE,
    tokens: Arc<[usize]>,
    chunk_size: usize,
}

impl TokenChunker {
    pub fn new(text: &str, chunk_size: usize) -> Result<Self> {
        ensure!(chunk_size >= 1, "chunk_size must be at least 1");
        let bpe = tokenizer::bpe()?;
        let tokens: Arc<[usize]> = bpe.encode_ordinary(text).into();
        Ok(Self {
            bpe,
            tokens,
            chunk_size,
        })
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn chunks(&self) -> TokenChunks {
        TokenChunks {
            bpe: self.bpe,
            tokens: Arc::clone(&self.tokens),
            chunk_size: self.chunk_size,
            pos: 0,
        }
    }
}

/// Lazy iterator over the chunks of a [`TokenChunker`].
#[derive(Clone)]
pub struct TokenChunks {
    bpe: &'static CoreBPE,
    tokens: Arc<[usize]>,
    chunk_size: usize,
    pos: usize,
}

impl TokenChunks {
    fn decode(&self, end: usize) -> Option<String> {
        self.bpe.decode(self.tokens[self.pos..end].to_vec()).ok()
    }
}

impl Iterator for TokenChunks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let len = self.tokens.len();
        if self.pos >= len {
            return None;
        }

        let limit = (self.pos + self.chunk_size).min(len);

        // Largest window within budget that ends on a character boundary,
        // otherwise the smallest window past the budget that does.
        let found = (self.pos + 1..=limit)
            .rev()
            .chain(limit + 1..=len)
            .find_map(|end| self.decode(end).map(|text| (end, text)));

        match found {
            Some((end, text)) => {
                self.pos = end;
                Some(text)
            }
            None => {
                // Unreachable for tokens produced by the same encoder.
                tracing::warn!(pos = self.pos, "undecodable token tail dropped");
                self.pos = len;
                None
            }
        }
    }
}

/// Split `text` into owned chunks of at most `chunk_size` tokens.
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<String>> {
    Ok(TokenChunker::new(text, chunk_size)?.chunks().collect())
}
