use crate::lazy::SharedModel;
use anyhow::Result;
use tiktoken_rs::{cl100k_base, CoreBPE};

static BPE: SharedModel<CoreBPE> = SharedModel::new("cl100k_base");

/// The `cl100k_base` encoding used by the chat models, loaded once per process.
pub fn bpe() -> Result<&'static CoreBPE> {
    BPE.get_or_try_init(cl100k_base)
}

pub fn count_tokens(text: &str) -> Result<usize> {
    Ok(bpe()?.encode_ordinary(text).len())
}
