use crate::parse::flatten_value;
use pirjo_core::{BlockKey, PirjoBlocks};
use serde_json::Value;

/// Collapse split or nested block keys into the five PIRJO blocks.
///
/// A key belongs to a block when it starts with the block letter and the
/// rest is empty or all digits (`P`, `P2`, `O1`). Parts are joined with a
/// single space in the order they appear in the object. Non-objects yield
/// empty blocks.
pub fn merge_raw_blocks(raw: &Value) -> PirjoBlocks {
    let mut blocks = PirjoBlocks::default();
    let Some(map) = raw.as_object() else {
        return blocks;
    };

    for key in BlockKey::ALL {
        let parts: Vec<String> = map
            .iter()
            .filter(|(name, _)| belongs_to(name, key))
            .map(|(_, value)| flatten_value(value))
            .filter(|text| !text.is_empty())
            .collect();
        blocks.set(key, parts.join(" "));
    }
    blocks
}

fn belongs_to(name: &str, key: BlockKey) -> bool {
    name.strip_prefix(key.letter())
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}
