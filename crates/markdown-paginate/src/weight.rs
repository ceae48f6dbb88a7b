use once_cell::sync::Lazy;
use regex::Regex;

use crate::heading::spaced_heading_depth;
use crate::script::contains_right_to_left;

/// Characters that make up one rendered line of a plain paragraph.
pub const CHARS_PER_LINE: usize = 52;

const FENCE_WEIGHT: usize = 5;
const RIGHT_TO_LEFT_FENCE_WEIGHT: usize = 8;
const QUOTE_WEIGHT: usize = 5;

static LIST_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+] |\d+\. )").expect("valid list item pattern"));

/// Weight of a single block, judged on the first line of its trimmed text.
pub fn block_weight(block: &str) -> usize {
    let trimmed = block.trim();
    let first = trimmed.lines().next().unwrap_or("");

    if let Some(depth) = spaced_heading_depth(first) {
        // 7, 6, 5 for levels one to three.
        return 8 - depth;
    }

    if first.starts_with("```") {
        return if contains_right_to_left(block) {
            RIGHT_TO_LEFT_FENCE_WEIGHT
        } else {
            FENCE_WEIGHT
        };
    }

    if first.starts_with('>') {
        return QUOTE_WEIGHT;
    }

    if LIST_ITEM.is_match(first) {
        let items = block.lines().filter(|line| !line.trim().is_empty()).count();
        return items * 2 + 1;
    }

    collapsed_len(block).div_ceil(CHARS_PER_LINE)
}

/// Character count once every whitespace run is folded into one space.
fn collapsed_len(text: &str) -> usize {
    let mut len = 0usize;
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                len += 1;
                in_whitespace = true;
            }
        } else {
            len += 1;
            in_whitespace = false;
        }
    }
    len
}
