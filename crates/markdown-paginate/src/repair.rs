use crate::block::Block;
use crate::chunk::Chunk;

/// Ensures no chunk but the last ends on a heading.
///
/// Trailing headings are detached and prepended to the following chunk; a
/// chunk left with nothing is dropped. The whole trailing run of headings
/// moves together, so a heading pushed forward can never strand the one
/// that was already waiting at the end of its new chunk.
pub fn repair_orphan_headings(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let total = chunks.len();
    let mut repaired = Vec::with_capacity(total);
    let mut carried: Vec<Block> = Vec::new();

    for (idx, chunk) in chunks.into_iter().enumerate() {
        let mut blocks = std::mem::take(&mut carried);
        blocks.extend(chunk.into_blocks());

        if idx + 1 < total {
            let keep = blocks.len() - trailing_headings(&blocks);
            carried = blocks.split_off(keep);
            if !carried.is_empty() {
                log::debug!(
                    "moving {} trailing heading(s) from card {} to the next card",
                    carried.len(),
                    idx + 1
                );
            }
        }

        if !blocks.is_empty() {
            repaired.push(Chunk::new(blocks));
        }
    }

    repaired
}

fn trailing_headings(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .rev()
        .take_while(|block| block.is_heading())
        .count()
}
