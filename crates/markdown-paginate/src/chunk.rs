use crate::block::Block;

/// Separator placed between blocks when a chunk is turned back into text.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Ordered, non-empty run of blocks that becomes one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    blocks: Vec<Block>,
}

impl Chunk {
    pub(crate) fn new(blocks: Vec<Block>) -> Self {
        debug_assert!(!blocks.is_empty(), "chunks are never empty");
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn weight(&self) -> usize {
        self.blocks.iter().map(Block::weight).sum()
    }

    pub fn ends_with_heading(&self) -> bool {
        self.blocks.last().is_some_and(Block::is_heading)
    }

    pub fn to_markdown(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }
}
