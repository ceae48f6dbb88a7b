use crate::block::Block;
use crate::chunk::Chunk;

/// Greedily packs blocks into chunks of at most `density` weight.
///
/// A block heavier than `density` still gets a chunk of its own. A heading
/// whose following block would overflow the current chunk is carried over to
/// start the next one. Page-break markers close the current chunk and are
/// dropped.
pub fn pack(blocks: &[Block], density: usize) -> Vec<Chunk> {
    let mut packer = Packer::new(density);

    for (idx, block) in blocks.iter().enumerate() {
        if block.is_page_break() {
            packer.close();
            continue;
        }

        let weight = block.weight();
        if weight > density {
            log::debug!("block of weight {weight} exceeds density {density}; it gets its own card");
        }
        packer.push(block.clone(), weight);

        if block.is_heading() {
            let next_weight = blocks
                .get(idx + 1)
                .filter(|next| !next.is_page_break())
                .map(Block::weight);
            if let Some(next_weight) = next_weight {
                packer.carry_heading_if_overflowing(weight, next_weight);
            }
        }
    }

    packer.finish()
}

struct Packer {
    density: usize,
    chunks: Vec<Chunk>,
    current: ChunkBuilder,
}

impl Packer {
    fn new(density: usize) -> Self {
        Self {
            density,
            chunks: Vec::new(),
            current: ChunkBuilder::default(),
        }
    }

    fn push(&mut self, block: Block, weight: usize) {
        if !self.current.is_empty() && self.current.weight + weight > self.density {
            self.close();
        }
        self.current.push(block, weight);
    }

    /// Moves the heading just pushed into a fresh chunk when the block after
    /// it would not fit beside it anyway.
    fn carry_heading_if_overflowing(&mut self, heading_weight: usize, next_weight: usize) {
        if self.current.weight + next_weight <= self.density || self.current.len() <= 1 {
            return;
        }

        let Some(heading) = self.current.pop(heading_weight) else {
            return;
        };
        log::debug!(
            "carrying heading to the next card: {}",
            heading.text.lines().next().unwrap_or_default()
        );
        self.close();
        self.current.push(heading, heading_weight);
    }

    fn close(&mut self) {
        let current = std::mem::take(&mut self.current);
        if let Some(chunk) = current.into_chunk() {
            log::debug!(
                "closed card {} with {} blocks (weight {})",
                self.chunks.len() + 1,
                chunk.len(),
                chunk.weight()
            );
            self.chunks.push(chunk);
        }
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.close();
        self.chunks
    }
}

#[derive(Default)]
struct ChunkBuilder {
    blocks: Vec<Block>,
    weight: usize,
}

impl ChunkBuilder {
    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn len(&self) -> usize {
        self.blocks.len()
    }

    fn push(&mut self, block: Block, weight: usize) {
        self.blocks.push(block);
        self.weight += weight;
    }

    fn pop(&mut self, weight: usize) -> Option<Block> {
        let block = self.blocks.pop()?;
        self.weight -= weight;
        Some(block)
    }

    fn into_chunk(self) -> Option<Chunk> {
        if self.blocks.is_empty() {
            None
        } else {
            Some(Chunk::new(self.blocks))
        }
    }
}
