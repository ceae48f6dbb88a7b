mod block;
mod card;
mod chunk;
mod heading;
mod line;
mod pack;
mod repair;
mod script;
mod weight;

pub use block::{segment, Block, BlockKind};
pub use card::{cards, Card};
pub use chunk::{Chunk, BLOCK_SEPARATOR};
pub use heading::is_heading;
pub use pack::pack;
pub use repair::repair_orphan_headings;
pub use script::contains_right_to_left;
pub use weight::CHARS_PER_LINE;

use line::read_document;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Splits `document` into cards of at most `density` weight, as markdown.
///
/// Never fails: empty input gives an empty list and malformed markdown is
/// kept as literal blocks.
pub fn paginate(document: &str, density: usize) -> Vec<String> {
    paginate_chunks(document, density)
        .iter()
        .map(Chunk::to_markdown)
        .collect()
}

pub fn paginate_chunks(document: &str, density: usize) -> Vec<Chunk> {
    let blocks = segment(document);
    let chunks = repair_orphan_headings(pack(&blocks, density));
    log::info!(
        "paginated {} blocks into {} cards at density {density}",
        blocks.iter().filter(|block| !block.is_page_break()).count(),
        chunks.len()
    );
    chunks
}

pub fn paginate_cards(document: &str, density: usize) -> Vec<Card> {
    cards(paginate_chunks(document, density))
}

pub fn paginate_from_reader<R: Read>(reader: R, density: usize) -> io::Result<Vec<String>> {
    let document = read_document(reader)?;
    Ok(paginate(&document, density))
}

pub fn paginate_from_path(path: impl AsRef<Path>, density: usize) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    paginate_from_reader(file, density)
}
