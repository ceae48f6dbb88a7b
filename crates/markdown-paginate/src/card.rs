use crate::chunk::Chunk;
use crate::script::contains_right_to_left;

/// A rendered-ready chunk with its position in the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub markdown: String,
    /// Holds Arabic-script text somewhere; renderers switch to RTL styling.
    pub right_to_left: bool,
}

impl Card {
    pub fn label(&self) -> String {
        format!("Card {} of {}", self.number, self.total)
    }

    /// Export name, zero-padded so files sort in card order: `card-01.md`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("card-{:02}.{extension}", self.number)
    }
}

pub fn cards(chunks: Vec<Chunk>) -> Vec<Card> {
    let total = chunks.len();
    chunks
        .iter()
        .enumerate()
        .map(|(idx, chunk)| {
            let markdown = chunk.to_markdown();
            Card {
                number: idx + 1,
                total,
                right_to_left: contains_right_to_left(&markdown),
                markdown,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;

    #[test]
    fn numbers_cards_and_flags_arabic() {
        let chunks = vec![
            Chunk::new(vec![Block::text("# Hello")]),
            Chunk::new(vec![Block::text("مرحبا")]),
        ];
        let deck = cards(chunks);

        assert_eq!(deck.len(), 2);
        assert_eq!(deck[0].label(), "Card 1 of 2");
        assert!(!deck[0].right_to_left);
        assert_eq!(deck[1].number, 2);
        assert_eq!(deck[1].total, 2);
        assert!(deck[1].right_to_left);
    }

    #[test]
    fn pads_file_names() {
        let card = Card {
            number: 7,
            total: 12,
            markdown: String::new(),
            right_to_left: false,
        };
        assert_eq!(card.file_name("md"), "card-07.md");

        let card = Card {
            number: 123,
            ..card
        };
        assert_eq!(card.file_name("txt"), "card-123.txt");
    }
}
