use crate::heading::is_heading;
use crate::line::split_lines;
use crate::weight::block_weight;

const FENCE_DELIMITER: &str = "```";
const PAGE_BREAK: &str = "+++";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Paragraph-like run of non-blank lines, trimmed.
    Text,
    /// Fenced code block, delimiters included, lines kept verbatim.
    Fence,
    /// Manual page break from a `+++` line. Never rendered.
    PageBreak,
}

/// Smallest unit the paginator never splits across cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Text,
            text: text.into(),
        }
    }

    pub fn fence(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Fence,
            text: text.into(),
        }
    }

    pub fn page_break() -> Self {
        Self {
            kind: BlockKind::PageBreak,
            text: PAGE_BREAK.to_string(),
        }
    }

    pub fn is_page_break(&self) -> bool {
        self.kind == BlockKind::PageBreak
    }

    pub fn is_heading(&self) -> bool {
        self.kind != BlockKind::PageBreak && is_heading(&self.text)
    }

    /// Approximate vertical footprint. Page breaks weigh nothing.
    pub fn weight(&self) -> usize {
        match self.kind {
            BlockKind::PageBreak => 0,
            BlockKind::Text | BlockKind::Fence => block_weight(&self.text),
        }
    }
}

/// Splits a document into blocks in document order.
///
/// Fenced code stays atomic, `+++` lines become page-break markers and the
/// remaining text is cut into paragraphs on blank lines. Malformed input
/// never fails: an unterminated fence is emitted as it stands.
pub fn segment(document: &str) -> Vec<Block> {
    let mut segmenter = Segmenter::default();
    for line in split_lines(document) {
        segmenter.push_line(line);
    }
    segmenter.finish()
}

#[derive(Default)]
struct Segmenter {
    blocks: Vec<Block>,
    text: Vec<String>,
    fence: Option<Vec<String>>,
}

impl Segmenter {
    fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(fence) = &mut self.fence {
            fence.push(line.to_string());
            // Lenient close: any delimiter line once the opener is buffered.
            if trimmed.starts_with(FENCE_DELIMITER) && fence.len() > 1 {
                self.close_fence();
            }
            return;
        }

        if trimmed.starts_with(FENCE_DELIMITER) {
            self.flush_text();
            self.fence = Some(vec![line.to_string()]);
            return;
        }

        if trimmed == PAGE_BREAK {
            self.flush_text();
            self.blocks.push(Block::page_break());
            return;
        }

        self.text.push(line.to_string());
    }

    fn close_fence(&mut self) {
        if let Some(lines) = self.fence.take() {
            self.blocks.push(Block::fence(lines.join("\n")));
        }
    }

    fn flush_text(&mut self) {
        let mut paragraph: Vec<&str> = Vec::new();
        for line in &self.text {
            if line.is_empty() {
                push_paragraph(&mut self.blocks, &paragraph);
                paragraph.clear();
            } else {
                paragraph.push(line);
            }
        }
        push_paragraph(&mut self.blocks, &paragraph);
        self.text.clear();
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_text();
        if let Some(lines) = &self.fence {
            log::warn!(
                "unterminated code fence at end of document ({} lines kept as one block)",
                lines.len()
            );
            self.close_fence();
        }
        self.blocks
    }
}

fn push_paragraph(blocks: &mut Vec<Block>, lines: &[&str]) {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        blocks.push(Block::text(trimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_has_no_blocks() {
        assert!(segment("").is_empty());
        assert!(segment("\n\n  \n").is_empty());
    }

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        let blocks = segment("\n\nfirst line\nsecond line\n\n\n\nnext paragraph\n\n");
        assert_eq!(
            blocks,
            vec![
                Block::text("first line\nsecond line"),
                Block::text("next paragraph"),
            ]
        );
    }

    #[test]
    fn keeps_fenced_code_atomic() {
        let blocks = segment("Intro\n```rust\nfn main() {}\n\n# not a heading\n```\nOutro");
        assert_eq!(
            blocks,
            vec![
                Block::text("Intro"),
                Block::fence("```rust\nfn main() {}\n\n# not a heading\n```"),
                Block::text("Outro"),
            ]
        );
    }

    #[test]
    fn any_delimiter_line_closes_an_open_fence() {
        let blocks = segment("```\ncode\n```js\nafter");
        assert_eq!(
            blocks,
            vec![Block::fence("```\ncode\n```js"), Block::text("after")]
        );
    }

    #[test]
    fn back_to_back_delimiters_form_an_empty_fence() {
        let blocks = segment("```\n```\ntext");
        assert_eq!(blocks, vec![Block::fence("```\n```"), Block::text("text")]);
    }

    #[test]
    fn emits_unterminated_fence() {
        let blocks = segment("Para\n\n```\nstill code\n\nmore code");
        assert_eq!(
            blocks,
            vec![
                Block::text("Para"),
                Block::fence("```\nstill code\n\nmore code"),
            ]
        );
    }

    #[test]
    fn page_break_lines_become_markers() {
        let blocks = segment("A\n+++\nB\n\n+++\n\nC");
        let kinds: Vec<BlockKind> = blocks.iter().map(|block| block.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Text,
                BlockKind::PageBreak,
                BlockKind::Text,
                BlockKind::PageBreak,
                BlockKind::Text,
            ]
        );
    }

    #[test]
    fn page_break_inside_fence_is_code() {
        let blocks = segment("```\n+++\n```");
        assert_eq!(blocks, vec![Block::fence("```\n+++\n```")]);
    }

    #[test]
    fn crlf_input_matches_lf_input() {
        assert_eq!(segment("# T\r\n\r\nBody\r\n"), segment("# T\n\nBody\n"));
    }

    #[test]
    fn whitespace_only_line_does_not_separate_paragraphs() {
        let blocks = segment("one\n   \ntwo");
        assert_eq!(blocks, vec![Block::text("one\n   \ntwo")]);
    }
}
