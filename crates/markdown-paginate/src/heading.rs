/// Deepest heading level that takes part in heading stickiness.
pub const MAX_STICKY_DEPTH: usize = 3;

/// Returns true when the trimmed block opens with one to three `#` followed
/// by whitespace.
pub fn is_heading(block: &str) -> bool {
    let trimmed = block.trim();
    let depth = pound_count(trimmed);
    if depth == 0 || depth > MAX_STICKY_DEPTH {
        return false;
    }

    trimmed[depth..].starts_with(char::is_whitespace)
}

/// Depth of a `#`, `##` or `###` prefix followed by a literal space.
///
/// Stricter than [`is_heading`]: a tab after the hashes does not count. This
/// only feeds the weight table.
pub fn spaced_heading_depth(line: &str) -> Option<usize> {
    let depth = pound_count(line);
    if depth == 0 || depth > MAX_STICKY_DEPTH {
        return None;
    }

    line[depth..].starts_with(' ').then_some(depth)
}

fn pound_count(text: &str) -> usize {
    let mut count = 0usize;
    for ch in text.chars() {
        if ch == '#' {
            count += 1;
        } else {
            break;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_shallow_atx_headings() {
        assert!(is_heading("# Title"));
        assert!(is_heading("  ## Indented"));
        assert!(is_heading("###\tTabbed"));
        assert!(is_heading("## Heading\nwith a second line"));
    }

    #[test]
    fn rejects_deep_or_unspaced_headings() {
        assert!(!is_heading("#### Too deep"));
        assert!(!is_heading("#hashtag"));
        assert!(!is_heading("#"));
        assert!(!is_heading("Plain paragraph"));
    }

    #[test]
    fn spaced_depth_requires_a_space() {
        assert_eq!(spaced_heading_depth("# A"), Some(1));
        assert_eq!(spaced_heading_depth("### C"), Some(3));
        assert_eq!(spaced_heading_depth("#\tA"), None);
        assert_eq!(spaced_heading_depth("#### D"), None);
    }
}
