use std::ops::RangeInclusive;

/// Arabic, Arabic Supplement, Arabic Extended-A and both Arabic
/// Presentation Forms blocks.
const RIGHT_TO_LEFT_RANGES: [RangeInclusive<char>; 5] = [
    '\u{0600}'..='\u{06FF}',
    '\u{0750}'..='\u{077F}',
    '\u{08A0}'..='\u{08FF}',
    '\u{FB50}'..='\u{FDFF}',
    '\u{FE70}'..='\u{FEFF}',
];

/// Coarse presence check: a single Arabic-script character is enough.
pub fn contains_right_to_left(text: &str) -> bool {
    text.chars()
        .any(|ch| RIGHT_TO_LEFT_RANGES.iter().any(|range| range.contains(&ch)))
}
