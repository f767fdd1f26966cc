use std::ops::Range;

use super::tokenizer::{Token, Tokenizer};

/// Logical text offset → byte offset inside the unit the text came from.
///
/// Offsets are byte offsets on both sides: text content is copied verbatim, so a
/// logical byte and its markup byte are the same byte. The map is monotonically
/// increasing, and bytes belonging to tags are never keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    offsets: Vec<usize>,
}

impl PositionMap {
    #[inline]
    pub fn get(&self, logical: usize) -> Option<usize> {
        self.offsets.get(logical).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// First mapped byte for any logical offset in `range`, scanning forward.
    pub fn first_in(&self, range: Range<usize>) -> Option<usize> {
        range.into_iter().find_map(|i| self.get(i))
    }

    /// Last mapped byte for any logical offset in `range`, scanning backward.
    pub fn last_in(&self, range: Range<usize>) -> Option<usize> {
        range.rev().find_map(|i| self.get(i))
    }

    fn push_run(&mut self, bytes: Range<usize>) {
        self.offsets.extend(bytes);
    }
}

/// The human-readable text of one unit plus where each byte of it lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub text: String,
    pub positions: PositionMap,
}

impl Projection {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Concatenates the content of every `text_tag` element in `unit`, in document order.
///
/// Adjacent elements are joined with no separator, which is what lets a placeholder
/// split across formatting runs be found at all.
pub fn project(unit: &str, text_tag: &str) -> Projection {
    let mut projection = Projection::default();
    let mut depth = 0usize;

    for token in Tokenizer::new(unit) {
        match token {
            Token::Tag(tag) if tag.opens(text_tag) => depth += 1,
            Token::Tag(tag) if tag.closes(text_tag) => depth = depth.saturating_sub(1),
            Token::Tag(_) => {}
            Token::Text(range) if depth > 0 => {
                projection.text.push_str(&unit[range.clone()]);
                projection.positions.push_run(range);
            }
            Token::Text(_) => {}
        }
    }
    projection
}
