use crate::keywords::KeywordSet;

use super::report::Diagnostic;

/// One keyword occurrence in a unit's projected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementPoint<'k> {
    /// Logical byte offset of the first matched byte.
    pub start: usize,
    /// Logical byte offset one past the last matched byte.
    pub end: usize,
    pub keyword: &'k str,
    pub replacement: &'k str,
}

impl ReplacementPoint<'_> {
    #[inline]
    fn overlaps(&self, other: &ReplacementPoint<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Every non-overlapping, left-to-right occurrence of each keyword in `text`.
///
/// Keywords are scanned independently, so occurrences of different keywords may
/// overlap each other. Results are grouped by keyword in registration order.
pub fn find_occurrences<'k>(text: &str, keywords: &'k KeywordSet) -> Vec<ReplacementPoint<'k>> {
    if text.is_empty() {
        return Vec::new();
    }
    keywords
        .iter()
        .filter(|k| !k.token.is_empty())
        .flat_map(|k| {
            text.match_indices(k.token.as_str())
                .map(move |(start, m)| ReplacementPoint {
                    start,
                    end: start + m.len(),
                    keyword: &k.token,
                    replacement: &k.replacement,
                })
        })
        .collect()
}

/// Keeps the first-registered keyword wherever occurrences collide.
///
/// `points` must be in [`find_occurrences`] order. Dropped occurrences are returned
/// as [`Diagnostic::OverlappingMatch`]; the surviving points are sorted by start.
pub fn select_non_overlapping<'k>(
    points: Vec<ReplacementPoint<'k>>,
) -> (Vec<ReplacementPoint<'k>>, Vec<Diagnostic>) {
    let mut accepted: Vec<ReplacementPoint<'k>> = Vec::with_capacity(points.len());
    let mut dropped = Vec::new();

    for point in points {
        match accepted.iter().find(|kept| kept.overlaps(&point)) {
            Some(kept) => dropped.push(Diagnostic::OverlappingMatch {
                keyword: point.keyword.to_string(),
                kept: kept.keyword.to_string(),
                logical_start: point.start,
                logical_end: point.end,
            }),
            None => accepted.push(point),
        }
    }

    accepted.sort_by_key(|p| p.start);
    (accepted, dropped)
}
