use std::borrow::Cow;

use crate::markup::PositionMap;

use super::report::Diagnostic;
use super::scanner::ReplacementPoint;

/// A byte range of a unit's markup and the text that replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice<'k> {
    pub start: usize,
    pub end: usize,
    pub keyword: &'k str,
    pub replacement: &'k str,
}

impl Splice<'_> {
    #[inline]
    fn overlaps(&self, other: &Splice<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Maps logical replacement points onto byte ranges of `unit`.
///
/// The start is the first mapped byte in the logical range and the end is one past
/// the last mapped byte, so a match spanning several text elements swallows the tags
/// between them. Points that cannot be placed safely are dropped and reported; none
/// of them is an error.
pub fn resolve<'k>(
    points: &[ReplacementPoint<'k>],
    positions: &PositionMap,
    unit: &str,
) -> (Vec<Splice<'k>>, Vec<Diagnostic>) {
    let unit_len = unit.len();
    let mut accepted: Vec<Splice<'k>> = Vec::with_capacity(points.len());
    let mut diagnostics = Vec::new();

    for point in points {
        let keyword = point.keyword;
        let Some(start) = positions.first_in(point.start..point.end) else {
            diagnostics.push(Diagnostic::UnmappedRange {
                keyword: keyword.to_string(),
                logical_start: point.start,
                logical_end: point.end,
            });
            continue;
        };
        let mut end = positions
            .last_in(point.start..point.end)
            .map_or(start + 1, |last| last + 1);
        if end <= start {
            end = start + 1;
        }

        if start >= unit_len {
            diagnostics.push(Diagnostic::OutOfBounds {
                keyword: keyword.to_string(),
                start,
                unit_len,
            });
            continue;
        }
        if end > unit_len {
            diagnostics.push(Diagnostic::EndClamped {
                keyword: keyword.to_string(),
                end,
                unit_len,
            });
            end = unit_len;
            if end <= start {
                continue;
            }
        }
        if !unit.is_char_boundary(start) || !unit.is_char_boundary(end) {
            diagnostics.push(Diagnostic::NotCharBoundary {
                keyword: keyword.to_string(),
                start,
                end,
            });
            continue;
        }

        let splice = Splice {
            start,
            end,
            keyword,
            replacement: point.replacement,
        };
        if accepted.iter().any(|s| s.overlaps(&splice)) {
            diagnostics.push(Diagnostic::OverlappingSplice {
                keyword: keyword.to_string(),
                start,
                end,
            });
            continue;
        }
        accepted.push(splice);
    }

    (accepted, diagnostics)
}

/// Applies `splices` from the highest start offset down.
///
/// Working backwards means no splice moves the bytes another one still points at.
/// Returns the unit untouched when there is nothing to apply.
pub fn apply_descending<'a>(unit: &'a str, mut splices: Vec<Splice<'_>>) -> Cow<'a, str> {
    if splices.is_empty() {
        return Cow::Borrowed(unit);
    }
    splices.sort_by(|a, b| b.start.cmp(&a.start));

    let mut out = unit.to_string();
    for splice in &splices {
        out.replace_range(splice.start..splice.end, splice.replacement);
    }
    Cow::Owned(out)
}
