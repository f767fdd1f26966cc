//! Placeholder substitution over one markup blob.
//!
//! For every unit found by the segmenter: project its text, find keyword occurrences
//! in that text, map them back onto the unit's bytes and splice from the end of the
//! unit towards its start. Filler and units without matches are copied as-is.

pub mod report;
pub mod scanner;
pub mod splice;

use std::borrow::Cow;

use crate::keywords::KeywordSet;
use crate::markup::{project, segment, MarkupConfig, Segment};

pub use report::{Diagnostic, DocumentReport, MemberReport, SubstitutionReport};
pub use scanner::{find_occurrences, select_non_overlapping, ReplacementPoint};
pub use splice::{apply_descending, resolve, Splice};

/// Rewritten blob plus what happened while rewriting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution<'a> {
    pub output: Cow<'a, str>,
    pub report: SubstitutionReport,
}

impl Substitution<'_> {
    #[inline]
    pub fn changed(&self) -> bool {
        matches!(self.output, Cow::Owned(_))
    }
}

/// Substitutes `keywords` inside every unit of `xml`.
///
/// Returns `xml` borrowed and unchanged when no replacement was applied, so a
/// template without placeholders round-trips byte for byte.
pub fn substitute_markup<'a>(
    xml: &'a str,
    config: MarkupConfig,
    keywords: &KeywordSet,
) -> Substitution<'a> {
    let mut report = SubstitutionReport::default();
    if keywords.is_empty() {
        return Substitution {
            output: Cow::Borrowed(xml),
            report,
        };
    }

    let segments = segment(xml, config.unit_tag);
    let mut pieces: Vec<Cow<'a, str>> = Vec::with_capacity(segments.len());
    let mut changed = false;

    for seg in segments {
        let unit = match seg {
            Segment::Filler(filler) => {
                pieces.push(Cow::Borrowed(filler));
                continue;
            }
            Segment::Unit(unit) => unit,
        };
        report.units += 1;

        let projection = project(unit, config.text_tag);
        let occurrences = find_occurrences(&projection.text, keywords);
        if occurrences.is_empty() {
            pieces.push(Cow::Borrowed(unit));
            continue;
        }

        let (points, dropped) = select_non_overlapping(occurrences);
        dropped.into_iter().for_each(|d| report.push(d));

        let (splices, rejected) = resolve(&points, &projection.positions, unit);
        rejected.into_iter().for_each(|d| report.push(d));

        let applied = splices.len();
        let rewritten = apply_descending(unit, splices);
        if let Cow::Owned(_) = rewritten {
            changed = true;
            report.units_rewritten += 1;
            report.replacements += applied;
        }
        pieces.push(rewritten);
    }

    let output = if changed {
        Cow::Owned(pieces.concat())
    } else {
        Cow::Borrowed(xml)
    };
    Substitution { output, report }
}

/// Substitutes inside one archive member's raw bytes.
///
/// Members that are not valid UTF-8 are returned unchanged with a
/// [`Diagnostic::NonUtf8Member`].
pub fn substitute_member<'a>(
    name: &str,
    bytes: &'a [u8],
    config: MarkupConfig,
    keywords: &KeywordSet,
) -> (Cow<'a, [u8]>, SubstitutionReport) {
    let xml = match std::str::from_utf8(bytes) {
        Ok(xml) => xml,
        Err(_) => {
            let mut report = SubstitutionReport::default();
            report.push(Diagnostic::NonUtf8Member {
                member: name.to_string(),
            });
            return (Cow::Borrowed(bytes), report);
        }
    };

    let Substitution { output, report } = substitute_markup(xml, config, keywords);
    log::debug!(
        "{name}: {} unit(s), {} replacement(s)",
        report.units,
        report.replacements
    );
    let bytes = match output {
        Cow::Borrowed(_) => Cow::Borrowed(bytes),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    };
    (bytes, report)
}
