use std::fmt;

use serde::Serialize;

/// A replacement that was skipped or adjusted, or a member that could not be read
/// as text.
///
/// Offsets named `logical_*` index the unit's projected text; `start`/`end` are byte
/// offsets inside the unit's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No position-map key exists anywhere in the match range.
    UnmappedRange {
        keyword: String,
        logical_start: usize,
        logical_end: usize,
    },
    /// Resolved start lies at or past the end of the unit.
    OutOfBounds {
        keyword: String,
        start: usize,
        unit_len: usize,
    },
    /// Resolved end ran past the unit and was pulled back to its length.
    EndClamped {
        keyword: String,
        end: usize,
        unit_len: usize,
    },
    /// Range would cut a multi-byte character.
    NotCharBoundary {
        keyword: String,
        start: usize,
        end: usize,
    },
    /// Match dropped because an earlier-registered keyword already claimed the text.
    OverlappingMatch {
        keyword: String,
        kept: String,
        logical_start: usize,
        logical_end: usize,
    },
    /// Byte range collides with a splice already accepted in the same unit.
    OverlappingSplice {
        keyword: String,
        start: usize,
        end: usize,
    },
    /// Target member is not valid UTF-8 and was copied through unchanged.
    NonUtf8Member { member: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmappedRange {
                keyword,
                logical_start,
                logical_end,
            } => write!(
                f,
                "{keyword}: text range {logical_start}..{logical_end} does not map onto markup"
            ),
            Diagnostic::OutOfBounds {
                keyword,
                start,
                unit_len,
            } => write!(
                f,
                "{keyword}: start {start} is outside unit of length {unit_len}"
            ),
            Diagnostic::EndClamped {
                keyword,
                end,
                unit_len,
            } => write!(f, "{keyword}: end {end} clamped to unit length {unit_len}"),
            Diagnostic::NotCharBoundary {
                keyword,
                start,
                end,
            } => write!(
                f,
                "{keyword}: range {start}..{end} is not on character boundaries"
            ),
            Diagnostic::OverlappingMatch {
                keyword,
                kept,
                logical_start,
                logical_end,
            } => write!(
                f,
                "{keyword}: match at {logical_start}..{logical_end} overlaps {kept}, skipped"
            ),
            Diagnostic::OverlappingSplice {
                keyword,
                start,
                end,
            } => write!(
                f,
                "{keyword}: range {start}..{end} overlaps another replacement, skipped"
            ),
            Diagnostic::NonUtf8Member { member } => {
                write!(f, "{member}: not valid UTF-8, copied unchanged")
            }
        }
    }
}

/// Outcome of one substitution pass over a markup blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionReport {
    pub units: usize,
    pub units_rewritten: usize,
    pub replacements: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl SubstitutionReport {
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberReport {
    pub name: String,
    pub replacements: usize,
    pub changed: bool,
}

/// Per-document result returned by every generation entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Every member copied to the output, in archive order.
    pub members: usize,
    /// Substitution targets that were visited, changed or not.
    pub targets: Vec<MemberReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentReport {
    pub fn replacements(&self) -> usize {
        self.targets.iter().map(|m| m.replacements).sum()
    }

    pub fn members_rewritten(&self) -> usize {
        self.targets.iter().filter(|m| m.changed).count()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub(crate) fn record_target(&mut self, name: &str, changed: bool, report: SubstitutionReport) {
        self.targets.push(MemberReport {
            name: name.to_string(),
            replacements: report.replacements,
            changed,
        });
        self.diagnostics.extend(report.diagnostics);
    }
}
