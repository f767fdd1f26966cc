//! Lightweight markup handling for office XML parts.
//!
//! Nothing here builds a document tree. A member's XML is cut into text-bearing
//! units ([`segment`]), each unit is projected to its human-readable text with a
//! byte-level position map ([`project`]), and every byte that is not part of a
//! rewritten range is left exactly as it was.

pub mod projection;
pub mod segment;
pub mod tokenizer;

pub use projection::{project, PositionMap, Projection};
pub use segment::{segment, Segment};
pub use tokenizer::{Tag, TagKind, Token, Tokenizer};

/// Tag names that drive segmentation and projection for one host format.
///
/// | Format | Unit tag | Text tag | Part |
/// |--------|----------|----------|------|
/// | DOCX   | `w:p`    | `w:t`    | WordprocessingML paragraph |
/// | PPTX   | `a:p`    | `a:t`    | DrawingML paragraph |
/// | XLSX   | `si`     | `t`      | shared-string item |
///
/// Names are compared exactly, namespace prefix included, so `w:p` never matches
/// `w:pPr` and `w:t` never matches `w:tab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupConfig {
    pub unit_tag: &'static str,
    pub text_tag: &'static str,
}

impl MarkupConfig {
    pub const WORDPROCESSING: MarkupConfig = MarkupConfig::new("w:p", "w:t");
    pub const PRESENTATION: MarkupConfig = MarkupConfig::new("a:p", "a:t");
    pub const SPREADSHEET: MarkupConfig = MarkupConfig::new("si", "t");

    pub const fn new(unit_tag: &'static str, text_tag: &'static str) -> Self {
        MarkupConfig { unit_tag, text_tag }
    }
}
