use std::fmt;
use std::path::Path;

use crate::error::ForgeError;
use crate::markup::MarkupConfig;

/// Office document kind (strongly-typed).
///
/// Selects which container members get rewritten, which tags bound a text unit,
/// and which members the keyword check reads.
///
/// | Variant | Unit / text tags | Substitution targets | Presence scan |
/// |---------|------------------|----------------------|---------------|
/// | `Docx`  | `w:p` / `w:t`    | `word/document.xml`  | `word/**/*.xml` |
/// | `Pptx`  | `a:p` / `a:t`    | `ppt/slides/slide*.xml` | `ppt/slides/**/*.xml` |
/// | `Xlsx`  | `si` / `t`       | `xl/sharedStrings.xml` | `xl/worksheets/**/*.xml`, `xl/sharedStrings.xml` |
///
/// Kinds parse case-insensitively from `"docx"`, `"pptx"` and `"xlsx"` via
/// `TryFrom<&str>`, or from a file path's extension with [`DocumentKind::from_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Word-processing document.
    Docx,
    /// Presentation.
    Pptx,
    /// Spreadsheet.
    Xlsx,
}

impl TryFrom<&str> for DocumentKind {
    type Error = ForgeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "docx" => Ok(Self::Docx),
            "pptx" => Ok(Self::Pptx),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(ForgeError::UnsupportedDocument(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DocumentKind {
    /// Detects the kind from a file extension.
    ///
    /// ```rust
    /// use officeforge_rs::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::from_path("out/Report.DOCX").ok(), Some(DocumentKind::Docx));
    /// assert!(DocumentKind::from_path("notes.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ForgeError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ForgeError::UnsupportedDocument(path.display().to_string()))?;
        Self::try_from(ext)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Xlsx => "xlsx",
        }
    }

    #[inline]
    pub fn markup(self) -> MarkupConfig {
        match self {
            Self::Docx => MarkupConfig::WORDPROCESSING,
            Self::Pptx => MarkupConfig::PRESENTATION,
            Self::Xlsx => MarkupConfig::SPREADSHEET,
        }
    }

    /// Whether `member` is rewritten during substitution.
    pub fn is_substitution_target(self, member: &str) -> bool {
        match self {
            Self::Docx => member == "word/document.xml",
            Self::Pptx => member
                .strip_prefix("ppt/slides/slide")
                .is_some_and(|rest| rest.ends_with(".xml") && !rest.contains('/')),
            Self::Xlsx => member == "xl/sharedStrings.xml",
        }
    }

    /// Whether `member` is read by the keyword presence check.
    pub fn is_presence_target(self, member: &str) -> bool {
        match self {
            Self::Docx => is_xml_in(member, "word/"),
            Self::Pptx => is_xml_in(member, "ppt/slides/"),
            Self::Xlsx => is_xml_in(member, "xl/worksheets/") || member == "xl/sharedStrings.xml",
        }
    }

    /// Whether bare keys are wrapped in `{{ }}` before matching.
    ///
    /// Spreadsheet templates carry `{{KEY}}` placeholders; word and slide
    /// templates match keys literally.
    pub fn normalizes_keys(self) -> bool {
        matches!(self, Self::Xlsx)
    }

    pub fn default_stem(self) -> &'static str {
        match self {
            Self::Docx => "document",
            Self::Pptx => "presentation",
            Self::Xlsx => "spreadsheet",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => ".docx",
            Self::Pptx => ".pptx",
            Self::Xlsx => ".xlsx",
        }
    }
}

/// Any `*.xml` member under `dir`, subdirectories included.
fn is_xml_in(member: &str, dir: &str) -> bool {
    member.starts_with(dir) && member.ends_with(".xml")
}
