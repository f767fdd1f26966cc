use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{ForgeError, Result};
use crate::keywords::{normalize_key, Record};
use crate::office_format::DocumentKind;

/// `{{FIELD}}` or `{FIELD}`; the field name lands in group 1 or 2 respectively.
static FIELD_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}|\{([^{}]+)\}").unwrap());

/// Built-in field holding the 1-based record number.
pub const INDEX_FIELD: &str = "INDEX";

const SEQUENCE_VERB: &str = "%d";

/// Produces the output file name for one batch record.
///
/// `index` is 1-based. Implemented by [`NamingStrategy`] and by any
/// `Fn(&Record, usize) -> String + Sync` closure.
pub trait OutputNamer: Sync {
    fn output_name(&self, record: &Record, index: usize) -> String;
}

impl<F> OutputNamer for F
where
    F: Fn(&Record, usize) -> String + Sync,
{
    fn output_name(&self, record: &Record, index: usize) -> String {
        self(record, index)
    }
}

/// How batch output files are named.
///
/// ```rust
/// use officeforge_rs::{DocumentKind, NamingStrategy, OutputNamer, Record};
///
/// let record = Record::from([("NAME".to_string(), "Ada".to_string())]);
/// let fields = NamingStrategy::parse("{NAME}_{INDEX}.docx", DocumentKind::Docx).unwrap();
/// assert_eq!(fields.output_name(&record, 3), "Ada_3.docx");
///
/// let seq = NamingStrategy::parse("contract_%d.docx", DocumentKind::Docx).unwrap();
/// assert_eq!(seq.output_name(&record, 3), "contract_3.docx");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingStrategy {
    /// `"{stem}_{index}{extension}"`.
    Default { stem: String, extension: String },
    /// Every `%d` replaced by the record number.
    Sequential { pattern: String },
    /// `{FIELD}` / `{{FIELD}}` replaced by record values; `{INDEX}` is the record number.
    Fields { pattern: String },
}

impl NamingStrategy {
    pub fn default_for(kind: DocumentKind) -> Self {
        NamingStrategy::Default {
            stem: kind.default_stem().to_string(),
            extension: kind.extension().to_string(),
        }
    }

    /// Picks a strategy from a user pattern.
    ///
    /// Empty patterns use the kind's default name, patterns containing braces are
    /// field patterns, patterns containing `%d` are sequential. Anything else is
    /// rejected.
    pub fn parse(pattern: &str, kind: DocumentKind) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Ok(Self::default_for(kind));
        }
        if pattern.contains('{') && pattern.contains('}') {
            if !FIELD_PLACEHOLDER.is_match(pattern) {
                return Err(ForgeError::InvalidPattern(
                    "data pattern must contain at least one {FIELD} placeholder".to_string(),
                ));
            }
            return Ok(NamingStrategy::Fields {
                pattern: pattern.to_string(),
            });
        }
        if pattern.contains(SEQUENCE_VERB) {
            return Ok(NamingStrategy::Sequential {
                pattern: pattern.to_string(),
            });
        }
        Err(ForgeError::InvalidPattern(
            "pattern must contain either {FIELD} placeholders or %d for sequential numbering"
                .to_string(),
        ))
    }

    /// Field names referenced by a [`NamingStrategy::Fields`] pattern, in order.
    pub fn placeholders(&self) -> Vec<&str> {
        match self {
            NamingStrategy::Fields { pattern } => FIELD_PLACEHOLDER
                .captures_iter(pattern)
                .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| m.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Checks every field placeholder against a sample record.
    pub fn validate(&self, sample: &Record) -> Result<()> {
        for field in self.placeholders() {
            if field == INDEX_FIELD || lookup(sample, field).is_some() {
                continue;
            }
            let available: Vec<&str> = sample.keys().map(String::as_str).collect();
            return Err(ForgeError::InvalidPattern(format!(
                "placeholder {{{field}}} not found in data fields. Available fields: [{}]",
                available.join(", ")
            )));
        }
        Ok(())
    }

    fn render(&self, record: &Record, index: usize) -> String {
        match self {
            NamingStrategy::Default { stem, extension } => format!("{stem}_{index}{extension}"),
            NamingStrategy::Sequential { pattern } => {
                pattern.replace(SEQUENCE_VERB, &index.to_string())
            }
            NamingStrategy::Fields { pattern } => FIELD_PLACEHOLDER
                .replace_all(pattern, |caps: &Captures<'_>| {
                    let field = caps
                        .get(1)
                        .or_else(|| caps.get(2))
                        .map_or("", |m| m.as_str());
                    match lookup(record, field) {
                        Some(value) => value.to_string(),
                        None if field == INDEX_FIELD => index.to_string(),
                        None => caps[0].to_string(),
                    }
                })
                .into_owned(),
        }
    }
}

impl OutputNamer for NamingStrategy {
    fn output_name(&self, record: &Record, index: usize) -> String {
        sanitize_filename(&self.render(record, index))
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingStrategy::Default { stem, extension } => {
                write!(f, "default naming: {stem}_N{extension}")
            }
            NamingStrategy::Sequential { pattern } => write!(f, "sequential pattern: {pattern}"),
            NamingStrategy::Fields { pattern } => write!(
                f,
                "data-based pattern {pattern} with fields: [{}]",
                self.placeholders().join(", ")
            ),
        }
    }
}

fn lookup<'r>(record: &'r Record, field: &str) -> Option<&'r str> {
    record
        .get(field)
        .or_else(|| record.get(&normalize_key(field)))
        .map(String::as_str)
}

/// Makes `name` safe to use as a single file name.
///
/// Path separators and the characters Windows rejects (`: * ? " < > |`) become `_`,
/// control characters are removed and surrounding whitespace is trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| (*c as u32) >= 32)
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    cleaned.trim().to_string()
}
