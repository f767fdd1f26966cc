//! Template-driven generation of Word, PowerPoint and Excel documents.
//!
//! Placeholders such as `{{CLIENT_NAME}}` are replaced in the human-readable text of
//! a template while every byte of markup outside the replaced ranges is preserved.
//! A placeholder that the authoring application split across several formatting runs
//! is still found and replaced.
//!
//! ```no_run
//! use officeforge_rs::{DocumentKind, OfficeForge, Record};
//!
//! let forge = OfficeForge::new(DocumentKind::Docx);
//! let record = Record::from([
//!     ("CLIENT_NAME".to_string(), "Ada Lovelace".to_string()),
//!     ("TOTAL".to_string(), "42.00".to_string()),
//! ]);
//! let report = forge.process_multi("invoice.docx".as_ref(), "out.docx".as_ref(), &record)?;
//! println!("{} replacement(s)", report.replacements());
//! # Ok::<(), officeforge_rs::ForgeError>(())
//! ```
use std::path::Path;

use crate::keywords::normalize_key;

pub mod archive;
pub mod batch;
pub mod error;
pub mod keywords;
pub mod markup;
pub mod naming;
pub mod office_format;
pub mod presence;
pub mod records;
pub mod substitution;

pub use crate::batch::{BatchOptions, BatchSummary, RecordOutcome};
pub use crate::error::{ForgeError, Result};
pub use crate::keywords::{KeywordSet, Record};
pub use crate::markup::MarkupConfig;
pub use crate::naming::{NamingStrategy, OutputNamer};
pub use crate::office_format::DocumentKind;
pub use crate::presence::PresenceReport;
pub use crate::substitution::{Diagnostic, DocumentReport};

/// Entry point bound to one document kind.
///
/// Spreadsheet keys are wrapped in `{{ }}` unless they already are; word and slide
/// keys are matched verbatim. [`OfficeForge::with_normalized_keys`] overrides the
/// kind's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeForge {
    kind: DocumentKind,
    normalize_keys: bool,
    parallel: bool,
}

impl OfficeForge {
    pub fn new(kind: DocumentKind) -> Self {
        OfficeForge {
            kind,
            normalize_keys: kind.normalizes_keys(),
            parallel: false,
        }
    }

    /// Detects the kind from the template's extension.
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(DocumentKind::from_path(path)?))
    }

    /// Forces `{{ }}` wrapping of keys on or off.
    pub fn with_normalized_keys(mut self, normalize: bool) -> Self {
        self.normalize_keys = normalize;
        self
    }

    /// Generate batch records concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[inline]
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Replaces one keyword.
    pub fn process_single(
        &self,
        input: &Path,
        output: &Path,
        key: &str,
        value: &str,
    ) -> Result<DocumentReport> {
        self.process_keywords(input, output, &KeywordSet::single(key, value))
    }

    /// Replaces every field of `record`.
    pub fn process_multi(&self, input: &Path, output: &Path, record: &Record) -> Result<DocumentReport> {
        self.process_keywords(input, output, &KeywordSet::from_record(record))
    }

    pub fn process_keywords(
        &self,
        input: &Path,
        output: &Path,
        keywords: &KeywordSet,
    ) -> Result<DocumentReport> {
        let keywords = self.prepare(keywords);
        archive::generate_document(input, output, self.kind, &keywords)
    }

    /// Generates one document per record, named by `pattern`.
    ///
    /// See [`NamingStrategy::parse`] for the accepted patterns; the pattern is checked
    /// against the first record before anything is written.
    pub fn process_records(
        &self,
        input: &Path,
        output_dir: &Path,
        records: &[Record],
        pattern: &str,
    ) -> Result<BatchSummary> {
        let strategy = NamingStrategy::parse(pattern, self.kind)?;
        if let Some(first) = records.first() {
            strategy.validate(first)?;
        }
        self.process_records_with(input, output_dir, records, &strategy)
    }

    pub fn process_records_with(
        &self,
        input: &Path,
        output_dir: &Path,
        records: &[Record],
        namer: &dyn OutputNamer,
    ) -> Result<BatchSummary> {
        let options = BatchOptions {
            parallel: self.parallel,
            normalize_keys: self.normalize_keys,
        };
        batch::generate_batch(input, output_dir, self.kind, records, namer, options)
    }

    /// Reports which keywords appear literally in the document's raw markup.
    ///
    /// Keys are normalized the same way as for substitution.
    pub fn check_keywords(&self, input: &Path, keywords: &[String]) -> Result<PresenceReport> {
        let keywords: Vec<String> = if self.normalize_keys {
            keywords.iter().map(|k| normalize_key(k)).collect()
        } else {
            keywords.to_vec()
        };
        presence::check_file(input, self.kind, &keywords)
    }

    fn prepare(&self, keywords: &KeywordSet) -> KeywordSet {
        if self.normalize_keys {
            keywords.normalized()
        } else {
            keywords.clone()
        }
    }
}
