use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::archive::{generate_document, open_archive};
use crate::error::{ForgeError, Result};
use crate::keywords::{KeywordSet, Record};
use crate::naming::{sanitize_filename, OutputNamer};
use crate::office_format::DocumentKind;
use crate::substitution::DocumentReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Generate records concurrently on rayon's global pool.
    pub parallel: bool,
    /// Wrap every record field name in `{{ }}` before substituting.
    pub normalize_keys: bool,
}

impl BatchOptions {
    /// Sequential, with the kind's own key normalization.
    pub fn for_kind(kind: DocumentKind) -> Self {
        BatchOptions {
            parallel: false,
            normalize_keys: kind.normalizes_keys(),
        }
    }
}

#[derive(Debug)]
pub struct RecordOutcome {
    /// 1-based position of the record in the input.
    pub index: usize,
    pub output: PathBuf,
    pub result: Result<DocumentReport>,
}

impl RecordOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-record outcomes of one batch run, in record order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchSummary {
    pub fn submitted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.is_ok())
            .map(|o| o.output.as_path())
    }
}

/// Generates one document per record from `template` into `output_dir`.
///
/// Fails up front if the directory cannot be created or the template is not a
/// readable archive. After that, a record that fails is logged and recorded in the
/// summary and the remaining records are still generated.
pub fn generate_batch(
    template: &Path,
    output_dir: &Path,
    kind: DocumentKind,
    records: &[Record],
    namer: &dyn OutputNamer,
    options: BatchOptions,
) -> Result<BatchSummary> {
    fs::create_dir_all(output_dir).map_err(|source| ForgeError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    open_archive(template)?;

    let jobs: Vec<(usize, &Record, PathBuf)> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let index = i + 1;
            let path = output_dir.join(file_name(namer, record, index, kind));
            (index, record, path)
        })
        .collect();

    let mut parallel = options.parallel;
    if parallel && has_collisions(&jobs) {
        log::warn!("several records resolve to the same output file, generating sequentially");
        parallel = false;
    }

    let run = |(index, record, output): &(usize, &Record, PathBuf)| {
        let mut keywords = KeywordSet::from_record(record);
        if options.normalize_keys {
            keywords = keywords.normalized();
        }
        let result = generate_document(template, output, kind, &keywords);
        if let Err(e) = &result {
            log::warn!("failed to process record {index}: {e}");
        }
        RecordOutcome {
            index: *index,
            output: output.clone(),
            result,
        }
    };

    let outcomes: Vec<RecordOutcome> = if parallel {
        jobs.par_iter().map(run).collect()
    } else {
        jobs.iter().map(run).collect()
    };

    let summary = BatchSummary { outcomes };
    log::info!(
        "processed {}/{} record(s) into {}",
        summary.succeeded(),
        summary.submitted(),
        output_dir.display()
    );
    Ok(summary)
}

fn file_name(namer: &dyn OutputNamer, record: &Record, index: usize, kind: DocumentKind) -> String {
    let name = sanitize_filename(&namer.output_name(record, index));
    match name.as_str() {
        "" | "." | ".." => format!("{}_{index}{}", kind.default_stem(), kind.extension()),
        _ => name,
    }
}

fn has_collisions(jobs: &[(usize, &Record, PathBuf)]) -> bool {
    let mut seen = HashSet::with_capacity(jobs.len());
    jobs.iter().any(|(_, _, path)| !seen.insert(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingStrategy;

    #[test]
    fn empty_names_fall_back_to_default() {
        let blank = |_: &Record, _: usize| "  ".to_string();
        assert_eq!(
            file_name(&blank, &Record::new(), 3, DocumentKind::Pptx),
            "presentation_3.pptx"
        );
        let dots = |_: &Record, _: usize| "..".to_string();
        assert_eq!(
            file_name(&dots, &Record::new(), 1, DocumentKind::Docx),
            "document_1.docx"
        );
    }

    #[test]
    fn detects_colliding_outputs() {
        let record = Record::new();
        let strategy = NamingStrategy::parse("{MISSING}.docx", DocumentKind::Docx).unwrap();
        let jobs: Vec<_> = (1..=2)
            .map(|i| (i, &record, PathBuf::from(strategy.output_name(&record, i))))
            .collect();
        assert!(has_collisions(&jobs));
    }

    #[test]
    fn unreadable_template_fails_the_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_batch(
            &dir.path().join("missing.docx"),
            &dir.path().join("out"),
            DocumentKind::Docx,
            &[Record::new()],
            &NamingStrategy::default_for(DocumentKind::Docx),
            BatchOptions::for_kind(DocumentKind::Docx),
        )
        .unwrap_err();
        assert!(matches!(err, ForgeError::OpenInput { .. }));
    }
}
