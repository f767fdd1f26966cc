use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ForgeError, Result};
use crate::keywords::KeywordSet;
use crate::office_format::DocumentKind;
use crate::substitution::{substitute_member, DocumentReport};

/// Opens an office file as a zip archive.
pub fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path).map_err(|source| ForgeError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(BufReader::new(file)).map_err(|source| ForgeError::InvalidArchive {
        path: path.to_path_buf(),
        source,
    })
}

/// Copies every member of `archive` into `writer`, substituting inside the members
/// `kind` marks as targets.
///
/// Members keep their order, names, timestamps and permissions. Stored members stay
/// stored; everything else is written deflated.
pub fn process_archive<R, W>(
    archive: &mut ZipArchive<R>,
    writer: W,
    kind: DocumentKind,
    keywords: &KeywordSet,
) -> Result<(W, DocumentReport)>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let config = kind.markup();
    let mut zip_writer = ZipWriter::new(writer);
    let mut report = DocumentReport::default();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();

        let method = match file.compression() {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let mut options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(file.last_modified().unwrap_or_default());
        if let Some(mode) = file.unix_mode() {
            options = options.unix_permissions(mode);
        }

        report.members += 1;
        if file.is_dir() {
            zip_writer.add_directory(name.as_str(), options)?;
            continue;
        }

        let mut buffer = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buffer)?;

        zip_writer.start_file(name.as_str(), options)?;
        if kind.is_substitution_target(&name) {
            let (content, member_report) = substitute_member(&name, &buffer, config, keywords);
            let changed = matches!(content, Cow::Owned(_));
            zip_writer.write_all(&content)?;
            report.record_target(&name, changed, member_report);
        } else {
            log::debug!("{name}: copied");
            zip_writer.write_all(&buffer)?;
        }
    }

    let writer = zip_writer.finish()?;
    Ok((writer, report))
}

/// In-memory variant of [`generate_document`].
pub fn substitute_bytes(
    template: &[u8],
    kind: DocumentKind,
    keywords: &KeywordSet,
) -> Result<(Vec<u8>, DocumentReport)> {
    let mut archive = ZipArchive::new(Cursor::new(template))?;
    let (cursor, report) = process_archive(&mut archive, Cursor::new(Vec::new()), kind, keywords)?;
    Ok((cursor.into_inner(), report))
}

/// Writes a populated copy of `template` to `output`.
///
/// The document is assembled in a temporary file next to `output` and renamed into
/// place only once complete.
pub fn generate_document(
    template: &Path,
    output: &Path,
    kind: DocumentKind,
    keywords: &KeywordSet,
) -> Result<DocumentReport> {
    let mut archive = open_archive(template)?;

    let parent = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let create_err = |source: std::io::Error| ForgeError::CreateOutput {
        path: output.to_path_buf(),
        source,
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(create_err)?;
    }
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    // Same mode as a plain create, subject to umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let temp = builder.tempfile_in(parent).map_err(create_err)?;

    let (temp, report) = process_archive(&mut archive, temp, kind, keywords)?;
    temp.persist(output).map_err(|e| create_err(e.error))?;

    log::info!(
        "created {} ({} replacement(s) in {} member(s))",
        output.display(),
        report.replacements(),
        report.members_rewritten()
    );
    Ok(report)
}
