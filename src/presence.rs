use std::io::{Read, Seek};
use std::path::Path;

use memchr::memmem;
use serde::ser::{Serialize, SerializeMap, Serializer};
use zip::ZipArchive;

use crate::archive::open_archive;
use crate::error::Result;
use crate::office_format::DocumentKind;

/// Keyword → found, in the order the keywords were asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceReport {
    entries: Vec<(String, bool)>,
}

impl PresenceReport {
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, found)| (k.as_str(), *found))
    }

    pub fn get(&self, keyword: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, found)| *found)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn found(&self) -> usize {
        self.entries.iter().filter(|(_, found)| *found).count()
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, found)| !*found)
            .map(|(k, _)| k.as_str())
    }

    pub fn all_found(&self) -> bool {
        self.entries.iter().all(|(_, found)| *found)
    }
}

impl Serialize for PresenceReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keyword, found) in &self.entries {
            map.serialize_entry(keyword, found)?;
        }
        map.end()
    }
}

/// Reports which `keywords` occur literally in the raw markup of `kind`'s presence
/// members.
///
/// This is a plain byte search over undecoded XML: a placeholder that Word split
/// across two runs is reported missing even though substitution would find it.
pub fn scan_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    kind: DocumentKind,
    keywords: &[String],
) -> Result<PresenceReport> {
    let mut entries: Vec<(String, bool)> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if !entries.iter().any(|(k, _)| k == keyword) {
            entries.push((keyword.clone(), false));
        }
    }

    let mut buffer = Vec::new();
    for i in 0..archive.len() {
        if entries.iter().all(|(_, found)| *found) {
            break;
        }
        let mut file = archive.by_index(i)?;
        if file.is_dir() || !kind.is_presence_target(file.name()) {
            continue;
        }
        log::debug!("scanning {}", file.name());

        buffer.clear();
        file.read_to_end(&mut buffer)?;
        for (keyword, found) in entries.iter_mut().filter(|(_, found)| !*found) {
            if keyword.is_empty() {
                continue;
            }
            *found = memmem::find(&buffer, keyword.as_bytes()).is_some();
        }
    }

    Ok(PresenceReport { entries })
}

/// [`scan_archive`] over a file on disk.
pub fn check_file(path: &Path, kind: DocumentKind, keywords: &[String]) -> Result<PresenceReport> {
    let mut archive = open_archive(path)?;
    scan_archive(&mut archive, kind, keywords)
}
