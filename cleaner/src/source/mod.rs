//! Input discovery and archive extraction.
//!
//! Archives are located with a glob pattern and sorted by an explicit
//! [`ArchiveOrdering`], so the row order (and therefore every `client_id`)
//! doesn't depend on how the filesystem happens to list the directory.

use std::cmp::Ordering;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use tracing::debug;
use zip::ZipArchive;

use crate::error::{ArchiveError, ArchiveResult};

/// Default archive name pattern of the campaign extracts.
pub const DEFAULT_ARCHIVE_PATTERN: &str = "bank-marketing-campaing-*.csv.zip";

/// Largest buffer reserved up front from a member's declared size.
const MAX_PREALLOC: u64 = 64 << 20;

/// Total order used to sequence archives before concatenation.
pub type ArchiveOrdering = fn(&Path, &Path) -> Ordering;

/// Byte-wise file name order, full path as tie-breaker.
pub fn by_file_name(a: &Path, b: &Path) -> Ordering {
    let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
    name(a).cmp(&name(b)).then_with(|| a.cmp(b))
}

/// Find the archives matching `pattern` inside `input_dir`, sorted by `ordering`.
///
/// Only `pattern` is a glob; `input_dir` is matched literally.
pub fn discover_archives(
    input_dir: &Path,
    pattern: &str,
    ordering: ArchiveOrdering,
) -> ArchiveResult<Vec<PathBuf>> {
    let full_pattern = PathBuf::from(Pattern::escape(&input_dir.to_string_lossy())).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let mut archives = Vec::new();
    for entry in glob(&full_pattern)? {
        let path = entry?;
        if path.is_file() {
            archives.push(path);
        }
    }

    archives.sort_by(|a, b| ordering(a, b));
    debug!("{} archive(s) match {}", archives.len(), full_pattern);
    Ok(archives)
}

/// Read the single tabular member of an archive.
///
/// Returns the member name and its decompressed bytes. Directory entries are
/// skipped; zero or several file members is an error.
pub fn read_tabular_member(path: &Path) -> ArchiveResult<(String, Vec<u8>)> {
    let file = File::open(path).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|source| ArchiveError::Zip {
        path: path.to_path_buf(),
        source,
    })?;

    let zip_err = |source| ArchiveError::Zip {
        path: path.to_path_buf(),
        source,
    };

    let mut members = Vec::new();
    for idx in 0..archive.len() {
        let entry = archive.by_index(idx).map_err(zip_err)?;
        if !entry.is_dir() {
            members.push((idx, entry.name().to_string()));
        }
    }

    let (idx, name) = match members.len() {
        0 => {
            return Err(ArchiveError::NoTabularMember {
                path: path.to_path_buf(),
            })
        }
        1 => members.remove(0),
        _ => {
            return Err(ArchiveError::MultipleTabularMembers {
                path: path.to_path_buf(),
                members: members.into_iter().map(|(_, name)| name).collect(),
            })
        }
    };

    let entry = archive.by_index(idx).map_err(zip_err)?;
    let declared_size = entry.size();
    let bytes = read_member(entry, declared_size).map_err(|source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Read {} bytes from {}:{}", bytes.len(), path.display(), name);
    Ok((name, bytes))
}

/// Read a member to the end. The declared size is only a capacity hint.
fn read_member<R: Read>(mut reader: R, declared_size: u64) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(declared_size.min(MAX_PREALLOC) as usize);
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
