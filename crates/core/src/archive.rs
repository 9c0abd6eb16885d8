//! Archive session: the open-to-close lifetime of the optional output container.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Backend that stores produced PDFs in a compressed container.
pub trait ArchiveWriter {
    /// Append the bytes of `source` under the flat name `entry`.
    fn add_file(&mut self, entry: &str, source: &Path) -> Result<()>;

    /// Write the central directory and flush. Called exactly once.
    fn finish(&mut self) -> Result<()>;
}

/// An open archive owned by the processor for the duration of a run.
///
/// Entries are written in processing order. A base name that was already
/// written gets a numbered suffix (`deck (2).pdf`) rather than replacing
/// the earlier entry.
pub struct ArchiveSession {
    path: PathBuf,
    writer: Option<Box<dyn ArchiveWriter>>,
    entries: Vec<String>,
    taken: HashSet<String>,
}

impl std::fmt::Debug for ArchiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveSession")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .field("entries", &self.entries)
            .finish()
    }
}

impl ArchiveSession {
    /// Open a session at `path` using `opener` to create the backend.
    pub fn open<F>(path: impl Into<PathBuf>, opener: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> Result<Box<dyn ArchiveWriter>>,
    {
        let path = path.into();
        let writer = opener(&path).map_err(|e| match e {
            Error::ArchiveOpen { .. } => e,
            other => Error::ArchiveOpen {
                path: path.clone(),
                reason: other.to_string(),
            },
        })?;
        log::info!("Opened archive {}", path.display());

        Ok(Self {
            path,
            writer: Some(writer),
            entries: Vec::new(),
            taken: HashSet::new(),
        })
    }

    /// Add `source` to the archive under `entry`, returning the name used.
    pub fn write(&mut self, entry: &str, source: &Path) -> Result<String> {
        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => {
                debug_assert!(false, "write to closed archive {}", self.path.display());
                return Err(Error::ArchiveClosed);
            }
        };

        let name = unique_entry_name(&self.taken, entry);
        if name != entry {
            log::warn!("Archive already contains {}, storing as {}", entry, name);
        }
        writer.add_file(&name, source)?;
        log::debug!("Archived {} as {}", source.display(), name);

        self.taken.insert(name.clone());
        self.entries.push(name.clone());
        Ok(name)
    }

    /// Finalize the container. The session is closed even if finishing fails.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut writer) = self.writer.take() else {
            debug_assert!(false, "archive {} closed twice", self.path.display());
            return Err(Error::ArchiveClosed);
        };
        writer.finish()?;
        log::info!(
            "Closed archive {} with {} entries",
            self.path.display(),
            self.entries.len()
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names written so far, in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

fn unique_entry_name(taken: &HashSet<String>, entry: &str) -> String {
    if !taken.contains(entry) {
        return entry.to_string();
    }

    let (stem, ext) = match entry.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (entry, None),
    };

    (2..)
        .map(|n| match ext {
            Some(ext) => format!("{} ({}).{}", stem, n, ext),
            None => format!("{} ({})", stem, n),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| entry.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryArchive;

    #[test]
    fn test_unique_entry_name() {
        let mut taken = HashSet::new();
        assert_eq!(unique_entry_name(&taken, "a.pdf"), "a.pdf");

        taken.insert("a.pdf".to_string());
        assert_eq!(unique_entry_name(&taken, "a.pdf"), "a (2).pdf");

        taken.insert("a (2).pdf".to_string());
        assert_eq!(unique_entry_name(&taken, "a.pdf"), "a (3).pdf");

        taken.insert("README".to_string());
        assert_eq!(unique_entry_name(&taken, "README"), "README (2)");
    }

    #[test]
    fn test_open_failure_is_archive_open() {
        let result = ArchiveSession::open("nowhere/out.zip", |_| {
            Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        });

        match result {
            Err(Error::ArchiveOpen { path, reason }) => {
                assert_eq!(path, PathBuf::from("nowhere/out.zip"));
                assert!(reason.contains("read-only"));
            }
            other => panic!("expected ArchiveOpen, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_names_are_disambiguated() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.pdf");
        let second = dir.path().join("second.pdf");
        std::fs::write(&first, b"one").unwrap();
        std::fs::write(&second, b"two").unwrap();

        let archive = MemoryArchive::default();
        let mut session = archive.session("out.zip");
        assert_eq!(session.write("deck.pdf", &first).unwrap(), "deck.pdf");
        assert_eq!(session.write("deck.pdf", &second).unwrap(), "deck (2).pdf");
        session.close().unwrap();

        assert_eq!(
            archive.entries(),
            vec![
                ("deck.pdf".to_string(), b"one".to_vec()),
                ("deck (2).pdf".to_string(), b"two".to_vec()),
            ]
        );
        assert_eq!(archive.finish_count(), 1);
    }

    #[test]
    fn test_close_marks_session_closed() {
        let archive = MemoryArchive::default();
        let mut session = archive.session("out.zip");
        assert!(!session.is_closed());
        session.close().unwrap();
        assert!(session.is_closed());
        assert!(session.entries().is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "closed twice")]
    fn test_double_close_panics_in_debug() {
        let archive = MemoryArchive::default();
        let mut session = archive.session("out.zip");
        session.close().unwrap();
        let _ = session.close();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn test_double_close_is_an_error_in_release() {
        let archive = MemoryArchive::default();
        let mut session = archive.session("out.zip");
        session.close().unwrap();
        assert!(matches!(session.close(), Err(Error::ArchiveClosed)));
        assert_eq!(archive.finish_count(), 1);
    }
}
