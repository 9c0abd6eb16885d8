//! Deflate ZIP writer implementing the core archive backend.

use ppt2pdf_core::{ArchiveSession, ArchiveWriter, Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes archive entries to a ZIP file on disk.
pub struct ZipArchiveWriter {
    zip: ZipWriter<File>,
}

impl ZipArchiveWriter {
    /// Create or truncate the ZIP file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| Error::ArchiveOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::debug!("Created ZIP file {}", path.display());

        Ok(Self {
            zip: ZipWriter::new(file),
        })
    }

    fn options() -> FileOptions<()> {
        FileOptions::default().compression_method(CompressionMethod::Deflated)
    }
}

impl ArchiveWriter for ZipArchiveWriter {
    fn add_file(&mut self, entry: &str, source: &Path) -> Result<()> {
        let write_error = |reason: String| Error::ArchiveWrite {
            entry: entry.to_string(),
            reason,
        };

        // Read before starting the entry so a bad source leaves no entry behind.
        let bytes = std::fs::read(source)
            .map_err(|e| write_error(format!("Failed to read {}: {}", source.display(), e)))?;

        self.zip
            .start_file(entry, Self::options())
            .map_err(|e| write_error(e.to_string()))?;
        if let Err(e) = self.zip.write_all(&bytes) {
            if let Err(abort) = self.zip.abort_file() {
                log::warn!("Failed to discard partial entry {}: {}", entry, abort);
            }
            return Err(write_error(e.to_string()));
        }
        log::debug!("Deflated {} ({} bytes)", entry, bytes.len());

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.zip
            .finish()
            .map_err(|e| Error::ArchiveWrite {
                entry: "central directory".to_string(),
                reason: e.to_string(),
            })?
            .sync_all()?;
        Ok(())
    }
}

/// Open an archive session backed by a ZIP file at `path`.
pub fn open_session(path: &Path) -> Result<ArchiveSession> {
    ArchiveSession::open(path, |path| {
        ZipArchiveWriter::create(path).map(|w| Box::new(w) as Box<dyn ArchiveWriter>)
    })
}
