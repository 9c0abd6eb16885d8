//! Domain types for a conversion run: input formats, outcomes, and run state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The format of a source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Derive the PDF path for a source document.
///
/// Same directory and base name, with the last extension replaced by `pdf`.
pub fn pdf_path_for(source: &Path) -> PathBuf {
    source.with_extension("pdf")
}

/// File name component of a path, for display and archive entry names.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result of processing a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// The PDF was produced at `pdf_path`.
    Converted { source_name: String, pdf_path: PathBuf },
    /// The target already existed and the gate declined to overwrite it.
    Skipped { source_name: String },
    /// Conversion or archiving failed for this job.
    Failed { source_name: String, reason: String },
}

/// One line of the append-only result log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum LogEntry {
    Outcome(ConversionOutcome),
    RunComplete,
    ArchiveFinalized { path: PathBuf },
    ArchiveFailed { path: PathBuf, reason: String },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outcome(ConversionOutcome::Converted { source_name, .. }) => {
                write!(f, "Converted: {}", source_name)
            }
            Self::Outcome(ConversionOutcome::Skipped { source_name }) => {
                write!(f, "Skipped: {}", source_name)
            }
            Self::Outcome(ConversionOutcome::Failed {
                source_name,
                reason,
            }) => write!(f, "Failed: {} ({})", source_name, reason),
            Self::RunComplete => f.write_str("Conversion complete."),
            Self::ArchiveFinalized { path } => {
                write!(f, "PDFs compressed to {}", path.display())
            }
            Self::ArchiveFailed { path, reason } => {
                write!(f, "Failed to finalize {}: {}", path.display(), reason)
            }
        }
    }
}

/// Lifecycle of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RunState {
    #[default]
    Idle,
    Selecting,
    Running,
    Completed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Selecting => "Selecting",
            Self::Running => "Running",
            Self::Completed => "Completed",
        };
        f.write_str(name)
    }
}

/// Snapshot of a run for machine-readable output.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: RunState,
    /// Result log rendered as display lines.
    pub lines: Vec<String>,
    pub entries: Vec<LogEntry>,
    pub current: usize,
    pub total: usize,
    /// PDFs produced during the run, in processing order.
    pub produced: Vec<PathBuf>,
    pub archive: Option<PathBuf>,
}
