//! Core of the batch PowerPoint to PDF converter: the conversion queue,
//! overwrite confirmation, archive session, and progress reporting.

pub mod archive;
pub mod converter;
pub mod error;
pub mod gate;
pub mod processor;
pub mod progress;
pub mod scheduler;
pub mod selection;
pub mod types;

#[cfg(test)]
mod testing;

pub use archive::{ArchiveSession, ArchiveWriter};
pub use converter::Converter;
pub use error::{Error, Result};
pub use gate::{ConfirmationGate, OverwritePolicy};
pub use processor::{Processor, Tick};
pub use progress::{ProgressListener, ProgressReporter};
pub use scheduler::Scheduler;
pub use selection::{filter_presentations, Selector};
pub use types::{
    display_name, pdf_path_for, ConversionOutcome, LogEntry, PresentationFormat, RunReport,
    RunState,
};
