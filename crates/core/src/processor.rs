//! Conversion queue processor.
//!
//! Owns the pending jobs of a run and advances exactly one of them per
//! [`Processor::tick`]. The converter and the overwrite gate are injected so
//! the whole run can be driven without a user or an office suite present.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::selection::Selector;
use crate::{
    display_name, pdf_path_for, ArchiveSession, ConfirmationGate, ConversionOutcome, Converter,
    Error, LogEntry, ProgressReporter, Result, RunReport, RunState,
};

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A job was processed and more remain.
    Advanced,
    /// The queue is drained; the scheduler should stop.
    Finished,
}

/// Sequential converter for a batch of presentations.
pub struct Processor<C, G> {
    converter: C,
    gate: G,
    state: RunState,
    queue: VecDeque<PathBuf>,
    log: Vec<LogEntry>,
    progress: ProgressReporter,
    produced: Vec<PathBuf>,
    archive: Option<ArchiveSession>,
}

impl<C: Converter, G: ConfirmationGate> Processor<C, G> {
    /// Create an idle processor.
    pub fn new(converter: C, gate: G) -> Self {
        Self {
            converter,
            gate,
            state: RunState::Idle,
            queue: VecDeque::new(),
            log: Vec::new(),
            progress: ProgressReporter::new(),
            produced: Vec::new(),
            archive: None,
        }
    }

    /// Use a progress reporter with a listener attached.
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Enter `Selecting` from `Idle` or a completed run.
    pub fn begin_selection(&mut self) -> Result<()> {
        match self.state {
            RunState::Idle | RunState::Completed => {
                self.state = RunState::Selecting;
                Ok(())
            }
            actual => Err(Error::InvalidState {
                expected: "Idle or Completed",
                actual,
            }),
        }
    }

    /// Abandon selection and return to `Idle`.
    pub fn cancel_selection(&mut self) {
        if self.state == RunState::Selecting {
            log::info!("Selection cancelled");
            self.state = RunState::Idle;
        }
    }

    /// Run the selection flow and start the run if nothing was cancelled.
    ///
    /// Returns `Ok(false)` when the user cancelled either choice. An archive
    /// that cannot be opened aborts the run before any job is processed.
    pub fn launch<S, F>(
        &mut self,
        selector: &mut S,
        archive_requested: bool,
        open_archive: F,
    ) -> Result<bool>
    where
        S: Selector + ?Sized,
        F: FnOnce(&Path) -> Result<ArchiveSession>,
    {
        self.begin_selection()?;

        let sources = match selector.select_sources() {
            Some(sources) if !sources.is_empty() => sources,
            _ => {
                self.cancel_selection();
                return Ok(false);
            }
        };

        let archive = if archive_requested {
            let Some(destination) = selector.select_archive_destination() else {
                self.cancel_selection();
                return Ok(false);
            };
            match open_archive(&destination) {
                Ok(session) => Some(session),
                Err(e) => {
                    self.cancel_selection();
                    return Err(e);
                }
            }
        } else {
            None
        };

        self.start(sources, archive)?;
        Ok(true)
    }

    /// Begin a run over `jobs`, in order, optionally archiving the results.
    pub fn start(&mut self, jobs: Vec<PathBuf>, archive: Option<ArchiveSession>) -> Result<()> {
        if self.state == RunState::Running {
            return Err(Error::InvalidState {
                expected: "Idle, Selecting or Completed",
                actual: self.state,
            });
        }

        log::info!(
            "Starting conversion of {} file(s){}",
            jobs.len(),
            archive
                .as_ref()
                .map(|a| format!(", archiving to {}", a.path().display()))
                .unwrap_or_default()
        );

        self.queue = jobs.into();
        self.log.clear();
        self.produced.clear();
        self.progress.set_total(self.queue.len());
        self.archive = archive;
        self.state = RunState::Running;
        Ok(())
    }

    /// Process the next job. Once the queue is empty the run is finalized
    /// and every later call is a no-op returning [`Tick::Finished`].
    pub fn tick(&mut self) -> Tick {
        if self.state != RunState::Running {
            return Tick::Finished;
        }

        if let Some(source) = self.queue.pop_front() {
            self.process(source);
        }

        if self.queue.is_empty() {
            self.finish();
            Tick::Finished
        } else {
            Tick::Advanced
        }
    }

    fn process(&mut self, source: PathBuf) {
        let source = std::path::absolute(&source).unwrap_or(source);
        let source_name = display_name(&source);
        let target = pdf_path_for(&source);

        if target.exists() && !self.gate.confirm(&target) {
            log::info!("Skipping {}: {} exists", source_name, target.display());
            self.record(ConversionOutcome::Skipped { source_name });
            return;
        }

        log::debug!("Converting {} -> {}", source.display(), target.display());
        if let Err(e) = self.converter.convert(&source, &target) {
            log::warn!("Failed to convert {}: {}", source_name, e);
            self.record(ConversionOutcome::Failed {
                source_name,
                reason: e.to_string(),
            });
            return;
        }
        self.produced.push(target.clone());

        if let Some(archive) = self.archive.as_mut() {
            if let Err(e) = archive.write(&display_name(&target), &target) {
                log::warn!("Failed to archive {}: {}", target.display(), e);
                self.record(ConversionOutcome::Failed {
                    source_name,
                    reason: e.to_string(),
                });
                return;
            }
        }

        log::info!("Converted {}", source_name);
        self.record(ConversionOutcome::Converted {
            source_name,
            pdf_path: target,
        });
    }

    fn record(&mut self, outcome: ConversionOutcome) {
        self.log.push(LogEntry::Outcome(outcome));
        self.progress.advance();
    }

    fn finish(&mut self) {
        debug_assert!(self.progress.is_full());
        self.log.push(LogEntry::RunComplete);

        if let Some(archive) = self.archive.as_mut() {
            let path = archive.path().to_path_buf();
            let entry = match archive.close() {
                Ok(()) => LogEntry::ArchiveFinalized { path },
                Err(e) => {
                    log::error!("Failed to finalize archive {}: {}", path.display(), e);
                    LogEntry::ArchiveFailed {
                        path,
                        reason: e.to_string(),
                    }
                }
            };
            self.log.push(entry);
        }

        self.state = RunState::Completed;
        log::info!(
            "Conversion complete: {}/{} processed, {} produced",
            self.progress.current(),
            self.progress.total(),
            self.produced.len()
        );
    }
}

impl<C, G> Processor<C, G> {
    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The result log of the current or last run.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// `(current, total)` job counts.
    pub fn progress(&self) -> (usize, usize) {
        (self.progress.current(), self.progress.total())
    }

    /// PDFs produced so far, in processing order.
    pub fn produced(&self) -> &[PathBuf] {
        &self.produced
    }

    /// Jobs not yet processed.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Archive session of the current or last run, if archiving was requested.
    pub fn archive(&self) -> Option<&ArchiveSession> {
        self.archive.as_ref()
    }

    /// Snapshot of the run for the JSON report.
    pub fn report(&self) -> RunReport {
        RunReport {
            state: self.state,
            lines: self.log.iter().map(ToString::to_string).collect(),
            entries: self.log.clone(),
            current: self.progress.current(),
            total: self.progress.total(),
            produced: self.produced.clone(),
            archive: self.archive.as_ref().map(|a| a.path().to_path_buf()),
        }
    }
}
