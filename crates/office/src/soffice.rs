//! `soffice` command-line converter.

use ppt2pdf_core::{Converter, Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running conversion is polled when a timeout is set.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Converts presentations by running a headless office suite.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    /// Executable name or path.
    program: OsString,
    /// Kill the conversion after this long. `None` waits indefinitely.
    timeout: Option<Duration>,
}

impl Default for SofficeConverter {
    fn default() -> Self {
        Self {
            program: OsString::from("soffice"),
            timeout: None,
        }
    }
}

impl SofficeConverter {
    /// Create a converter that runs `soffice` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific office executable.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command(&self, source: &Path, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    fn wait(&self, child: &mut Child, source: &Path) -> Result<ExitStatus> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                log::warn!(
                    "Conversion of {} exceeded {:?}, killing converter",
                    source.display(),
                    timeout
                );
                // The child may exit on its own between the check and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout {
                    source_path: source.to_path_buf(),
                    seconds: timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Converter for SofficeConverter {
    fn convert(&mut self, source: &Path, target: &Path) -> Result<()> {
        let conversion_error = |reason: String| Error::Conversion {
            source_path: source.to_path_buf(),
            reason,
        };

        let out_dir = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        log::debug!(
            "Running {} for {}",
            self.program.to_string_lossy(),
            source.display()
        );
        let mut child = self.command(source, &out_dir).spawn().map_err(|e| {
            conversion_error(format!(
                "Failed to start {}: {}",
                self.program.to_string_lossy(),
                e
            ))
        })?;

        let status = self.wait(&mut child, source)?;
        log::debug!("Converter for {} exited with {}", source.display(), status);
        if !status.success() {
            return Err(conversion_error(format!("converter exited with {}", status)));
        }

        // The office suite replaces only the last extension of the source name.
        let produced = match source.with_extension("pdf").file_name() {
            Some(name) => out_dir.join(name),
            None => return Err(conversion_error("source has no file name".to_string())),
        };
        if !produced.exists() {
            return Err(conversion_error(format!(
                "no PDF was produced at {}",
                produced.display()
            )));
        }
        if produced != target {
            std::fs::rename(&produced, target)?;
        }

        Ok(())
    }
}
