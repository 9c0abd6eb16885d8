//! CLI tool for converting PowerPoint files to PDF in batches.

mod interactive;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use interactive::{ArgsSelector, Gate};
use ppt2pdf_core::{
    ConversionOutcome, LogEntry, Processor, ProgressListener, ProgressReporter, Scheduler,
};
use ppt2pdf_office::SofficeConverter;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Convert PowerPoint files (.ppt/.pptx) to PDF, one at a time.
#[derive(Parser, Debug)]
#[command(name = "ppt2pdf")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file(s) (.ppt or .pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Compress the converted PDFs into a zip archive (`--zip=out.zip`).
    ///
    /// Without a path, the destination is asked on stdin.
    #[arg(short, long, num_args = 0..=1, require_equals = true, value_name = "PATH")]
    zip: Option<Option<PathBuf>>,

    /// Overwrite existing PDFs without asking
    #[arg(long, conflicts_with = "skip_existing")]
    overwrite: bool,

    /// Keep existing PDFs without asking
    #[arg(long)]
    skip_existing: bool,

    /// Delay between conversions in milliseconds
    #[arg(long, default_value = "1000")]
    interval_ms: u64,

    /// Office executable used for conversion
    #[arg(long, default_value = "soffice")]
    soffice: PathBuf,

    /// Give up on a single conversion after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Do not show a progress bar
    #[arg(long)]
    no_progress: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Mirrors the processor's progress counter onto a terminal bar.
struct BarListener(ProgressBar);

impl ProgressListener for BarListener {
    fn on_progress(&mut self, current: usize, total: usize) {
        self.0.set_length(total as u64);
        self.0.set_position(current as u64);
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let bar = progress_bar(args.no_progress || args.json);

    let mut converter = SofficeConverter::new().with_program(&args.soffice);
    if let Some(secs) = args.timeout_secs {
        converter = converter.with_timeout(Duration::from_secs(secs));
    }
    let gate = Gate::from_flags(args.overwrite, args.skip_existing, &bar);
    let progress = ProgressReporter::new().with_listener(BarListener(bar.clone()));
    let mut processor = Processor::new(converter, gate).with_progress(progress);

    let archive_requested = args.zip.is_some();
    let mut selector = ArgsSelector {
        inputs: args.input.clone(),
        zip: args.zip.clone().flatten(),
        input: io::stdin(),
    };

    let started = processor
        .launch(&mut selector, archive_requested, ppt2pdf_archive::open_session)
        .context("Failed to start conversion")?;
    if !started {
        bar.finish_and_clear();
        eprintln!("Nothing to convert.");
        return Ok(ExitCode::SUCCESS);
    }

    let scheduler = Scheduler::new().with_interval(Duration::from_millis(args.interval_ms));
    let mut printed = 0;
    scheduler.run_with(&mut processor, |p| {
        for entry in &p.log()[printed..] {
            if args.json {
                continue;
            }
            if bar.is_hidden() {
                println!("{}", entry);
            } else {
                bar.println(entry.to_string());
            }
        }
        printed = p.log().len();
    });
    bar.finish_and_clear();

    if args.json {
        let report = serde_json::to_string_pretty(&processor.report())
            .context("Failed to serialize run report")?;
        println!("{}", report);
    }

    let failed = processor.log().iter().any(|entry| {
        matches!(
            entry,
            LogEntry::Outcome(ConversionOutcome::Failed { .. }) | LogEntry::ArchiveFailed { .. }
        )
    });
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Progress bar for the run, hidden when disabled or not on a terminal.
fn progress_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template("{bar:40.green/238} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_flag_forms() {
        let args = Args::try_parse_from(["ppt2pdf", "a.pptx"]).unwrap();
        assert_eq!(args.zip, None);

        let args = Args::try_parse_from(["ppt2pdf", "--zip", "a.pptx"]).unwrap();
        assert_eq!(args.zip, Some(None));
        assert_eq!(args.input, vec![PathBuf::from("a.pptx")]);

        let args = Args::try_parse_from(["ppt2pdf", "--zip=out.zip", "a.pptx", "b.ppt"]).unwrap();
        assert_eq!(args.zip, Some(Some(PathBuf::from("out.zip"))));
        assert_eq!(args.input.len(), 2);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["ppt2pdf", "a.pptx"]).unwrap();
        assert_eq!(args.interval_ms, 1000);
        assert_eq!(args.soffice, PathBuf::from("soffice"));
        assert_eq!(args.timeout_secs, None);
        assert!(!args.overwrite && !args.skip_existing);
    }

    #[test]
    fn test_overwrite_conflicts_with_skip() {
        let parsed =
            Args::try_parse_from(["ppt2pdf", "--overwrite", "--skip-existing", "a.pptx"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["ppt2pdf"]).is_err());
    }
}
