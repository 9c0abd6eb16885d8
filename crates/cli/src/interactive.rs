//! Terminal stand-ins for the file dialogs and the overwrite prompt.

use indicatif::ProgressBar;
use ppt2pdf_core::{filter_presentations, ConfirmationGate, OverwritePolicy, Selector};
use std::io::{self, Cursor, IsTerminal, Write};
use std::path::{Path, PathBuf};

/// Line-oriented answers to the prompts.
pub trait LineSource {
    /// Next trimmed line, or `None` once input is closed.
    fn next_line(&mut self) -> Option<String>;
}

impl LineSource for io::Stdin {
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl LineSource for Cursor<&str> {
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::BufRead::read_line(self, &mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

/// Selection taken from the command line, asking for the archive path
/// on stdin when `--zip` was given without one.
pub struct ArgsSelector<R> {
    pub inputs: Vec<PathBuf>,
    pub zip: Option<PathBuf>,
    pub input: R,
}

impl<R: LineSource> Selector for ArgsSelector<R> {
    fn select_sources(&mut self) -> Option<Vec<PathBuf>> {
        let sources = filter_presentations(std::mem::take(&mut self.inputs));
        if sources.is_empty() {
            None
        } else {
            Some(sources)
        }
    }

    fn select_archive_destination(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.zip.take() {
            return Some(path);
        }

        eprint!("Save zip file as: ");
        let _ = io::stderr().flush();
        let answer = self.input.next_line()?;
        if answer.is_empty() {
            None
        } else {
            Some(with_zip_extension(PathBuf::from(answer)))
        }
    }
}

fn with_zip_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("zip")
    }
}

/// Asks on the terminal before replacing an existing PDF.
pub struct TerminalGate<R> {
    input: R,
    bar: ProgressBar,
}

impl<R: LineSource> TerminalGate<R> {
    pub fn new(input: R, bar: ProgressBar) -> Self {
        Self { input, bar }
    }
}

impl<R: LineSource> ConfirmationGate for TerminalGate<R> {
    fn confirm(&mut self, target: &Path) -> bool {
        let Self { input, bar } = self;
        let answer = bar.suspend(|| {
            eprint!(
                "A PDF file with the name '{}' already exists. Overwrite? [y/N] ",
                target.display()
            );
            let _ = io::stderr().flush();
            input.next_line()
        });

        matches!(
            answer.as_deref().map(str::to_lowercase).as_deref(),
            Some("y" | "yes")
        )
    }
}

/// Overwrite decision chosen from the command-line flags.
pub enum Gate {
    Policy(OverwritePolicy),
    Ask(TerminalGate<io::Stdin>),
}

impl Gate {
    /// Ask when stdin is a terminal, otherwise keep existing PDFs.
    pub fn from_flags(overwrite: bool, skip_existing: bool, bar: &ProgressBar) -> Self {
        if overwrite {
            Self::Policy(OverwritePolicy::Always)
        } else if skip_existing {
            Self::Policy(OverwritePolicy::Never)
        } else if io::stdin().is_terminal() {
            Self::Ask(TerminalGate::new(io::stdin(), bar.clone()))
        } else {
            log::warn!("stdin is not a terminal; existing PDFs will be skipped");
            Self::Policy(OverwritePolicy::Never)
        }
    }
}

impl ConfirmationGate for Gate {
    fn confirm(&mut self, target: &Path) -> bool {
        match self {
            Self::Policy(policy) => policy.confirm(target),
            Self::Ask(gate) => gate.confirm(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_filters_inputs() {
        let mut selector = ArgsSelector {
            inputs: vec![PathBuf::from("a.pptx"), PathBuf::from("b.docx")],
            zip: None,
            input: Cursor::new(""),
        };
        assert_eq!(selector.select_sources(), Some(vec![PathBuf::from("a.pptx")]));
    }

    #[test]
    fn test_selector_without_presentations_cancels() {
        let mut selector = ArgsSelector {
            inputs: vec![PathBuf::from("b.docx")],
            zip: None,
            input: Cursor::new(""),
        };
        assert_eq!(selector.select_sources(), None);
    }

    #[test]
    fn test_archive_destination_from_flag() {
        let mut selector = ArgsSelector {
            inputs: Vec::new(),
            zip: Some(PathBuf::from("out.zip")),
            input: Cursor::new(""),
        };
        assert_eq!(
            selector.select_archive_destination(),
            Some(PathBuf::from("out.zip"))
        );
    }

    #[test]
    fn test_archive_destination_prompt() {
        let mut selector = ArgsSelector {
            inputs: Vec::new(),
            zip: None,
            input: Cursor::new("decks\n"),
        };
        assert_eq!(
            selector.select_archive_destination(),
            Some(PathBuf::from("decks.zip"))
        );

        let mut cancelled = ArgsSelector {
            inputs: Vec::new(),
            zip: None,
            input: Cursor::new("\n"),
        };
        assert_eq!(cancelled.select_archive_destination(), None);

        let mut closed = ArgsSelector {
            inputs: Vec::new(),
            zip: None,
            input: Cursor::new(""),
        };
        assert_eq!(closed.select_archive_destination(), None);
    }

    #[test]
    fn test_terminal_gate_answers() {
        let answers = Cursor::new("y\nno\nYES\n\n");
        let mut gate = TerminalGate::new(answers, ProgressBar::hidden());
        let target = Path::new("a.pdf");

        assert!(gate.confirm(target));
        assert!(!gate.confirm(target));
        assert!(gate.confirm(target));
        assert!(!gate.confirm(target));
        // Closed input never overwrites.
        assert!(!gate.confirm(target));
    }
}
