//! Test doubles shared by the unit tests of this crate.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{ArchiveSession, ArchiveWriter, Converter, Error, Result};

/// Writes a stub PDF to the target, failing for configured source names.
#[derive(Clone, Default)]
pub struct FakeConverter {
    failing: HashSet<String>,
    calls: Rc<RefCell<Vec<PathBuf>>>,
}

impl FakeConverter {
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl Converter for FakeConverter {
    fn convert(&mut self, source: &Path, target: &Path) -> Result<()> {
        self.calls.borrow_mut().push(source.to_path_buf());
        let name = crate::display_name(source);
        if self.failing.contains(&name) {
            return Err(Error::Conversion {
                source_path: source.to_path_buf(),
                reason: "converter crashed".to_string(),
            });
        }
        std::fs::write(target, format!("%PDF-1.4 {}", name))?;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryState {
    entries: Vec<(String, Vec<u8>)>,
    finished: usize,
    fail_writes: bool,
}

/// In-memory archive backend that records entries and finish calls.
#[derive(Clone, Default)]
pub struct MemoryArchive {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryArchive {
    pub fn failing_writes(self) -> Self {
        self.state.borrow_mut().fail_writes = true;
        self
    }

    pub fn session(&self, path: &str) -> ArchiveSession {
        let writer = self.clone();
        ArchiveSession::open(path, move |_| Ok(Box::new(writer) as Box<dyn ArchiveWriter>))
            .unwrap()
    }

    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        self.state.borrow().entries.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }

    pub fn finish_count(&self) -> usize {
        self.state.borrow().finished
    }
}

impl ArchiveWriter for MemoryArchive {
    fn add_file(&mut self, entry: &str, source: &Path) -> Result<()> {
        if self.state.borrow().fail_writes {
            return Err(Error::ArchiveWrite {
                entry: entry.to_string(),
                reason: "disk full".to_string(),
            });
        }
        let bytes = std::fs::read(source)?;
        self.state
            .borrow_mut()
            .entries
            .push((entry.to_string(), bytes));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.state.borrow_mut().finished += 1;
        Ok(())
    }
}
