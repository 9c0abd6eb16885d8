//! The external conversion service boundary.

use std::path::Path;

use crate::Result;

/// Produces a PDF at `target` from the presentation at `source`.
///
/// Implementations report failure through the returned error; the processor
/// records it as a failed job and moves on to the next one.
pub trait Converter {
    fn convert(&mut self, source: &Path, target: &Path) -> Result<()>;
}
