//! File and archive-destination selection that precedes a run.

use std::path::PathBuf;

use crate::PresentationFormat;

/// Source of the user's choices while a run is in the `Selecting` state.
///
/// Returning `None` from either method cancels the run before it starts.
pub trait Selector {
    /// Presentation files to convert, in selection order.
    fn select_sources(&mut self) -> Option<Vec<PathBuf>>;

    /// Where to write the archive, when archiving was requested.
    fn select_archive_destination(&mut self) -> Option<PathBuf>;
}

/// Keep only `.ppt`/`.pptx` files, preserving order.
pub fn filter_presentations<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter(|path| {
            let accepted = PresentationFormat::from_path(path).is_some();
            if !accepted {
                log::warn!("Ignoring {}: not a PowerPoint file", path.display());
            }
            accepted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_order_and_presentations() {
        let paths = vec![
            PathBuf::from("b.PPT"),
            PathBuf::from("notes.txt"),
            PathBuf::from("a.pptx"),
            PathBuf::from("archive"),
        ];
        assert_eq!(
            filter_presentations(paths),
            vec![PathBuf::from("b.PPT"), PathBuf::from("a.pptx")]
        );
    }
}
