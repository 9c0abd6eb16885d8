//! Overwrite confirmation for targets that already exist.

use std::path::Path;

/// Decides whether an existing PDF may be overwritten.
///
/// Called synchronously, once per conflicting target, from inside a tick.
pub trait ConfirmationGate {
    /// Returns `true` to overwrite `target`, `false` to skip the job.
    fn confirm(&mut self, target: &Path) -> bool;
}

/// Fixed answer for non-interactive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    Always,
    #[default]
    Never,
}

impl ConfirmationGate for OverwritePolicy {
    fn confirm(&mut self, target: &Path) -> bool {
        let overwrite = *self == Self::Always;
        log::debug!(
            "Overwrite policy {:?} for {}: {}",
            self,
            target.display(),
            if overwrite { "overwrite" } else { "skip" }
        );
        overwrite
    }
}

impl<F> ConfirmationGate for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm(&mut self, target: &Path) -> bool {
        self(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        assert!(OverwritePolicy::Always.confirm(Path::new("a.pdf")));
        assert!(!OverwritePolicy::Never.confirm(Path::new("a.pdf")));
        assert_eq!(OverwritePolicy::default(), OverwritePolicy::Never);
    }

    #[test]
    fn test_closure_gate_sees_target() {
        let mut asked = Vec::new();
        let mut gate = |target: &Path| {
            asked.push(target.to_path_buf());
            target.ends_with("keep.pdf")
        };

        assert!(gate.confirm(Path::new("/tmp/keep.pdf")));
        assert!(!gate.confirm(Path::new("/tmp/other.pdf")));
        drop(gate);
        assert_eq!(asked.len(), 2);
    }
}
