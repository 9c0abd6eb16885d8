//! Bounded progress counter for a conversion run.

/// Receives progress updates; purely observational.
pub trait ProgressListener {
    /// Called after every change with the new `(current, total)` pair.
    fn on_progress(&mut self, current: usize, total: usize);
}

/// Counter in `0..=total`, never decreasing while a run is active.
#[derive(Default)]
pub struct ProgressReporter {
    current: usize,
    total: usize,
    listener: Option<Box<dyn ProgressListener>>,
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("current", &self.current)
            .field("total", &self.total)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener notified on every update.
    pub fn with_listener(mut self, listener: impl ProgressListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Reset to `0` of `total`.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current = 0;
        self.notify();
    }

    /// Advance by one, saturating at the total.
    pub fn advance(&mut self) {
        if self.current < self.total {
            self.current += 1;
        }
        self.notify();
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_full(&self) -> bool {
        self.current == self.total
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(self.current, self.total);
        }
    }
}
