//! Fixed-interval driver for [`Processor::tick`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::{ConfirmationGate, Converter, Processor, Tick};

/// Calls `tick` once per interval until the run finishes or is stopped.
///
/// The stop flag is only checked between ticks, so a job in progress always
/// runs to completion.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    stop: Arc<AtomicBool>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Scheduler {
    /// Create a scheduler with the default one-second interval.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Share a flag that stops the loop before the next tick when set.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Drive `processor` and return the number of ticks executed.
    pub fn run<C: Converter, G: ConfirmationGate>(&self, processor: &mut Processor<C, G>) -> usize {
        self.run_with(processor, |_| {})
    }

    /// Like [`Scheduler::run`], calling `after_tick` once each tick completes.
    pub fn run_with<C, G, F>(&self, processor: &mut Processor<C, G>, mut after_tick: F) -> usize
    where
        C: Converter,
        G: ConfirmationGate,
        F: FnMut(&Processor<C, G>),
    {
        let mut ticks = 0;
        loop {
            if self.stop.load(Ordering::SeqCst) {
                log::info!("Scheduler stopped after {} tick(s)", ticks);
                break;
            }

            ticks += 1;
            log::trace!("Tick {} ({} pending)", ticks, processor.pending());
            let tick = processor.tick();
            after_tick(processor);
            if tick == Tick::Finished {
                break;
            }

            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
        }
        ticks
    }
}
