//! Cooperative progress reporting and cancellation
//!
//! Run time grows as `2^Q` per layer and `2^n` runs per measurement group,
//! so an embedding editor may want to show progress or abandon a run. The
//! simulator calls the observer between layers and between histogram
//! assignments; returning [`ControlFlow::Break`] stops the run with
//! [`SimulatorError::Cancelled`](crate::SimulatorError::Cancelled).

use qlogic_core::MeasureGroup;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Hook called at layer and assignment granularity
pub trait ProgressObserver: Send {
    /// About to apply layer `layer` of `total`
    fn on_layer(&mut self, _layer: usize, _total: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// About to run assignment `index` of `total` for `group`
    fn on_assignment(&mut self, _group: MeasureGroup, _index: usize, _total: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Observer that never interrupts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Cancels the run once the shared flag is raised
///
/// Clone the flag into another thread (a UI event handler, a timer) and
/// call [`CancelFlag::cancel`] there.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Lower the flag so the simulator can run again
    pub fn clear(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    fn check(&self) -> ControlFlow<()> {
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl ProgressObserver for CancelFlag {
    fn on_layer(&mut self, _layer: usize, _total: usize) -> ControlFlow<()> {
        self.check()
    }

    fn on_assignment(&mut self, _group: MeasureGroup, _index: usize, _total: usize) -> ControlFlow<()> {
        self.check()
    }
}
