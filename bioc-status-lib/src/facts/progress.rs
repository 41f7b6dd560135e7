/// Receives progress updates from long-running collection work.
pub trait Progress: Send + Sync {
    /// Start a new phase (e.g. "Build status") made of `total` steps.
    fn set_phase(&self, phase: &str, total: u64);

    /// Mark one step of the current phase as finished.
    fn advance(&self, item: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// A [`Progress`] that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_phase(&self, _phase: &str, _total: u64) {}

    fn advance(&self, _item: &str) {}

    fn done(&self) {}
}
