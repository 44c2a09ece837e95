/// Receives progress of a long-running transfer.
///
/// Called synchronously from the transfer loop, so implementations should
/// only update in-memory state or redraw a terminal line.
pub trait ProgressReporter: Send + Sync {
    fn on_start(&self, name: &str, total: Option<u64>);
    fn on_progress(&self, name: &str, current: u64, total: Option<u64>);
    fn on_complete(&self, name: &str, total: u64);
}
