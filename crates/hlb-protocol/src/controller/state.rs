//! Session lifecycle.

use serde::Serialize;

/// Lifecycle of a controller, orthogonal to the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Built, hardware not yet probed.
    Created,
    /// Probed and baselined; windows remain.
    Running,
    /// Every window has run.
    Finished,
}

impl Lifecycle {
    /// Returns true once the session has ended.
    pub fn is_finished(&self) -> bool {
        matches!(self, Lifecycle::Finished)
    }
}
