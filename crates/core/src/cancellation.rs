//! Cooperative cancellation for long-running CCP/SRFD searches.
//!
//! The branching search in [`crate::ccp`] can in principle explore
//! exponentially many reticulation choices; callers that need a time
//! budget (the CLI's `--timeout`, or a caller embedding this crate in a
//! service with its own deadline) implement [`Cancellation`] and pass it
//! through [`crate::options::CcpOptions`]. The driver checks it once per
//! recursive branch, never inside the tight per-node leaf-set walk.

use crate::error::{PhyloError, Result};

/// A cooperative cancellation source. Checked at coarse intervals (once
/// per branch point, not once per node) so the check itself never
/// dominates the work it's guarding.
pub trait Cancellation {
    /// Return `Err` to abort the search at the next checkpoint.
    fn check(&self) -> Result<()>;
}

/// A [`Cancellation`] that never fires — the default for callers with no
/// deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// A [`Cancellation`] backed by a wall-clock deadline.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: std::time::Instant,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: std::time::Duration) -> Self {
        Self {
            at: std::time::Instant::now() + timeout,
        }
    }
}

impl Cancellation for Deadline {
    fn check(&self) -> Result<()> {
        if std::time::Instant::now() >= self.at {
            return Err(PhyloError::Cancelled);
        }
        Ok(())
    }
}
