//! Tunables shared by the CCP driver and the SRFD driver.

use crate::cancellation::{Cancellation, NeverCancel};

/// Options controlling a single [`crate::ccp::contains`] (or
/// [`crate::ccp::contains_with`]) call.
pub struct CcpOptions<C: Cancellation = NeverCancel> {
    /// Checked once per branch point in the splitter.
    pub cancellation: C,
}

impl Default for CcpOptions<NeverCancel> {
    fn default() -> Self {
        Self {
            cancellation: NeverCancel,
        }
    }
}

impl<C: Cancellation> CcpOptions<C> {
    pub fn with_cancellation(cancellation: C) -> Self {
        Self { cancellation }
    }
}

/// Options controlling an [`crate::srfd::distance`] run.
#[derive(Debug, Clone, Copy)]
pub struct SrfdOptions {
    /// Run the `2^n - 2` subset evaluations across a Rayon thread pool.
    /// Only meaningful when built with the `parallel` feature; ignored
    /// otherwise.
    pub parallel: bool,
}

impl Default for SrfdOptions {
    fn default() -> Self {
        Self { parallel: cfg!(feature = "parallel") }
    }
}
