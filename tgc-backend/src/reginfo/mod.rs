//! Register Information for the Tide backend
//!
//! The public API is [`RegisterInfo`], a thin facade over the immutable
//! target configuration. Its methods are grouped by concern:
//!
//! - `classify` - semantic register banks derived from raw class flags
//! - `reserved` - reserved sets, callee-saved lists, preserved masks
//! - `hints` - allocation ordering advice for the generic allocator
//! - `usage` - per-sub-program register resource accounting
//!
//! All queries are read-only with respect to the target; mutable state is
//! confined to the caller-owned `FunctionInfo` and usage accumulators.

mod classify;
mod hints;
mod reserved;
mod usage;

pub use classify::RegBank;
pub use usage::SubProgramUsage;

use tgc_codegen::TideTarget;

/// Register information and policy queries for one target.
///
/// Cheap to construct and to copy around; holds only a borrow of the
/// shared target configuration.
#[derive(Debug, Clone, Copy)]
pub struct RegisterInfo<'t> {
    target: &'t TideTarget,
}

impl<'t> RegisterInfo<'t> {
    pub fn new(target: &'t TideTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'t TideTarget {
        self.target
    }
}
