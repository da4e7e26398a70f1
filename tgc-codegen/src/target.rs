//! Tide Target Configuration
//!
//! Immutable once constructed; shared read-only across every function
//! compiled for the target.

use crate::class::RegClassTable;
use crate::regs::PhysReg;

/// Global target configuration: the class table plus the handful of
/// designated registers and layout parameters the policy layer needs.
#[derive(Debug, Clone)]
pub struct TideTarget {
    classes: RegClassTable,
    private_mem_base: PhysReg,
    stack_align: u64,
}

impl TideTarget {
    /// The standard Tide configuration.
    ///
    /// Private memory is conceptually addressed off the thread pointer,
    /// but the private-memory access instructions are encoded against the
    /// vector register file, so the target designates a fixed vector
    /// register that mirrors it.
    pub fn new() -> Self {
        Self {
            classes: RegClassTable::tide(),
            private_mem_base: PhysReg::V(31),
            stack_align: 16,
        }
    }

    pub fn classes(&self) -> &RegClassTable {
        &self.classes
    }

    /// The designated private-memory base register.
    pub fn private_mem_base(&self) -> PhysReg {
        self.private_mem_base
    }

    /// Guaranteed alignment of the stack and private-memory base
    /// registers, in bytes.
    pub fn stack_align(&self) -> u64 {
        self.stack_align
    }
}

impl Default for TideTarget {
    fn default() -> Self {
        Self::new()
    }
}
