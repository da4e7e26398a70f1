//! Tide Calling Convention Data
//!
//! Register Usage:
//! - x0: zero register
//! - x1: return address
//! - x2/x3/x4: stack pointer, global pointer, thread pointer
//! - x5-x7, x28-x31: scalar temporaries (caller-saved)
//! - x10-x17: scalar arguments/results
//! - x8, x9, x18-x27: scalar saved registers (callee-saved)
//! - f8, f9, f18-f27: float saved registers (callee-saved)
//! - v0-v31: per-lane vector file; kernel arguments ascend from v0
//!
//! The kernel-entry convention manages the divergent file per sub-program
//! instead of across calls, so its preserved set covers the scalar file
//! only and its callee-saved list is empty.

use crate::regs::PhysReg;

/// Calling conventions known to the Tide backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConv {
    /// Ordinary function call.
    Tide,
    /// Kernel entry point.
    Kernel,
}

/// Callee-saved registers of the ordinary convention, in save/restore
/// order. The order is part of the ABI: prologue/epilogue generation
/// walks it as-is.
pub const TIDE_CALLEE_SAVED: &[PhysReg] = &[
    PhysReg::X(1),
    PhysReg::X(8),
    PhysReg::X(9),
    PhysReg::X(18),
    PhysReg::X(19),
    PhysReg::X(20),
    PhysReg::X(21),
    PhysReg::X(22),
    PhysReg::X(23),
    PhysReg::X(24),
    PhysReg::X(25),
    PhysReg::X(26),
    PhysReg::X(27),
    PhysReg::F(8),
    PhysReg::F(9),
    PhysReg::F(18),
    PhysReg::F(19),
    PhysReg::F(20),
    PhysReg::F(21),
    PhysReg::F(22),
    PhysReg::F(23),
    PhysReg::F(24),
    PhysReg::F(25),
    PhysReg::F(26),
    PhysReg::F(27),
];

/// Kernel entries have no caller to restore for.
pub const KERNEL_CALLEE_SAVED: &[PhysReg] = &[];

/// Registers a kernel-internal call is guaranteed not to clobber:
/// the scalar saved file only, never the divergent file.
pub const KERNEL_PRESERVED: &[PhysReg] = &[
    PhysReg::X(1),
    PhysReg::X(8),
    PhysReg::X(9),
    PhysReg::X(18),
    PhysReg::X(19),
    PhysReg::X(20),
    PhysReg::X(21),
    PhysReg::X(22),
    PhysReg::X(23),
    PhysReg::X(24),
    PhysReg::X(25),
    PhysReg::X(26),
    PhysReg::X(27),
];

/// Save/restore order for a convention.
pub fn callee_saved(conv: CallConv) -> &'static [PhysReg] {
    match conv {
        CallConv::Tide => TIDE_CALLEE_SAVED,
        CallConv::Kernel => KERNEL_CALLEE_SAVED,
    }
}

/// Registers preserved across a call under a convention.
pub fn preserved(conv: CallConv) -> &'static [PhysReg] {
    match conv {
        CallConv::Tide => TIDE_CALLEE_SAVED,
        CallConv::Kernel => KERNEL_PRESERVED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_callee_saved_order_is_stable() {
        assert_eq!(callee_saved(CallConv::Tide), callee_saved(CallConv::Tide));
        assert_eq!(callee_saved(CallConv::Tide)[0], PhysReg::RA);
        assert!(callee_saved(CallConv::Kernel).is_empty());
    }

    #[test]
    fn test_kernel_preserves_no_vector_registers() {
        assert!(preserved(CallConv::Kernel).iter().all(|r| !r.is_vector()));
        // The ordinary convention preserves the float saved file too.
        assert!(preserved(CallConv::Tide).contains(&PhysReg::F(8)));
        assert!(!preserved(CallConv::Kernel).contains(&PhysReg::F(8)));
    }
}
