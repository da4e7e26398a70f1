//! Reserved and Preserved Register Computation
//!
//! Reserved registers are never assignable by the allocator for the
//! current function; preserved masks tell call lowering what survives a
//! call under a given convention. Everything here is a pure function of
//! the function attributes and the target configuration.

use super::RegisterInfo;
use crate::function::FunctionInfo;
use log::trace;
use tgc_codegen::{abi, CallConv, FrameIndex, PhysReg, RegMask};

impl RegisterInfo<'_> {
    /// Registers the allocator must never assign for this function.
    ///
    /// Always the zero register, the stack/global/thread pointers and the
    /// private-memory base; the frame pointer joins when the function
    /// needs one. Alias closure is applied so that reserving a vector
    /// register also fences off the pair containing it; the sibling
    /// element stays allocatable.
    pub fn reserved_regs(&self, func: &FunctionInfo) -> RegMask {
        let mut reserved = RegMask::new();
        reserved.insert_with_aliases(PhysReg::ZERO);
        reserved.insert_with_aliases(PhysReg::SP);
        reserved.insert_with_aliases(PhysReg::GP);
        reserved.insert_with_aliases(PhysReg::TP);
        reserved.insert_with_aliases(self.target().private_mem_base());
        if func.needs_frame_pointer() {
            reserved.insert_with_aliases(PhysReg::FP);
        }
        trace!(
            "reserved set for '{}': {} registers (fp {})",
            func.name(),
            reserved.len(),
            if func.needs_frame_pointer() { "reserved" } else { "allocatable" },
        );
        reserved
    }

    pub fn is_reserved(&self, func: &FunctionInfo, reg: PhysReg) -> bool {
        self.reserved_regs(func).contains(reg)
    }

    /// Inline assembly may clobber anything that is not reserved.
    pub fn is_asm_clobberable(&self, func: &FunctionInfo, reg: PhysReg) -> bool {
        !self.is_reserved(func, reg)
    }

    /// Callee-saved registers in save/restore order. Stable across calls
    /// with identical input; prologue/epilogue generation relies on it.
    pub fn callee_saved_regs(&self, func: &FunctionInfo) -> &'static [PhysReg] {
        abi::callee_saved(func.call_conv())
    }

    /// One bit per physical register, set iff a call under `conv` is
    /// guaranteed not to clobber it.
    pub fn call_preserved_mask(&self, _func: &FunctionInfo, conv: CallConv) -> RegMask {
        abi::preserved(conv).iter().copied().collect()
    }

    /// The all-clobbered mask, for calls with no guarantees at all.
    pub fn no_preserved_mask(&self) -> RegMask {
        RegMask::NONE
    }

    /// The statically pre-assigned spill slot of `reg`, if the ABI
    /// mandates one. The slot still flows through frame-index
    /// elimination like any other; this only bypasses slot selection.
    pub fn has_reserved_spill_slot(
        &self,
        func: &FunctionInfo,
        reg: PhysReg,
    ) -> Option<FrameIndex> {
        func.reserved_spill_slot(reg)
    }
}
