//! Per-function compilation state
//!
//! [`FunctionInfo`] is the one mutable piece of this layer. It is owned by
//! the compilation of a single function, is never shared across functions
//! or threads, and is discarded when that compilation ends. Everything the
//! policy queries need — attributes, frame objects, virtual register
//! classes, copy hints, physical usage — lives here.

use crate::error::RegInfoError;
use std::collections::BTreeMap;
use tgc_codegen::{CallConv, FrameIndex, PhysReg, Reg, RegClassId, RegMask, StackOffset, VirtReg};

/// Which base register the frame layout chose for a stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBase {
    /// Address relative to the frame pointer.
    FramePointer,
    /// Address relative to the stack pointer.
    StackPointer,
    /// Address relative to the designated private-memory base register.
    PrivateMemory,
}

/// One stack slot as decided by the frame layout pass: its offset from
/// the chosen base and the base policy itself. This layer only legalizes
/// the addressing; it never moves slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameObject {
    pub offset: StackOffset,
    pub base: FrameBase,
}

/// Per-function state consumed and updated by the register policy layer.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    name: String,
    call_conv: CallConv,
    needs_frame_pointer: bool,
    /// Desired resident warps per core. High targets compress the
    /// per-warp register budget and select the constrained cost table.
    occupancy_target: u32,
    frame_objects: Vec<FrameObject>,
    reserved_spill_slots: BTreeMap<PhysReg, FrameIndex>,
    vreg_classes: BTreeMap<VirtReg, RegClassId>,
    copy_hints: BTreeMap<VirtReg, Reg>,
    used_phys: RegMask,
}

impl FunctionInfo {
    pub fn new(name: impl Into<String>, call_conv: CallConv) -> Self {
        Self {
            name: name.into(),
            call_conv,
            needs_frame_pointer: false,
            occupancy_target: 1,
            frame_objects: Vec::new(),
            reserved_spill_slots: BTreeMap::new(),
            vreg_classes: BTreeMap::new(),
            copy_hints: BTreeMap::new(),
            used_phys: RegMask::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call_conv(&self) -> CallConv {
        self.call_conv
    }

    pub fn needs_frame_pointer(&self) -> bool {
        self.needs_frame_pointer
    }

    pub fn set_needs_frame_pointer(&mut self, needed: bool) {
        self.needs_frame_pointer = needed;
    }

    pub fn occupancy_target(&self) -> u32 {
        self.occupancy_target
    }

    pub fn set_occupancy_target(&mut self, warps: u32) {
        self.occupancy_target = warps;
    }

    /// Record a stack slot decided by the frame layout pass.
    pub fn add_frame_object(&mut self, offset: StackOffset, base: FrameBase) -> FrameIndex {
        let index = FrameIndex(self.frame_objects.len());
        self.frame_objects.push(FrameObject { offset, base });
        index
    }

    pub fn frame_object(&self, index: FrameIndex) -> Result<&FrameObject, RegInfoError> {
        self.frame_objects
            .get(index.0)
            .ok_or(RegInfoError::UnknownFrameIndex(index.0))
    }

    /// Pre-assign a fixed spill slot to a physical register, as mandated
    /// by the ABI for registers with fixed spill behavior.
    pub fn set_reserved_spill_slot(&mut self, reg: PhysReg, slot: FrameIndex) {
        self.reserved_spill_slots.insert(reg, slot);
    }

    pub fn reserved_spill_slot(&self, reg: PhysReg) -> Option<FrameIndex> {
        self.reserved_spill_slots.get(&reg).copied()
    }

    /// Assign a virtual register's class. A class is assigned once and
    /// never changes within one compilation.
    pub fn set_vreg_class(&mut self, vreg: VirtReg, class: RegClassId) {
        self.vreg_classes.insert(vreg, class);
    }

    pub fn vreg_class(&self, vreg: VirtReg) -> Option<RegClassId> {
        self.vreg_classes.get(&vreg).copied()
    }

    /// Record a copy relation the allocator may exploit: `vreg` was
    /// copied from/to `other`.
    pub fn add_copy_hint(&mut self, vreg: VirtReg, other: Reg) {
        self.copy_hints.insert(vreg, other);
    }

    pub fn copy_hint(&self, vreg: VirtReg) -> Option<Reg> {
        self.copy_hints.get(&vreg).copied()
    }

    /// Record that an instruction references `reg` (alias closure
    /// included).
    pub fn note_phys_use(&mut self, reg: PhysReg) {
        self.used_phys.insert_with_aliases(reg);
    }

    /// True if `reg` or anything it overlaps has been referenced.
    pub fn is_phys_used(&self, reg: PhysReg) -> bool {
        self.used_phys.overlaps(reg)
    }
}
