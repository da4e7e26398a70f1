//! Read-only views of the external allocator's state
//!
//! The generic register allocator owns assignment and liveness. During
//! hinting this layer only queries two things: where a virtual register
//! ended up, and whether a physical register is currently free of
//! interference. These minimal views model exactly that interface.

use std::collections::BTreeMap;
use tgc_codegen::{PhysReg, Reg, RegMask, VirtReg};

/// Virtual-to-physical assignment map maintained by the allocator.
#[derive(Debug, Clone, Default)]
pub struct VirtRegMap {
    assignments: BTreeMap<VirtReg, PhysReg>,
}

impl VirtRegMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, vreg: VirtReg, phys: PhysReg) {
        self.assignments.insert(vreg, phys);
    }

    pub fn phys(&self, vreg: VirtReg) -> Option<PhysReg> {
        self.assignments.get(&vreg).copied()
    }

    /// Resolve either kind of register to a physical one, if assigned.
    pub fn resolve(&self, reg: Reg) -> Option<PhysReg> {
        match reg {
            Reg::Phys(p) => Some(p),
            Reg::Virt(v) => self.phys(v),
        }
    }
}

/// Interference summary for the live ranges currently assigned.
#[derive(Debug, Clone, Default)]
pub struct LiveRegMatrix {
    occupied: RegMask,
}

impl LiveRegMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a physical register (alias closure included) as occupied by
    /// some live range.
    pub fn mark_occupied(&mut self, phys: PhysReg) {
        self.occupied.insert_with_aliases(phys);
    }

    /// True if assigning `phys` would not interfere with any live range.
    pub fn is_free(&self, phys: PhysReg) -> bool {
        !self.occupied.overlaps(phys)
    }
}
