//! Allocation Hinting
//!
//! Read-only advice for the generic allocator: scratch-register searches,
//! cost table selection, copy-coalescing hints and live-range widening.
//! An empty answer is a normal outcome here, never a failure; the
//! allocator falls back to its default order.

use super::classify::RegBank;
use super::RegisterInfo;
use crate::error::RegInfoError;
use crate::function::FunctionInfo;
use crate::regalloc::{LiveRegMatrix, VirtRegMap};
use log::trace;
use tgc_codegen::{class, PhysReg, RegClassId, VirtReg};

/// Vector registers kept out of the ordinary search so late passes
/// (offset legalization scratch) still find something free.
const HIGH_VECTOR_KEEPOUT: u8 = 2;

fn in_high_vector_keepout(reg: PhysReg) -> bool {
    let limit = PhysReg::FILE_SIZE - HIGH_VECTOR_KEEPOUT;
    match reg {
        PhysReg::V(n) => n >= limit,
        PhysReg::V2(n) => n + 1 >= limit,
        _ => false,
    }
}

impl RegisterInfo<'_> {
    /// First register of `class` that is neither reserved nor referenced
    /// anywhere in the function, searching in allocation priority order.
    ///
    /// With `reserve_highest_vector` set the highest-numbered vector
    /// registers are skipped, keeping them free for emergency scratch.
    /// `None` is an expected outcome the caller must handle.
    pub fn find_unused_register(
        &self,
        class: RegClassId,
        func: &FunctionInfo,
        reserve_highest_vector: bool,
    ) -> Result<Option<PhysReg>, RegInfoError> {
        let desc = self.target().classes().get(class)?;
        let reserved = self.reserved_regs(func);
        Ok(desc
            .members
            .iter()
            .copied()
            .filter(|&reg| !(reserve_highest_vector && in_high_vector_keepout(reg)))
            .find(|&reg| !reserved.contains(reg) && !func.is_phys_used(reg)))
    }

    /// Which precomputed allocation-order/cost table to use.
    ///
    /// Functions with a high occupancy target live under a compressed
    /// per-warp register budget and get the constrained table.
    pub fn register_cost_table_index(&self, func: &FunctionInfo) -> usize {
        if func.occupancy_target() >= 8 {
            1
        } else {
            0
        }
    }

    /// Widest class a value of `class` may be promoted into without
    /// breaking divergence or encoding constraints.
    pub fn largest_legal_superclass(
        &self,
        class_id: RegClassId,
        _func: &FunctionInfo,
    ) -> Result<RegClassId, RegInfoError> {
        let desc = self.target().classes().get(class_id)?;
        // Pair classes keep their width.
        if desc.is_pair_class() {
            return Ok(class_id);
        }
        Ok(match self.bank(class_id)? {
            RegBank::Scalar => class::GPR,
            RegBank::Float => class::FPR,
            RegBank::VectorOrMixed => {
                // A mixed class is already the widest divergent-safe
                // surface for its values; a pure vector class must not
                // widen into anything containing scalar registers.
                if self.has_scalar_regs(class_id)? {
                    class_id
                } else {
                    class::VGPR
                }
            }
        })
    }

    /// Reorder/filter the allocator's candidates for `vreg`.
    ///
    /// Prefers a physical register already holding the same value through
    /// a recorded copy, provided it is a legal, free candidate. A
    /// divergent virtual register is never hinted into a scalar-only
    /// physical register. Empty means "no improving hint"; the allocator
    /// keeps its default order.
    pub fn get_allocation_hints(
        &self,
        vreg: VirtReg,
        order: &[PhysReg],
        func: &FunctionInfo,
        vrm: &VirtRegMap,
        matrix: &LiveRegMatrix,
    ) -> Result<Vec<PhysReg>, RegInfoError> {
        let class_id = func
            .vreg_class(vreg)
            .ok_or(RegInfoError::UnassignedVirtReg(vreg.0))?;
        let divergent = self.bank(class_id)?.is_divergent();
        let reserved = self.reserved_regs(func);

        let mut hints = Vec::new();
        if let Some(copy) = func.copy_hint(vreg) {
            if let Some(phys) = vrm.resolve(copy) {
                let scalar_phys = self.is_sgpr_class(self.base_class(phys))?;
                let legal = order.contains(&phys)
                    && !reserved.contains(phys)
                    && matrix.is_free(phys)
                    && !(divergent && scalar_phys);
                if legal {
                    hints.push(phys);
                }
            }
        }
        trace!(
            "allocation hints for {vreg} ({}): {:?}",
            if divergent { "divergent" } else { "uniform" },
            hints,
        );
        Ok(hints)
    }
}
