//! Program Register-Usage Tracking
//!
//! A kernel entry point may contain several logically distinct
//! sub-programs sharing one compiled function. Each register an
//! instruction references is recorded both in a transient query set and
//! in the per-sub-program high-water accounting that the occupancy stage
//! later turns into resource limits for the kernel as a whole.

use super::RegisterInfo;
use crate::error::RegInfoError;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tgc_codegen::PhysReg;

/// Resource accounting for one sub-program.
///
/// High-water marks are `highest used index + 1` per architectural file,
/// which is what the occupancy computation consumes. Serializable so the
/// driver can emit the kernel resource report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubProgramUsage {
    pub name: String,
    pub sgpr_high_water: u32,
    pub fgpr_high_water: u32,
    pub vgpr_high_water: u32,
}

impl SubProgramUsage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sgpr_high_water: 0,
            fgpr_high_water: 0,
            vgpr_high_water: 0,
        }
    }

    fn note(&mut self, reg: PhysReg) -> Result<(), RegInfoError> {
        let (file, slot, index) = match reg {
            PhysReg::X(n) => ("scalar", &mut self.sgpr_high_water, n),
            PhysReg::F(n) => ("float", &mut self.fgpr_high_water, n),
            PhysReg::V(n) => ("vector", &mut self.vgpr_high_water, n),
            // Pairs are views; their elements carry the accounting.
            PhysReg::V2(_) => return Ok(()),
        };
        if index >= PhysReg::FILE_SIZE {
            return Err(RegInfoError::ResourceOverflow { file, index });
        }
        *slot = (*slot).max(u32::from(index) + 1);
        Ok(())
    }
}

impl RegisterInfo<'_> {
    /// Record that `reg` is used by the current sub-program.
    ///
    /// The register and everything it overlaps go into both the transient
    /// `set` and the persistent per-sub-program accounting.
    pub fn insert_reg_to_set(
        &self,
        reg: PhysReg,
        set: &mut BTreeSet<PhysReg>,
        sub_program: &mut SubProgramUsage,
    ) -> Result<(), RegInfoError> {
        for alias in reg.aliases() {
            set.insert(alias);
            sub_program.note(alias)?;
        }
        trace!(
            "usage '{}': +{reg} -> sgpr {} / fgpr {} / vgpr {}",
            sub_program.name,
            sub_program.sgpr_high_water,
            sub_program.fgpr_high_water,
            sub_program.vgpr_high_water,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tgc_codegen::TideTarget;

    #[test]
    fn test_pair_use_updates_all_three_registers() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        let mut set = BTreeSet::new();
        let mut sub = SubProgramUsage::new("sub0");

        info.insert_reg_to_set(PhysReg::V2(4), &mut set, &mut sub).unwrap();

        assert!(set.contains(&PhysReg::V2(4)));
        assert!(set.contains(&PhysReg::V(4)));
        assert!(set.contains(&PhysReg::V(5)));
        assert_eq!(set.len(), 3);
        // Accounting reaches v5, so the high-water mark is 6.
        assert_eq!(sub.vgpr_high_water, 6);
    }

    #[test]
    fn test_high_water_marks_are_monotone_per_file() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        let mut set = BTreeSet::new();
        let mut sub = SubProgramUsage::new("sub0");

        info.insert_reg_to_set(PhysReg::X(10), &mut set, &mut sub).unwrap();
        info.insert_reg_to_set(PhysReg::X(3), &mut set, &mut sub).unwrap();
        info.insert_reg_to_set(PhysReg::F(0), &mut set, &mut sub).unwrap();

        assert_eq!(sub.sgpr_high_water, 11);
        assert_eq!(sub.fgpr_high_water, 1);
        assert_eq!(sub.vgpr_high_water, 0);
    }

    #[test]
    fn test_out_of_file_register_is_an_overflow_fault() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        let mut set = BTreeSet::new();
        let mut sub = SubProgramUsage::new("sub0");

        let err = info
            .insert_reg_to_set(PhysReg::V(40), &mut set, &mut sub)
            .unwrap_err();
        assert_eq!(err, RegInfoError::ResourceOverflow { file: "vector", index: 40 });
    }

    #[test]
    fn test_usage_report_serializes() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        let mut set = BTreeSet::new();
        let mut sub = SubProgramUsage::new("matmul_tile");
        info.insert_reg_to_set(PhysReg::V(7), &mut set, &mut sub).unwrap();
        info.insert_reg_to_set(PhysReg::X(12), &mut set, &mut sub).unwrap();

        let json = serde_json::to_string(&sub).unwrap();
        let back: SubProgramUsage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sub);
        assert_eq!(back.vgpr_high_water, 8);
    }
}
