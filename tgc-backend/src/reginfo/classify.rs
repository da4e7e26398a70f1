//! Classification Engine
//!
//! The raw class table carries non-exclusive {vector, scalar, float} flag
//! bits. Correctness downstream hinges on one derived fact: a class that
//! is not provably scalar-only may hold a different value per lane and
//! must be treated as divergent everywhere. The derivation lives here,
//! once, instead of flag tests scattered through the backend.

use super::RegisterInfo;
use crate::error::RegInfoError;
use crate::function::FunctionInfo;
use tgc_codegen::{class, ClassFlags, PhysReg, Reg, RegClassId};

/// The mutually exclusive semantic category of a register class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegBank {
    /// Provably uniform: one value shared by all lanes.
    Scalar,
    /// Float-only scalar file.
    Float,
    /// Anything that may diverge per lane, including classes with both
    /// vector and scalar flags set.
    VectorOrMixed,
}

impl RegBank {
    /// Derive the semantic category from raw flags.
    ///
    /// Total over every recognized flag combination; a class with no
    /// recognized bit set is a fatal configuration error, since the table
    /// is generated once per target and trusted afterwards.
    pub fn derive(flags: ClassFlags) -> Option<RegBank> {
        let vector = flags.contains(ClassFlags::VECTOR);
        let scalar = flags.contains(ClassFlags::SCALAR);
        let float = flags.contains(ClassFlags::FLOAT);
        match (vector, scalar, float) {
            (false, false, false) => None,
            (false, true, false) => Some(RegBank::Scalar),
            (false, false, true) => Some(RegBank::Float),
            _ => Some(RegBank::VectorOrMixed),
        }
    }

    /// The central correctness rule: divergent iff not scalar-only.
    pub fn is_divergent(self) -> bool {
        !matches!(self, RegBank::Scalar)
    }
}

impl RegisterInfo<'_> {
    /// Semantic bank of a register class.
    pub fn bank(&self, class: RegClassId) -> Result<RegBank, RegInfoError> {
        let desc = self.target().classes().get(class)?;
        RegBank::derive(desc.flags)
            .ok_or_else(|| RegInfoError::UnclassifiedClass(desc.name.to_string()))
    }

    pub fn has_vector_regs(&self, class: RegClassId) -> Result<bool, RegInfoError> {
        Ok(self.target().classes().get(class)?.flags.contains(ClassFlags::VECTOR))
    }

    pub fn has_scalar_regs(&self, class: RegClassId) -> Result<bool, RegInfoError> {
        Ok(self.target().classes().get(class)?.flags.contains(ClassFlags::SCALAR))
    }

    pub fn has_float_regs(&self, class: RegClassId) -> Result<bool, RegInfoError> {
        Ok(self.target().classes().get(class)?.flags.contains(ClassFlags::FLOAT))
    }

    /// True if the class contains only uniform scalar registers.
    pub fn is_sgpr_class(&self, class: RegClassId) -> Result<bool, RegInfoError> {
        Ok(self.bank(class)? == RegBank::Scalar)
    }

    /// True if the class contains only float registers.
    pub fn is_fpr_class(&self, class: RegClassId) -> Result<bool, RegInfoError> {
        Ok(self.bank(class)? == RegBank::Float)
    }

    /// True if values of this class may differ per lane. Every pass that
    /// reorders, speculates, or rematerializes must respect this.
    pub fn is_divergent_class(&self, class: RegClassId) -> Result<bool, RegInfoError> {
        Ok(self.bank(class)?.is_divergent())
    }

    /// Canonical class of a physical register: the class of its smallest
    /// addressable sub-unit (a pair maps to the element class).
    pub fn base_class(&self, reg: PhysReg) -> RegClassId {
        match reg {
            PhysReg::X(_) => class::GPR,
            PhysReg::F(_) => class::FPR,
            PhysReg::V(_) | PhysReg::V2(_) => class::VGPR,
        }
    }

    /// True iff the register's base class is scalar-only, resolving
    /// virtual registers through their assigned class.
    pub fn is_sgpr_reg(&self, func: &FunctionInfo, reg: Reg) -> Result<bool, RegInfoError> {
        let class = match reg {
            Reg::Phys(p) => self.base_class(p),
            Reg::Virt(v) => func
                .vreg_class(v)
                .ok_or(RegInfoError::UnassignedVirtReg(v.0))?,
        };
        self.is_sgpr_class(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tgc_codegen::{CallConv, TideTarget, VirtReg};

    fn all_flag_combinations() -> Vec<ClassFlags> {
        let v = ClassFlags::VECTOR;
        let s = ClassFlags::SCALAR;
        let f = ClassFlags::FLOAT;
        vec![
            ClassFlags::empty(),
            v,
            s,
            f,
            v | s,
            v | f,
            s | f,
            v | s | f,
        ]
    }

    #[test]
    fn test_bank_derivation_over_all_combinations() {
        for flags in all_flag_combinations() {
            let expected = if !flags.contains(ClassFlags::VECTOR)
                && flags.contains(ClassFlags::SCALAR)
                && !flags.contains(ClassFlags::FLOAT)
            {
                Some(RegBank::Scalar)
            } else if !flags.contains(ClassFlags::VECTOR)
                && !flags.contains(ClassFlags::SCALAR)
                && flags.contains(ClassFlags::FLOAT)
            {
                Some(RegBank::Float)
            } else if flags.bits() == 0 {
                None
            } else {
                Some(RegBank::VectorOrMixed)
            };
            assert_eq!(RegBank::derive(flags), expected, "flags {:#05b}", flags.bits());
        }
    }

    #[test]
    fn test_scalar_only_and_float_only_are_exclusive() {
        for flags in all_flag_combinations() {
            let scalar_only = flags.contains(ClassFlags::SCALAR)
                && !flags.contains(ClassFlags::VECTOR)
                && !flags.contains(ClassFlags::FLOAT);
            let float_only = flags.contains(ClassFlags::FLOAT)
                && !flags.contains(ClassFlags::VECTOR)
                && !flags.contains(ClassFlags::SCALAR);
            assert!(!(scalar_only && float_only));
            if let Some(bank) = RegBank::derive(flags) {
                assert_eq!(bank == RegBank::Scalar, scalar_only);
                assert_eq!(bank == RegBank::Float, float_only);
                // Divergence is exactly the complement of scalar-only.
                assert_eq!(bank.is_divergent(), !scalar_only);
            }
        }
    }

    #[test]
    fn test_tide_table_banks() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        assert_eq!(info.bank(class::GPR).unwrap(), RegBank::Scalar);
        assert_eq!(info.bank(class::FPR).unwrap(), RegBank::Float);
        assert_eq!(info.bank(class::VGPR).unwrap(), RegBank::VectorOrMixed);
        assert_eq!(info.bank(class::VPR2).unwrap(), RegBank::VectorOrMixed);
        // Both flags set: conservatively divergent.
        assert_eq!(info.bank(class::VSX).unwrap(), RegBank::VectorOrMixed);
        assert!(info.is_divergent_class(class::VSX).unwrap());
        assert!(!info.is_divergent_class(class::GPR).unwrap());
    }

    #[test]
    fn test_base_class_of_a_pair_is_the_element_class() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        assert_eq!(info.base_class(PhysReg::V2(6)), class::VGPR);
        assert_eq!(info.base_class(PhysReg::V(6)), class::VGPR);
        assert_eq!(info.base_class(PhysReg::X(5)), class::GPR);
        assert_eq!(info.base_class(PhysReg::F(0)), class::FPR);
    }

    #[test]
    fn test_is_sgpr_reg_resolves_virtual_registers() {
        let target = TideTarget::new();
        let info = RegisterInfo::new(&target);
        let mut func = FunctionInfo::new("k", CallConv::Kernel);
        func.set_vreg_class(VirtReg(0), class::GPR);
        func.set_vreg_class(VirtReg(1), class::VGPR);

        assert!(info.is_sgpr_reg(&func, Reg::Virt(VirtReg(0))).unwrap());
        assert!(!info.is_sgpr_reg(&func, Reg::Virt(VirtReg(1))).unwrap());
        assert!(info.is_sgpr_reg(&func, Reg::Phys(PhysReg::X(10))).unwrap());
        assert!(!info.is_sgpr_reg(&func, Reg::Phys(PhysReg::V2(0))).unwrap());
        assert_eq!(
            info.is_sgpr_reg(&func, Reg::Virt(VirtReg(9))),
            Err(RegInfoError::UnassignedVirtReg(9))
        );
    }
}
