//! Register Class Descriptor Table
//!
//! The class table is generated data as far as the backend is concerned:
//! it is built once per target and treated as read-only input. Each class
//! carries the raw non-exclusive flag bits {vector, scalar, float} of the
//! machine description; the backend derives the mutually exclusive
//! semantic category from them (see `tgc-backend`'s classification
//! engine) rather than testing flags ad hoc.

use crate::regs::PhysReg;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassTableError {
    #[error("unknown register class id {0}")]
    UnknownClass(usize),
}

/// Raw per-class flag bits, kept in sync with the machine description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassFlags(u8);

impl ClassFlags {
    pub const VECTOR: ClassFlags = ClassFlags(1 << 0);
    pub const SCALAR: ClassFlags = ClassFlags(1 << 1);
    pub const FLOAT: ClassFlags = ClassFlags(1 << 2);

    pub const fn empty() -> Self {
        ClassFlags(0)
    }

    pub const fn union(self, other: Self) -> Self {
        ClassFlags(self.0 | other.0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for ClassFlags {
    type Output = ClassFlags;

    fn bitor(self, rhs: ClassFlags) -> ClassFlags {
        self.union(rhs)
    }
}

/// Identity of a register class within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegClassId(pub usize);

/// One register class: identity, flags, and members in allocation
/// priority order.
#[derive(Debug, Clone)]
pub struct RegClassDesc {
    pub id: RegClassId,
    pub name: &'static str,
    pub flags: ClassFlags,
    pub members: Vec<PhysReg>,
}

impl RegClassDesc {
    pub fn contains(&self, reg: PhysReg) -> bool {
        self.members.contains(&reg)
    }

    /// True if the class holds aligned pair registers.
    pub fn is_pair_class(&self) -> bool {
        matches!(self.members.first(), Some(PhysReg::V2(_)))
    }
}

/// Well-known class ids of the Tide table, in table order.
pub const GPR: RegClassId = RegClassId(0);
pub const FPR: RegClassId = RegClassId(1);
pub const VGPR: RegClassId = RegClassId(2);
pub const VPR2: RegClassId = RegClassId(3);
pub const VSX: RegClassId = RegClassId(4);

/// The static register class descriptor table.
#[derive(Debug, Clone)]
pub struct RegClassTable {
    classes: Vec<RegClassDesc>,
}

impl RegClassTable {
    /// Build the Tide class table.
    ///
    /// Member order doubles as the default allocation order: temporaries
    /// first, then argument registers, then saved registers, with the
    /// always-special registers (zero, sp, gp, tp) at the very end.
    pub fn tide() -> Self {
        let mut gpr: Vec<PhysReg> = vec![PhysReg::X(5), PhysReg::X(6), PhysReg::X(7)];
        gpr.extend((28..32).map(PhysReg::X));
        gpr.extend((10..18).map(PhysReg::X));
        gpr.push(PhysReg::X(9));
        gpr.extend((18..28).map(PhysReg::X));
        gpr.extend([
            PhysReg::X(8),
            PhysReg::X(1),
            PhysReg::X(0),
            PhysReg::X(2),
            PhysReg::X(3),
            PhysReg::X(4),
        ]);

        let fpr: Vec<PhysReg> = (0..32).map(PhysReg::F).collect();
        let vgpr: Vec<PhysReg> = (0..32).map(PhysReg::V).collect();
        let vpr2: Vec<PhysReg> = (0..32).step_by(2).map(PhysReg::V2).collect();
        let vsx: Vec<PhysReg> = (0..32).map(PhysReg::V).chain(gpr.iter().copied()).collect();

        let classes = vec![
            RegClassDesc {
                id: GPR,
                name: "GPR",
                flags: ClassFlags::SCALAR,
                members: gpr,
            },
            RegClassDesc {
                id: FPR,
                name: "FPR",
                flags: ClassFlags::FLOAT,
                members: fpr,
            },
            RegClassDesc {
                id: VGPR,
                name: "VGPR",
                flags: ClassFlags::VECTOR,
                members: vgpr,
            },
            RegClassDesc {
                id: VPR2,
                name: "VPR2",
                flags: ClassFlags::VECTOR,
                members: vpr2,
            },
            // Vector-or-scalar source operands: both flags set, so the
            // backend must treat it as conservatively divergent.
            RegClassDesc {
                id: VSX,
                name: "VSX",
                flags: ClassFlags::VECTOR | ClassFlags::SCALAR,
                members: vsx,
            },
        ];
        debug_assert!(classes.iter().enumerate().all(|(i, c)| c.id.0 == i));

        Self { classes }
    }

    pub fn get(&self, id: RegClassId) -> Result<&RegClassDesc, ClassTableError> {
        self.classes.get(id.0).ok_or(ClassTableError::UnknownClass(id.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegClassDesc> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flag_bits() {
        let both = ClassFlags::VECTOR | ClassFlags::SCALAR;
        assert!(both.contains(ClassFlags::VECTOR));
        assert!(both.contains(ClassFlags::SCALAR));
        assert!(!both.contains(ClassFlags::FLOAT));
        assert_eq!(ClassFlags::empty().bits(), 0);
    }

    #[test]
    fn test_tide_table_shape() {
        let table = RegClassTable::tide();
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(GPR).unwrap().members.len(), 32);
        assert_eq!(table.get(FPR).unwrap().members.len(), 32);
        assert_eq!(table.get(VGPR).unwrap().members.len(), 32);
        assert_eq!(table.get(VPR2).unwrap().members.len(), 16);
        assert_eq!(table.get(VSX).unwrap().members.len(), 64);
        assert!(table.get(RegClassId(99)).is_err());
    }

    #[test]
    fn test_allocation_order_front() {
        let table = RegClassTable::tide();
        let gpr = table.get(GPR).unwrap();
        // Temporaries come first, the hard-wired specials last.
        assert_eq!(gpr.members[0], PhysReg::X(5));
        assert_eq!(*gpr.members.last().unwrap(), PhysReg::TP);
    }

    #[test]
    fn test_pair_class_detection() {
        let table = RegClassTable::tide();
        assert!(table.get(VPR2).unwrap().is_pair_class());
        assert!(!table.get(VGPR).unwrap().is_pair_class());
    }
}
