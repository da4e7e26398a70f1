//! Tide Machine Instruction Definitions
//!
//! A deliberately small instruction model: just enough of the ISA for the
//! frame lowering layer to emit address arithmetic and to rewrite memory
//! operands. Memory instructions address either the stack (simm12
//! displacement, scalar base) or private per-lane memory (simm11
//! displacement, vector base).

use crate::regs::PhysReg;
use std::fmt;

/// An abstract "stack slot #k" reference inside a memory operand.
///
/// Every one of these must be rewritten to a real base register plus an
/// in-range immediate before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameIndex(pub usize);

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fi#{}", self.0)
    }
}

/// A signed scalable displacement: a fixed byte part plus an optional
/// part scaled by the vector register length in bytes (VLENB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackOffset {
    pub fixed: i64,
    pub scalable: i64,
}

impl StackOffset {
    pub const fn fixed(bytes: i64) -> Self {
        StackOffset { fixed: bytes, scalable: 0 }
    }

    pub const fn new(fixed: i64, scalable: i64) -> Self {
        StackOffset { fixed, scalable }
    }

    pub fn is_zero(&self) -> bool {
        self.fixed == 0 && self.scalable == 0
    }

    /// The offset shifted by an additional fixed displacement.
    pub fn plus_fixed(self, bytes: i64) -> Self {
        StackOffset { fixed: self.fixed + bytes, scalable: self.scalable }
    }
}

impl fmt::Display for StackOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scalable == 0 {
            write!(f, "{}", self.fixed)
        } else {
            write!(f, "{}+{}*vlenb", self.fixed, self.scalable)
        }
    }
}

/// Address space of a memory access, which decides the immediate width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrSpace {
    /// Ordinary stack access through the scalar register file.
    Stack,
    /// Per-lane private memory, encoded against the vector register file.
    Private,
}

impl AddrSpace {
    /// Width of the signed immediate displacement field.
    pub fn imm_bits(self) -> u32 {
        match self {
            AddrSpace::Stack => 12,
            AddrSpace::Private => 11,
        }
    }
}

/// True if `value` is representable as a signed `bits`-wide immediate.
pub fn fits_simm(value: i64, bits: u32) -> bool {
    let bound = 1i64 << (bits - 1);
    (-bound..bound).contains(&value)
}

/// Marker carried by emitted instructions so later passes can tell frame
/// setup/teardown code apart from ordinary instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstFlag {
    #[default]
    None,
    FrameSetup,
    FrameDestroy,
}

/// Base operand of a memory access: a concrete register or a
/// still-abstract frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrBase {
    Reg(PhysReg),
    Frame(FrameIndex),
}

impl fmt::Display for AddrBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddrBase::Reg(r) => write!(f, "{r}"),
            AddrBase::Frame(fi) => write!(f, "{fi}"),
        }
    }
}

/// Tide machine instructions, restricted to what frame lowering emits and
/// rewrites.
#[derive(Debug, Clone, PartialEq)]
pub enum MInst {
    /// rd = rs1 + rs2
    Add { rd: PhysReg, rs1: PhysReg, rs2: PhysReg, flag: InstFlag },
    /// rd = rs1 + imm (simm12)
    Addi { rd: PhysReg, rs1: PhysReg, imm: i64, flag: InstFlag },
    /// rd = imm, materialized however wide it needs to be
    Li { rd: PhysReg, imm: i64, flag: InstFlag },
    /// rd = rs1 * imm
    Muli { rd: PhysReg, rs1: PhysReg, imm: i64, flag: InstFlag },
    /// rd = vector register length in bytes
    Vlenb { rd: PhysReg, flag: InstFlag },
    /// rd = memory[base + offset]
    Load { rd: PhysReg, base: AddrBase, offset: i64, space: AddrSpace, flag: InstFlag },
    /// memory[base + offset] = rs
    Store { rs: PhysReg, base: AddrBase, offset: i64, space: AddrSpace, flag: InstFlag },
}

impl MInst {
    pub fn flag(&self) -> InstFlag {
        match self {
            MInst::Add { flag, .. }
            | MInst::Addi { flag, .. }
            | MInst::Li { flag, .. }
            | MInst::Muli { flag, .. }
            | MInst::Vlenb { flag, .. }
            | MInst::Load { flag, .. }
            | MInst::Store { flag, .. } => *flag,
        }
    }

    /// Every physical register the instruction reads or writes.
    pub fn regs(&self) -> Vec<PhysReg> {
        match self {
            MInst::Add { rd, rs1, rs2, .. } => vec![*rd, *rs1, *rs2],
            MInst::Addi { rd, rs1, .. } | MInst::Muli { rd, rs1, .. } => vec![*rd, *rs1],
            MInst::Li { rd, .. } | MInst::Vlenb { rd, .. } => vec![*rd],
            MInst::Load { rd, base, .. } => match base {
                AddrBase::Reg(b) => vec![*rd, *b],
                AddrBase::Frame(_) => vec![*rd],
            },
            MInst::Store { rs, base, .. } => match base {
                AddrBase::Reg(b) => vec![*rs, *b],
                AddrBase::Frame(_) => vec![*rs],
            },
        }
    }

    /// The unresolved frame reference of this instruction, if any.
    pub fn frame_index(&self) -> Option<FrameIndex> {
        match self {
            MInst::Load { base: AddrBase::Frame(fi), .. }
            | MInst::Store { base: AddrBase::Frame(fi), .. } => Some(*fi),
            _ => None,
        }
    }
}

impl fmt::Display for MInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MInst::Add { rd, rs1, rs2, .. } => write!(f, "add {rd}, {rs1}, {rs2}"),
            MInst::Addi { rd, rs1, imm, .. } => write!(f, "addi {rd}, {rs1}, {imm}"),
            MInst::Li { rd, imm, .. } => write!(f, "li {rd}, {imm}"),
            MInst::Muli { rd, rs1, imm, .. } => write!(f, "muli {rd}, {rs1}, {imm}"),
            MInst::Vlenb { rd, .. } => write!(f, "csrr {rd}, vlenb"),
            MInst::Load { rd, base, offset, space, .. } => match space {
                AddrSpace::Stack => write!(f, "lw {rd}, {offset}({base})"),
                AddrSpace::Private => write!(f, "lwp {rd}, {offset}({base})"),
            },
            MInst::Store { rs, base, offset, space, .. } => match space {
                AddrSpace::Stack => write!(f, "sw {rs}, {offset}({base})"),
                AddrSpace::Private => write!(f, "swp {rs}, {offset}({base})"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simm_ranges() {
        assert!(fits_simm(2047, 12));
        assert!(fits_simm(-2048, 12));
        assert!(!fits_simm(2048, 12));
        assert!(fits_simm(1023, 11));
        assert!(fits_simm(-1024, 11));
        assert!(!fits_simm(1024, 11));
        assert!(!fits_simm(-1025, 11));
    }

    #[test]
    fn test_instruction_display() {
        let load = MInst::Load {
            rd: PhysReg::V(3),
            base: AddrBase::Frame(FrameIndex(2)),
            offset: 8,
            space: AddrSpace::Private,
            flag: InstFlag::None,
        };
        assert_eq!(format!("{load}"), "lwp v3, 8(fi#2)");
        let addi = MInst::Addi {
            rd: PhysReg::SP,
            rs1: PhysReg::SP,
            imm: -16,
            flag: InstFlag::FrameSetup,
        };
        assert_eq!(format!("{addi}"), "addi x2, x2, -16");
    }

    #[test]
    fn test_register_operands() {
        let store = MInst::Store {
            rs: PhysReg::X(10),
            base: AddrBase::Frame(FrameIndex(0)),
            offset: 0,
            space: AddrSpace::Stack,
            flag: InstFlag::None,
        };
        assert_eq!(store.regs(), vec![PhysReg::X(10)]);

        let load = MInst::Load {
            rd: PhysReg::V(3),
            base: AddrBase::Reg(PhysReg::V(31)),
            offset: 0,
            space: AddrSpace::Private,
            flag: InstFlag::None,
        };
        assert_eq!(load.regs(), vec![PhysReg::V(3), PhysReg::V(31)]);

        let add = MInst::Add {
            rd: PhysReg::X(5),
            rs1: PhysReg::X(6),
            rs2: PhysReg::X(7),
            flag: InstFlag::None,
        };
        assert_eq!(add.regs(), vec![PhysReg::X(5), PhysReg::X(6), PhysReg::X(7)]);
    }

    #[test]
    fn test_frame_index_query() {
        let store = MInst::Store {
            rs: PhysReg::X(10),
            base: AddrBase::Frame(FrameIndex(0)),
            offset: 0,
            space: AddrSpace::Stack,
            flag: InstFlag::None,
        };
        assert_eq!(store.frame_index(), Some(FrameIndex(0)));

        let add = MInst::Add {
            rd: PhysReg::X(5),
            rs1: PhysReg::X(6),
            rs2: PhysReg::X(7),
            flag: InstFlag::None,
        };
        assert_eq!(add.frame_index(), None);
    }

    #[test]
    fn test_stack_offset_arithmetic() {
        let off = StackOffset::new(32, 2);
        assert!(!off.is_zero());
        assert_eq!(off.plus_fixed(8).fixed, 40);
        assert_eq!(format!("{off}"), "32+2*vlenb");
        assert_eq!(format!("{}", StackOffset::fixed(-4)), "-4");
    }
}
