//! Tide Register Model
//!
//! The Tide machine carries three architectural register files:
//! - x0-x31: scalar GPRs, one value shared by every lane of a warp
//! - f0-f31: scalar float registers
//! - v0-v31: vector registers, one value per lane
//!
//! On top of the vector file the encoding exposes aligned pair views
//! (v0:v1, v2:v3, ...) used by wide memory operations. A pair aliases its
//! two element registers; usage accounting and reservation must always
//! close over those aliases.

use std::fmt;

/// A physical register identity.
///
/// `V2(n)` is the aligned pair starting at the even register `v{n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysReg {
    X(u8),
    F(u8),
    V(u8),
    V2(u8),
}

impl PhysReg {
    pub const ZERO: PhysReg = PhysReg::X(0);
    pub const RA: PhysReg = PhysReg::X(1);
    pub const SP: PhysReg = PhysReg::X(2);
    pub const GP: PhysReg = PhysReg::X(3);
    pub const TP: PhysReg = PhysReg::X(4);
    pub const FP: PhysReg = PhysReg::X(8);

    /// Registers per architectural file.
    pub const FILE_SIZE: u8 = 32;

    /// Number of distinct physical registers: 32 X + 32 F + 32 V + 16 pairs.
    pub const COUNT: usize = 112;

    /// Dense index used for bitmasks and cost tables.
    pub fn index(self) -> usize {
        match self {
            PhysReg::X(n) => n as usize,
            PhysReg::F(n) => 32 + n as usize,
            PhysReg::V(n) => 64 + n as usize,
            PhysReg::V2(n) => 96 + (n as usize) / 2,
        }
    }

    /// Every register this one overlaps, including itself.
    ///
    /// A vector register is covered by the pair it belongs to; a pair
    /// covers both of its elements.
    pub fn aliases(self) -> Vec<PhysReg> {
        match self {
            PhysReg::V(n) => vec![PhysReg::V(n), PhysReg::V2(n & !1)],
            PhysReg::V2(n) => vec![PhysReg::V2(n), PhysReg::V(n), PhysReg::V(n + 1)],
            other => vec![other],
        }
    }

    /// True for registers of the per-lane vector file (pairs included).
    pub fn is_vector(self) -> bool {
        matches!(self, PhysReg::V(_) | PhysReg::V2(_))
    }
}

impl fmt::Display for PhysReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysReg::X(n) => write!(f, "x{n}"),
            PhysReg::F(n) => write!(f, "f{n}"),
            PhysReg::V(n) => write!(f, "v{n}"),
            PhysReg::V2(n) => write!(f, "v{}:v{}", n, n + 1),
        }
    }
}

/// An allocator-assigned placeholder register.
///
/// The backend core never creates or destroys these; it only classifies
/// and constrains them through their assigned register class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtReg(pub u32);

impl fmt::Display for VirtReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Either a physical or a still-virtual register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Phys(PhysReg),
    Virt(VirtReg),
}

impl From<PhysReg> for Reg {
    fn from(r: PhysReg) -> Self {
        Reg::Phys(r)
    }
}

impl From<VirtReg> for Reg {
    fn from(r: VirtReg) -> Self {
        Reg::Virt(r)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::Phys(r) => write!(f, "{r}"),
            Reg::Virt(r) => write!(f, "{r}"),
        }
    }
}

/// One bit per physical register, indexed by [`PhysReg::index`].
///
/// Used both for reserved sets and for call-preserved masks. The
/// all-clear mask is the "everything clobbered" mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegMask(u128);

impl RegMask {
    pub const NONE: RegMask = RegMask(0);

    pub fn new() -> Self {
        RegMask(0)
    }

    pub fn insert(&mut self, reg: PhysReg) {
        self.0 |= 1u128 << reg.index();
    }

    /// Insert a register together with everything it overlaps.
    pub fn insert_with_aliases(&mut self, reg: PhysReg) {
        for alias in reg.aliases() {
            self.insert(alias);
        }
    }

    pub fn contains(&self, reg: PhysReg) -> bool {
        self.0 & (1u128 << reg.index()) != 0
    }

    /// True if the register or any register it overlaps is in the mask.
    pub fn overlaps(&self, reg: PhysReg) -> bool {
        reg.aliases().iter().any(|r| self.contains(*r))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }
}

impl FromIterator<PhysReg> for RegMask {
    fn from_iter<I: IntoIterator<Item = PhysReg>>(iter: I) -> Self {
        let mut mask = RegMask::new();
        for reg in iter {
            mask.insert(reg);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_display() {
        assert_eq!(format!("{}", PhysReg::X(0)), "x0");
        assert_eq!(format!("{}", PhysReg::F(31)), "f31");
        assert_eq!(format!("{}", PhysReg::V(7)), "v7");
        assert_eq!(format!("{}", PhysReg::V2(4)), "v4:v5");
        assert_eq!(format!("{}", VirtReg(3)), "%3");
    }

    #[test]
    fn test_dense_indices_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for n in 0..32 {
            assert!(seen.insert(PhysReg::X(n).index()));
            assert!(seen.insert(PhysReg::F(n).index()));
            assert!(seen.insert(PhysReg::V(n).index()));
        }
        for n in (0..32).step_by(2) {
            assert!(seen.insert(PhysReg::V2(n).index()));
        }
        assert_eq!(seen.len(), PhysReg::COUNT);
        assert!(seen.iter().all(|&i| i < PhysReg::COUNT));
    }

    #[test]
    fn test_pair_aliasing() {
        assert_eq!(
            PhysReg::V2(4).aliases(),
            vec![PhysReg::V2(4), PhysReg::V(4), PhysReg::V(5)]
        );
        assert_eq!(PhysReg::V(5).aliases(), vec![PhysReg::V(5), PhysReg::V2(4)]);
        assert_eq!(PhysReg::X(9).aliases(), vec![PhysReg::X(9)]);
    }

    #[test]
    fn test_mask_alias_closure() {
        let mut mask = RegMask::new();
        mask.insert_with_aliases(PhysReg::V2(6));
        assert!(mask.contains(PhysReg::V(6)));
        assert!(mask.contains(PhysReg::V(7)));
        assert!(mask.contains(PhysReg::V2(6)));
        assert!(!mask.contains(PhysReg::V(8)));

        let mut element_only = RegMask::new();
        element_only.insert(PhysReg::V(6));
        assert!(element_only.overlaps(PhysReg::V2(6)));
        assert!(!element_only.overlaps(PhysReg::V2(8)));
    }
}
