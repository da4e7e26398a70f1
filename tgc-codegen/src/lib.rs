//! Tide GPU Compiler - Machine Model
//!
//! This crate defines the machine description consumed by the backend:
//! physical and virtual registers, register aliasing, the static register
//! class table, machine instruction definitions, and calling convention
//! data for the Tide SIMT extension of the RISC-V base ISA.
//!
//! Everything here is immutable after target construction and is safely
//! shared across concurrently compiled functions. Policy decisions (what
//! is reserved, how offsets get legalized, which registers to hint) live
//! in `tgc-backend`.

pub mod abi;
pub mod class;
pub mod inst;
pub mod regs;
pub mod target;

pub use abi::CallConv;
pub use class::{ClassFlags, ClassTableError, RegClassDesc, RegClassId, RegClassTable};
pub use inst::{fits_simm, AddrBase, AddrSpace, FrameIndex, InstFlag, MInst, StackOffset};
pub use regs::{PhysReg, Reg, RegMask, VirtReg};
pub use target::TideTarget;
