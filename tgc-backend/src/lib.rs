//! Tide GPU Compiler - Register Information and Frame Lowering
//!
//! This crate is the register policy layer of the Tide backend. It answers
//! three questions for every other pass:
//!
//! - what *kind* of register is this (scalar/uniform, per-lane vector, or
//!   float) and which divergence rules follow from that kind;
//! - which physical registers are off-limits or must be preserved across
//!   calls;
//! - how an abstract stack-slot reference becomes a concrete
//!   base-register-plus-immediate addressing form when the displacement
//!   field is too narrow for the real offset.
//!
//! The generic allocator and the frame layout pass call into this crate
//! during the compilation of a single function; the crate never initiates
//! work itself and keeps no state beyond the caller-owned
//! [`FunctionInfo`].

pub mod error;
pub mod frame;
pub mod function;
pub mod regalloc;
pub mod reginfo;

pub use error::RegInfoError;
pub use frame::adjust_reg;
pub use function::{FrameBase, FrameObject, FunctionInfo};
pub use regalloc::{LiveRegMatrix, VirtRegMap};
pub use reginfo::{RegBank, RegisterInfo, SubProgramUsage};
