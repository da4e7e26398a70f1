//! Error handling for the register information layer
//!
//! Two kinds of outcome exist in this layer and only one of them is an
//! error: configuration and internal-consistency faults abort the current
//! function's compilation and surface here; expected negative results
//! (no unused register, no improving hint) are `Option`/empty-`Vec`
//! returns on the query itself.

use thiserror::Error;
use tgc_codegen::{ClassTableError, StackOffset};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegInfoError {
    #[error(transparent)]
    UnknownClass(#[from] ClassTableError),

    #[error("register class '{0}' carries no recognized bank flags")]
    UnclassifiedClass(String),

    #[error("frame index #{0} does not name a frame object")]
    UnknownFrameIndex(usize),

    #[error("frame index #{0} survived frame-index elimination")]
    FrameIndexNotEliminated(usize),

    #[error("offset {0} cannot be materialized in place; a scratch register is required")]
    InPlaceAdjust(StackOffset),

    #[error("no unused {0} register available for offset legalization")]
    NoScratchRegister(&'static str),

    #[error("register index {index} exceeds the 32-entry {file} file")]
    ResourceOverflow { file: &'static str, index: u8 },

    #[error("virtual register %{0} has no assigned register class")]
    UnassignedVirtReg(u32),
}
