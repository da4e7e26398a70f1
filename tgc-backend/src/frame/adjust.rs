//! The low-level offset materialization primitive
//!
//! `adjust_reg` emits the minimal sequence computing `rd = rs + offset`,
//! splitting when the offset exceeds one immediate's range. Every emitted
//! instruction carries the caller-supplied flag so later passes can tell
//! frame setup code apart.

use crate::error::RegInfoError;
use log::trace;
use tgc_codegen::{fits_simm, InstFlag, MInst, PhysReg, StackOffset};

/// Emit `rd = rs + offset` into `out`.
///
/// The scalable part (VLENB-scaled) requires `rd != rs`, because `rs`
/// must stay live while `rd` accumulates it. Any fixed part splits into
/// in-range `addi`s when it exceeds one immediate, so it never needs a
/// second register. When a `required_align` is given and the sequence
/// splits, every intermediate value stays a multiple of it, so an aligned
/// source register yields an aligned destination.
pub fn adjust_reg(
    out: &mut Vec<MInst>,
    rd: PhysReg,
    rs: PhysReg,
    offset: StackOffset,
    flag: InstFlag,
    required_align: Option<u64>,
) -> Result<(), RegInfoError> {
    let mut base = rs;

    if offset.scalable != 0 {
        if rd == rs {
            return Err(RegInfoError::InPlaceAdjust(offset));
        }
        out.push(MInst::Vlenb { rd, flag });
        if offset.scalable != 1 {
            out.push(MInst::Muli { rd, rs1: rd, imm: offset.scalable, flag });
        }
        out.push(MInst::Add { rd, rs1: rd, rs2: rs, flag });
        base = rd;
    }

    let fixed = offset.fixed;
    if fixed == 0 {
        if base != rd {
            out.push(MInst::Addi { rd, rs1: base, imm: 0, flag });
        }
        return Ok(());
    }

    if fits_simm(fixed, 12) {
        out.push(MInst::Addi { rd, rs1: base, imm: fixed, flag });
        return Ok(());
    }

    // Largest simm12 chunk that keeps every intermediate value aligned.
    let align = required_align.unwrap_or(1) as i64;
    let step = 2047 / align * align;
    let reach = if fixed > 0 { step } else { -step };
    let two_addis = step != 0 && fits_simm(fixed - reach, 12);

    // With a free destination, a far offset takes two instructions
    // instead of a long addi chain.
    if rd != base && !two_addis {
        trace!("adjust {rd} = {base} + {fixed}: li + add");
        out.push(MInst::Li { rd, imm: fixed, flag });
        out.push(MInst::Add { rd, rs1: rd, rs2: base, flag });
        return Ok(());
    }
    if step == 0 {
        return Err(RegInfoError::InPlaceAdjust(offset));
    }

    // Chain in-range addis, shrinking the residual one aligned chunk at
    // a time.
    trace!("adjust {rd} = {base} + {fixed}: addi chain, step {step}");
    let mut src = base;
    let mut remaining = fixed;
    while !fits_simm(remaining, 12) {
        let chunk = if remaining > 0 { step } else { -step };
        out.push(MInst::Addi { rd, rs1: src, imm: chunk, flag });
        src = rd;
        remaining -= chunk;
    }
    out.push(MInst::Addi { rd, rs1: src, imm: remaining, flag });
    Ok(())
}
