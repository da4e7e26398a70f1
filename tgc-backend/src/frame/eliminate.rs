//! Frame-index elimination proper
//!
//! Runs once per function after allocation. Each memory operand that
//! still names a frame index is resolved against the slot's base policy,
//! range-checked against the addressing mode's immediate width, and
//! rewritten; out-of-range offsets are legalized through a scratch
//! register. General stack slots are addressed through the scalar file,
//! private per-lane slots through the vector file, which is exactly why
//! the target designates a dedicated vector base register for private
//! memory.

use super::adjust::adjust_reg;
use crate::error::RegInfoError;
use crate::function::{FrameBase, FunctionInfo};
use crate::reginfo::RegisterInfo;
use log::{debug, trace};
use tgc_codegen::{class, fits_simm, AddrBase, AddrSpace, MInst, PhysReg, StackOffset};

impl RegisterInfo<'_> {
    /// Base register for general stack access in this function.
    pub fn frame_register(&self, func: &FunctionInfo) -> PhysReg {
        if func.needs_frame_pointer() {
            PhysReg::FP
        } else {
            PhysReg::SP
        }
    }

    /// The fixed vector register used to address private memory.
    pub fn private_memory_base_register(&self) -> PhysReg {
        self.target().private_mem_base()
    }

    /// Replace every frame-index operand in `insts` with concrete
    /// register-plus-immediate addressing.
    ///
    /// Returns the rewritten instruction stream. On success it is
    /// guaranteed to contain no frame reference; running the pass a
    /// second time is a no-op.
    pub fn eliminate_frame_indices(
        &self,
        func: &FunctionInfo,
        insts: Vec<MInst>,
    ) -> Result<Vec<MInst>, RegInfoError> {
        // The scratch search must see every register the stream itself
        // touches, not only what the caller recorded in the usage
        // ledger; otherwise it could hand back a store's source register
        // and clobber it with the synthesized address.
        let mut usage = func.clone();
        for inst in &insts {
            for reg in inst.regs() {
                usage.note_phys_use(reg);
            }
        }

        let mut out = Vec::with_capacity(insts.len());
        for inst in insts {
            if inst.frame_index().is_some() {
                self.eliminate_one(&usage, inst, &mut out)?;
            } else {
                out.push(inst);
            }
        }
        if let Some(fi) = out.iter().find_map(MInst::frame_index) {
            return Err(RegInfoError::FrameIndexNotEliminated(fi.0));
        }
        Ok(out)
    }

    fn eliminate_one(
        &self,
        func: &FunctionInfo,
        inst: MInst,
        out: &mut Vec<MInst>,
    ) -> Result<(), RegInfoError> {
        let (fi, disp, space) = match &inst {
            MInst::Load { base: AddrBase::Frame(fi), offset, space, .. }
            | MInst::Store { base: AddrBase::Frame(fi), offset, space, .. } => {
                (*fi, *offset, *space)
            }
            // Callers only hand us instructions that still carry a frame
            // index; anything else is a walk bug on our side.
            _ => unreachable!("eliminate_one called without a frame operand"),
        };
        let object = func.frame_object(fi)?;
        let base = match object.base {
            FrameBase::FramePointer => PhysReg::FP,
            FrameBase::StackPointer => PhysReg::SP,
            FrameBase::PrivateMemory => self.private_memory_base_register(),
        };
        // Fold the displacement already present in the instruction into
        // the slot offset.
        let total = object.offset.plus_fixed(disp);
        let bits = space.imm_bits();
        trace!("eliminating {fi} in '{inst}': {base} + {total} ({space:?})");

        if total.scalable == 0 && fits_simm(total.fixed, bits) {
            out.push(rewrite(inst, base, total.fixed));
            return Ok(());
        }

        // Legalize: keep a non-negative in-range remainder on the access
        // and fold the rest into a scratch base register. The carried
        // part stays a multiple of the immediate span, which preserves
        // any alignment the base guaranteed.
        let span = 1i64 << (bits - 1);
        let remainder = total.fixed.rem_euclid(span);
        let carried = StackOffset::new(total.fixed - remainder, total.scalable);

        let (scratch_class, file) = match space {
            AddrSpace::Private => (class::VGPR, "vector"),
            AddrSpace::Stack => (class::GPR, "scalar"),
        };
        let scratch = self
            .find_unused_register(scratch_class, func, false)?
            .ok_or(RegInfoError::NoScratchRegister(file))?;
        debug!(
            "legalizing {fi}: offset {total} -> {scratch} = {base} + {carried}, remainder {remainder}"
        );
        adjust_reg(
            out,
            scratch,
            base,
            carried,
            inst.flag(),
            Some(self.target().stack_align()),
        )?;
        out.push(rewrite(inst, scratch, remainder));
        Ok(())
    }
}

/// Rebuild a memory instruction with a concrete base and immediate.
fn rewrite(inst: MInst, base: PhysReg, imm: i64) -> MInst {
    match inst {
        MInst::Load { rd, space, flag, .. } => MInst::Load {
            rd,
            base: AddrBase::Reg(base),
            offset: imm,
            space,
            flag,
        },
        MInst::Store { rs, space, flag, .. } => MInst::Store {
            rs,
            base: AddrBase::Reg(base),
            offset: imm,
            space,
            flag,
        },
        other => other,
    }
}
