//! Frame-Index Elimination and Offset Legalization
//!
//! The frame layout pass decides where stack slots live; this module
//! turns the abstract "stack slot #k" operands it leaves behind into
//! concrete base-register-plus-immediate addressing. When the immediate
//! field of the access is too narrow for the real offset, the offset is
//! legalized: an intermediate base is synthesized with [`adjust_reg`] and
//! the access keeps only an in-range remainder.
//!
//! Elimination is modeled as a function from instruction vector to
//! instruction vector instead of in-place mutation, which keeps the
//! legalization arithmetic independently testable. After it returns, no
//! frame reference survives; a survivor is an internal-consistency fault.

mod adjust;
mod eliminate;


pub use adjust::adjust_reg;
