//! Predicated inline PTX for masked memory operations.
//!
//! This is a text builder for inline-asm strings, not an instruction
//! selector: it formats instructions, operands and constraint strings.

mod builder;
mod lowering;

#[cfg(test)]
mod lowering_tests;

pub use builder::{ExecId, OperandId, PtxBuilder, PtxInstr};
pub use lowering::{
    InlineAsm, LoweringError, PtxLowering, PtxMask, PtxValue, register_constraint,
};
