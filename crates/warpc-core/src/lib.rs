#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core type model for warpc.
//!
//! - **Lattice** (`dtype`): the closed set of scalar dtypes and their attributes
//! - **Operators** (`operator`): operator kinds and their families
//! - **Promotion** (`promote`): result types and legality of binary operators
//! - **Capability** (`masked`): the masked load/store/select interface shared
//!   by the interpreter and the code generator

mod colors;
mod dtype;
mod masked;
mod operator;
pub mod promote;

#[cfg(test)]
mod promote_tests;

pub use colors::Colors;
pub use dtype::{Dtype, DtypeKind, ExprType, FloatFormat, ParseDtypeError};
pub use masked::MaskedOps;
pub use operator::{OperatorClass, OperatorKind};
pub use promote::{
    PromotionOutcome, Resolution, TypeError, resolve, resolve_dtypes, resolve_select,
};
