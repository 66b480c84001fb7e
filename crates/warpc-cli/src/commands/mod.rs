pub mod asm;
pub mod check;
pub mod dtypes;
pub mod eval;
pub mod probe_loader;
pub mod promote;

#[cfg(test)]
mod dtypes_tests;
