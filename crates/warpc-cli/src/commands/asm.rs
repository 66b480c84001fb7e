//! Predicated inline PTX for one masked operation.

use warpc_compiler::asm::{InlineAsm, LoweringError, PtxLowering};
use warpc_core::{Dtype, MaskedOps};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskedOp {
    Load,
    Store,
    Select,
}

pub struct AsmArgs {
    pub op: MaskedOp,
    pub dtype: Dtype,
    pub lanes: usize,
    pub offset: usize,
}

pub fn run(args: AsmArgs) {
    let asm = match lower(&args) {
        Ok(asm) => asm,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    for line in asm.asm.split("\r\n") {
        println!("{line}");
    }
    println!();
    println!("constraints: \"{}\"", asm.constraints);
    println!("args: {}", asm.args.join(", "));
}

/// Lane `i` accesses element `offset + i` of `%base`, predicated on `p{i}`.
pub fn lower(args: &AsmArgs) -> Result<InlineAsm, LoweringError> {
    let mut lowering = PtxLowering::new();
    let base = "%base".to_owned();
    let end = args
        .offset
        .checked_add(args.lanes)
        .ok_or(LoweringError::OffsetOverflow {
            offset: args.offset,
            dtype: args.dtype,
        })?;
    let offsets: Vec<usize> = (args.offset..end).collect();

    match args.op {
        MaskedOp::Load => {
            let mask = lowering.mask("p", args.lanes);
            lowering.load(args.dtype, &base, &offsets, &mask)?;
        }
        MaskedOp::Store => {
            let values = lowering.input("%v", args.dtype, args.lanes);
            let mask = lowering.mask("p", args.lanes);
            lowering.store(&base, &offsets, &mask, &values)?;
        }
        MaskedOp::Select => {
            let a = lowering.input("%a", args.dtype, args.lanes);
            let b = lowering.input("%b", args.dtype, args.lanes);
            let mask = lowering.mask("p", args.lanes);
            lowering.select(&mask, &a, &b)?;
        }
    }
    Ok(lowering.finish())
}
