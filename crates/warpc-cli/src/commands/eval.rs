//! Evaluate a binary probe lane by lane on the reference machine.

use warpc_compiler::Diagnostics;
use warpc_compiler::parser::{Expr, ExprKind, parse};
use warpc_core::{Colors, MaskedOps, OperatorKind};
use warpc_vm::{
    DeviceMemory, LaneMachine, LaneValue, Lanes, Mask, Pointer, PrintTracer, RuntimeError, Tracer,
};

pub struct EvalArgs {
    pub expr: String,
    pub lhs: String,
    pub rhs: String,
    pub mask: Option<String>,
    pub trace: bool,
    pub color: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("invalid probe:\n{0}")]
    Parse(Diagnostics),

    #[error("expected `<type> <op> <type>`, e.g. `int32 + float32`")]
    NotBinary,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub fn run(args: EvalArgs) {
    let colors = Colors::new(args.color);
    let result = if args.trace {
        let mut machine = LaneMachine::builder(DeviceMemory::new())
            .tracer(PrintTracer::new(colors))
            .build();
        let result = evaluate(&mut machine, &args);
        machine.tracer().print();
        result
    } else {
        evaluate(&mut LaneMachine::new(DeviceMemory::new()), &args)
    };

    match result {
        Ok(value) => println!("{}{}{} {value}", colors.blue, value.ty(), colors.reset),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Evaluate `args.expr` on the given lanes. With a mask, inactive lanes of a
/// value result stay zero and inactive lanes of a mask result are false.
pub fn evaluate<T: Tracer>(
    machine: &mut LaneMachine<T>,
    args: &EvalArgs,
) -> Result<LaneValue, EvalError> {
    let (op, lhs, rhs) = binary_probe(&args.expr)?;
    let lhs = operand(&lhs, &args.lhs)?;
    let rhs = operand(&rhs, &args.rhs)?;
    let value = machine.binary(op, &lhs, &rhs)?;

    let Some(bits) = &args.mask else {
        return Ok(value);
    };
    let mask = Mask::parse(bits)?;
    if mask.len() != value.len() {
        return Err(RuntimeError::LaneCountMismatch {
            expected: value.len(),
            found: mask.len(),
        }
        .into());
    }

    match value {
        LaneValue::Lanes(lanes) => Ok(masked_store(machine, &mask, &lanes)?.into()),
        LaneValue::Mask(m) => Ok(mask
            .iter()
            .zip(m.iter())
            .map(|(active, bit)| active && bit)
            .collect::<Mask>()
            .into()),
    }
}

fn masked_store<T: Tracer>(
    machine: &mut LaneMachine<T>,
    mask: &Mask,
    lanes: &Lanes,
) -> Result<Lanes, RuntimeError> {
    let out = machine.memory_mut().alloc(lanes.dtype(), lanes.len());
    let offsets: Vec<usize> = (0..lanes.len()).collect();
    machine.store(&Pointer::new(out), &offsets, mask, lanes)?;
    machine.memory().download(out)
}

fn binary_probe(source: &str) -> Result<(OperatorKind, Expr, Expr), EvalError> {
    let parsed = parse(source);
    let Some(expr) = parsed.expr else {
        return Err(EvalError::Parse(parsed.diagnostics));
    };
    match expr.kind {
        ExprKind::Binary { op, lhs, rhs } => Ok((op, *lhs, *rhs)),
        _ => Err(EvalError::NotBinary),
    }
}

fn operand(expr: &Expr, values: &str) -> Result<LaneValue, EvalError> {
    match &expr.kind {
        ExprKind::Type(dtype) => Ok(Lanes::parse(*dtype, values)?.into()),
        ExprKind::Mask => Ok(Mask::parse(values)?.into()),
        _ => Err(EvalError::NotBinary),
    }
}
