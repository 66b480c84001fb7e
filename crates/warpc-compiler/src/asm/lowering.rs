//! Masked load/store/select lowered to predicated inline PTX.
//!
//! Every lane runs the same instruction stream; the lane's mask bit becomes
//! the instruction predicate. A masked-off load still executes its `mov`
//! of zero into the destination, so the placeholder is always defined, but
//! its `ld` never issues.

use serde::Serialize;
use warpc_core::{Dtype, MaskedOps, TypeError};

use super::builder::{OperandId, PtxBuilder, PtxInstr};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("expected {expected} lanes, found {found}")]
    LaneCountMismatch { expected: usize, found: usize },

    #[error("element offset {offset} of {dtype} does not fit a 64-bit byte offset")]
    OffsetOverflow { offset: usize, dtype: Dtype },
}

/// A per-lane value: one register operand per lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtxValue {
    dtype: Dtype,
    lanes: Vec<OperandId>,
}

impl PtxValue {
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lanes(&self) -> &[OperandId] {
        &self.lanes
    }
}

/// One predicate value per lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtxMask {
    predicates: Vec<String>,
}

impl PtxMask {
    pub fn new(predicates: Vec<String>) -> Self {
        Self { predicates }
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Finished inline assembly: text, constraint string and bound values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineAsm {
    pub asm: String,
    pub constraints: String,
    pub args: Vec<String>,
}

/// Register class for a value of `dtype`.
pub fn register_constraint(dtype: Dtype) -> &'static str {
    match dtype.bit_width() {
        8 | 16 => "h",
        32 => "r",
        _ => "l",
    }
}

/// Width of register moves; there are no 8-bit registers.
fn register_width(dtype: Dtype) -> u32 {
    dtype.bit_width().max(16)
}

/// Emits PTX for the masked capability. Values are named SSA values.
#[derive(Debug, Default)]
pub struct PtxLowering {
    builder: PtxBuilder<String>,
    temps: u32,
}

impl PtxLowering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `lanes` input values named `{name}{i}`.
    pub fn input(&mut self, name: &str, dtype: Dtype, lanes: usize) -> PtxValue {
        let constraint = register_constraint(dtype);
        PtxValue {
            dtype,
            lanes: (0..lanes)
                .map(|i| self.builder.new_operand(format!("{name}{i}"), constraint))
                .collect(),
        }
    }

    /// Predicates named `{name}{i}`.
    pub fn mask(&self, name: &str, lanes: usize) -> PtxMask {
        PtxMask::new((0..lanes).map(|i| format!("{name}{i}")).collect())
    }

    fn output(&mut self, dtype: Dtype) -> OperandId {
        let name = format!("%t{}", self.temps);
        self.temps += 1;
        self.builder
            .new_operand(name, format!("={}", register_constraint(dtype)))
    }

    pub fn builder(&self) -> &PtxBuilder<String> {
        &self.builder
    }

    pub fn finish(self) -> InlineAsm {
        InlineAsm {
            asm: self.builder.dump(),
            constraints: self.builder.constraints(),
            args: self.builder.args().into_iter().cloned().collect(),
        }
    }
}

fn check_lanes(expected: usize, found: usize) -> Result<(), LoweringError> {
    if expected != found {
        return Err(LoweringError::LaneCountMismatch { expected, found });
    }
    Ok(())
}

/// Byte offsets for every lane, checked before anything is emitted.
fn byte_offsets(dtype: Dtype, offsets: &[usize]) -> Result<Vec<i64>, LoweringError> {
    offsets
        .iter()
        .map(|&offset| {
            offset
                .checked_mul(dtype.byte_width())
                .and_then(|bytes| i64::try_from(bytes).ok())
                .ok_or(LoweringError::OffsetOverflow { offset, dtype })
        })
        .collect()
}

impl MaskedOps for PtxLowering {
    /// Name of the 64-bit base address value.
    type Ptr = String;
    type Value = PtxValue;
    type Mask = PtxMask;
    type Error = LoweringError;

    fn load(
        &mut self,
        dtype: Dtype,
        base: &String,
        offsets: &[usize],
        mask: &PtxMask,
    ) -> Result<PtxValue, LoweringError> {
        check_lanes(mask.len(), offsets.len())?;

        let width = register_width(dtype);
        let mov = PtxInstr::new("mov").b(width);
        let ld = PtxInstr::new("ld").global().b(dtype.bit_width());

        let bytes = byte_offsets(dtype, offsets)?;
        let mut lanes = Vec::with_capacity(offsets.len());
        for (offset, pred) in bytes.into_iter().zip(&mask.predicates) {
            let dst = self.output(dtype);
            let zero = self.builder.new_constant(0);
            self.builder.exec(&mov, &[dst, zero]);

            let addr = self.builder.new_addr(base.clone(), "l", offset);
            let exec = self.builder.exec(&ld, &[dst, addr]);
            self.builder.predicate(exec, pred.clone());
            lanes.push(dst);
        }
        Ok(PtxValue { dtype, lanes })
    }

    fn store(
        &mut self,
        base: &String,
        offsets: &[usize],
        mask: &PtxMask,
        values: &PtxValue,
    ) -> Result<(), LoweringError> {
        check_lanes(mask.len(), offsets.len())?;
        check_lanes(mask.len(), values.len())?;

        let dtype = values.dtype;
        let st = PtxInstr::new("st").global().b(dtype.bit_width());

        let bytes = byte_offsets(dtype, offsets)?;
        for ((offset, pred), &value) in bytes.into_iter().zip(&mask.predicates).zip(&values.lanes) {
            let addr = self.builder.new_addr(base.clone(), "l", offset);
            let exec = self.builder.exec(&st, &[addr, value]);
            self.builder.predicate(exec, pred.clone());
        }
        Ok(())
    }

    fn select(
        &mut self,
        mask: &PtxMask,
        a: &PtxValue,
        b: &PtxValue,
    ) -> Result<PtxValue, LoweringError> {
        if a.dtype != b.dtype {
            return Err(TypeError::DtypeMismatch {
                lhs: a.dtype.into(),
                rhs: b.dtype.into(),
            }
            .into());
        }
        check_lanes(mask.len(), a.len())?;
        check_lanes(mask.len(), b.len())?;

        let dtype = a.dtype;
        let selp = PtxInstr::new("selp").b(register_width(dtype));

        let mut lanes = Vec::with_capacity(mask.len());
        for ((pred, &x), &y) in mask.predicates.iter().zip(&a.lanes).zip(&b.lanes) {
            let dst = self.output(dtype);
            let p = self.builder.new_operand(pred.clone(), "b");
            self.builder.exec(&selp, &[dst, x, y, p]);
            lanes.push(dst);
        }
        Ok(PtxValue { dtype, lanes })
    }
}
