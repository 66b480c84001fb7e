//! The masked load/store/select capability.
//!
//! Code that touches memory per lane is written against this trait instead
//! of branching per lane, so every lane runs the same instruction stream and
//! the mask only predicates side effects. The VM interprets it; the PTX
//! lowering emits predicated instructions for it.

use crate::dtype::Dtype;

pub trait MaskedOps {
    /// Address base the lane offsets are added to.
    type Ptr;
    /// One value per lane.
    type Value;
    /// One predicate per lane.
    type Mask;
    type Error;

    /// Read `base + offsets[i]` for every lane whose mask bit is set.
    ///
    /// Inactive lanes must not perform the access and yield a placeholder.
    fn load(
        &mut self,
        dtype: Dtype,
        base: &Self::Ptr,
        offsets: &[usize],
        mask: &Self::Mask,
    ) -> Result<Self::Value, Self::Error>;

    /// Write `values[i]` to `base + offsets[i]` for every active lane.
    fn store(
        &mut self,
        base: &Self::Ptr,
        offsets: &[usize],
        mask: &Self::Mask,
        values: &Self::Value,
    ) -> Result<(), Self::Error>;

    /// Lane-wise `mask ? a : b`. No memory effect.
    fn select(
        &mut self,
        mask: &Self::Mask,
        a: &Self::Value,
        b: &Self::Value,
    ) -> Result<Self::Value, Self::Error>;
}
