//! The lane machine: executes masked operations over device memory.

use warpc_core::{Dtype, MaskedOps, OperatorKind};

use super::error::RuntimeError;
use super::eval;
use super::memory::{DeviceMemory, Pointer};
use super::trace::{NoopTracer, Tracer};
use super::value::{LaneValue, Lanes, Mask, Scalar};

/// Executes masked loads, stores, selects and binary operators for one
/// group of lanes.
pub struct LaneMachine<T: Tracer = NoopTracer> {
    memory: DeviceMemory,
    tracer: T,
    /// When set, every operation must cover exactly this many lanes.
    lanes: Option<usize>,
}

/// Builder for [`LaneMachine`].
pub struct LaneMachineBuilder<T: Tracer = NoopTracer> {
    memory: DeviceMemory,
    tracer: T,
    lanes: Option<usize>,
}

impl LaneMachineBuilder<NoopTracer> {
    pub fn new(memory: DeviceMemory) -> Self {
        Self {
            memory,
            tracer: NoopTracer,
            lanes: None,
        }
    }
}

impl<T: Tracer> LaneMachineBuilder<T> {
    /// Replace the tracer.
    pub fn tracer<U: Tracer>(self, tracer: U) -> LaneMachineBuilder<U> {
        LaneMachineBuilder {
            memory: self.memory,
            tracer,
            lanes: self.lanes,
        }
    }

    /// Fix the lane count of the group.
    pub fn lanes(mut self, lanes: usize) -> Self {
        self.lanes = Some(lanes);
        self
    }

    pub fn build(self) -> LaneMachine<T> {
        LaneMachine {
            memory: self.memory,
            tracer: self.tracer,
            lanes: self.lanes,
        }
    }
}

impl LaneMachine<NoopTracer> {
    pub fn builder(memory: DeviceMemory) -> LaneMachineBuilder<NoopTracer> {
        LaneMachineBuilder::new(memory)
    }

    /// Untraced machine over `memory`.
    pub fn new(memory: DeviceMemory) -> Self {
        Self::builder(memory).build()
    }
}

impl<T: Tracer> LaneMachine<T> {
    pub fn memory(&self) -> &DeviceMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut DeviceMemory {
        &mut self.memory
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_parts(self) -> (DeviceMemory, T) {
        (self.memory, self.tracer)
    }

    /// Masked load whose inactive lanes yield `other` instead of zero.
    pub fn load_or(
        &mut self,
        base: &Pointer,
        offsets: &[usize],
        mask: &Mask,
        other: Scalar,
    ) -> Result<Lanes, RuntimeError> {
        self.check_lanes(mask.len(), offsets.len())?;
        let dtype = self.memory.buffer(base.buffer)?.dtype();
        if other.dtype() != dtype {
            return Err(RuntimeError::DtypeMismatch {
                expected: dtype,
                found: other.dtype(),
            });
        }

        // Bounds first, so a faulting launch performs no reads.
        let indices = self.active_indices(base, offsets, mask)?;

        let mut values = Vec::with_capacity(offsets.len());
        for (lane, index) in indices.into_iter().enumerate() {
            let addr = base.add(offsets[lane]);
            match index {
                Some(index) => {
                    let value = self.memory.read(base.buffer, index);
                    self.tracer.trace_load(lane, addr, value);
                    values.push(value);
                }
                None => {
                    self.tracer.trace_skip(lane, addr);
                    values.push(other);
                }
            }
        }
        Ok(Lanes::from_raw(dtype, values))
    }

    /// Evaluate `lhs op rhs` lane by lane.
    pub fn binary(
        &mut self,
        op: OperatorKind,
        lhs: &LaneValue,
        rhs: &LaneValue,
    ) -> Result<LaneValue, RuntimeError> {
        self.check_lanes(lhs.len(), rhs.len())?;
        let (resolution, value) = eval::binary(op, lhs, rhs)?;
        self.tracer.trace_binary(op, &resolution);
        Ok(value)
    }

    /// Per-lane element index for active lanes, `None` for inactive ones.
    /// Inactive lanes are not bounds-checked.
    fn active_indices(
        &self,
        base: &Pointer,
        offsets: &[usize],
        mask: &Mask,
    ) -> Result<Vec<Option<usize>>, RuntimeError> {
        offsets
            .iter()
            .enumerate()
            .map(|(lane, &offset)| {
                if mask.is_active(lane) {
                    self.memory.index(*base, offset, lane).map(Some)
                } else {
                    Ok(None)
                }
            })
            .collect()
    }

    fn check_lanes(&self, a: usize, b: usize) -> Result<(), RuntimeError> {
        let expected = self.lanes.unwrap_or(a);
        for found in [a, b] {
            if found != expected {
                return Err(RuntimeError::LaneCountMismatch { expected, found });
            }
        }
        Ok(())
    }
}

impl<T: Tracer> MaskedOps for LaneMachine<T> {
    type Ptr = Pointer;
    type Value = Lanes;
    type Mask = Mask;
    type Error = RuntimeError;

    fn load(
        &mut self,
        dtype: Dtype,
        base: &Pointer,
        offsets: &[usize],
        mask: &Mask,
    ) -> Result<Lanes, RuntimeError> {
        let found = self.memory.buffer(base.buffer)?.dtype();
        if found != dtype {
            return Err(RuntimeError::DtypeMismatch {
                expected: dtype,
                found,
            });
        }
        self.load_or(base, offsets, mask, Scalar::zero(dtype))
    }

    fn store(
        &mut self,
        base: &Pointer,
        offsets: &[usize],
        mask: &Mask,
        values: &Lanes,
    ) -> Result<(), RuntimeError> {
        self.check_lanes(mask.len(), offsets.len())?;
        self.check_lanes(mask.len(), values.len())?;
        let dtype = self.memory.buffer(base.buffer)?.dtype();
        if values.dtype() != dtype {
            return Err(RuntimeError::DtypeMismatch {
                expected: dtype,
                found: values.dtype(),
            });
        }

        // All active lanes are checked before any lane writes.
        let indices = self.active_indices(base, offsets, mask)?;

        for (lane, index) in indices.into_iter().enumerate() {
            let addr = base.add(offsets[lane]);
            let value = values.values()[lane];
            match index {
                Some(index) => {
                    self.memory.write(base.buffer, index, value);
                    self.tracer.trace_store(lane, addr, value);
                }
                None => self.tracer.trace_skip(lane, addr),
            }
        }
        Ok(())
    }

    fn select(&mut self, mask: &Mask, a: &Lanes, b: &Lanes) -> Result<Lanes, RuntimeError> {
        self.check_lanes(mask.len(), a.len())?;
        self.check_lanes(mask.len(), b.len())?;
        if a.dtype() != b.dtype() {
            return Err(warpc_core::TypeError::DtypeMismatch {
                lhs: a.dtype().into(),
                rhs: b.dtype().into(),
            }
            .into());
        }

        let values = mask
            .iter()
            .zip(a.iter().zip(b.iter()))
            .enumerate()
            .map(|(lane, (take_a, (x, y)))| {
                self.tracer.trace_select(lane, take_a);
                if take_a { x } else { y }
            })
            .collect();
        Ok(Lanes::from_raw(a.dtype(), values))
    }
}
