#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Reference interpreter for masked elementwise kernels.
//!
//! Executes the masked load/store/select capability and the binary
//! operators over host memory, lane by lane. Used to validate promotion
//! rules against concrete values and by `warpc eval`.

pub mod engine;

pub use engine::{
    BufferId, DeviceMemory, EventLog, LaneMachine, LaneValue, Lanes, Mask, NoopTracer, Pointer,
    PrintTracer, RuntimeError, Scalar, TraceEvent, Tracer,
};
