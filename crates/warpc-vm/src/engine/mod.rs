//! Masked elementwise execution engine.
//!
//! A [`LaneMachine`] runs masked loads, stores and selects over a
//! [`DeviceMemory`] arena, with the same semantics the code generator
//! lowers to predicated instructions.

mod error;
mod eval;
mod machine;
mod memory;
mod trace;
mod value;

#[cfg(test)]
mod eval_tests;

pub use error::RuntimeError;
pub use eval::binary;
pub use machine::{LaneMachine, LaneMachineBuilder};
pub use memory::{Buffer, BufferId, DeviceMemory, Pointer};
pub use trace::{EventLog, NoopTracer, PrintTracer, TraceEvent, Tracer};
pub use value::{LaneValue, Lanes, Mask, Scalar};
