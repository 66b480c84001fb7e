//! External device routines: signature registry, linked libraries and
//! overload dispatch.

pub mod libdevice;

mod dispatch;
mod library;
mod registry;
mod signature;

#[cfg(test)]
mod dispatch_tests;

pub use dispatch::{DispatchCache, Dispatcher, ResolvedCall, resolve_call, select_overload};
pub use library::{ExternLibrary, LinkedLibraries};
pub use registry::{RegistryBuilder, SignatureId, SignatureRegistry};
pub use signature::ExternSignature;
