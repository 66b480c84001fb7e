//! Built-in signature table for the CUDA libdevice math library.

use warpc_core::Dtype::{self, Float32, Float64, Int32, Int64};

use super::registry::{RegistryBuilder, SignatureRegistry};
use super::signature::ExternSignature;

/// Namespace libdevice routines are registered under.
pub const LIBRARY: &str = "libdevice";

/// Bumped whenever the table below changes.
pub const VERSION: u32 = 1;

/// `(name, symbol template, args, ret)`, in overload preference order.
const TABLE: &[(&str, &str, &[Dtype], Dtype)] = &[
    ("ffs", "__nv_{name}", &[Int32], Int32),
    ("ffs", "__nv_{name}ll", &[Int64], Int32),
    ("popc", "__nv_{name}", &[Int32], Int32),
    ("popc", "__nv_{name}ll", &[Int64], Int32),
    ("clz", "__nv_{name}", &[Int32], Int32),
    ("clz", "__nv_{name}ll", &[Int64], Int32),
    ("abs", "__nv_{name}", &[Int32], Int32),
    ("abs", "__nv_ll{name}", &[Int64], Int64),
    ("abs", "__nv_f{name}f", &[Float32], Float32),
    ("abs", "__nv_f{name}", &[Float64], Float64),
    ("pow", "__nv_{name}f", &[Float32, Float32], Float32),
    ("pow", "__nv_{name}", &[Float64, Float64], Float64),
    ("sqrt", "__nv_{name}f", &[Float32], Float32),
    ("sqrt", "__nv_{name}", &[Float64], Float64),
    ("exp", "__nv_{name}f", &[Float32], Float32),
    ("exp", "__nv_{name}", &[Float64], Float64),
    ("log", "__nv_{name}f", &[Float32], Float32),
    ("log", "__nv_{name}", &[Float64], Float64),
    ("sin", "__nv_{name}f", &[Float32], Float32),
    ("sin", "__nv_{name}", &[Float64], Float64),
    ("cos", "__nv_{name}f", &[Float32], Float32),
    ("cos", "__nv_{name}", &[Float64], Float64),
    ("fmod", "__nv_{name}f", &[Float32, Float32], Float32),
    ("fmod", "__nv_{name}", &[Float64, Float64], Float64),
    (
        "norm4d",
        "__nv_{name}f",
        &[Float32, Float32, Float32, Float32],
        Float32,
    ),
    (
        "norm4d",
        "__nv_{name}",
        &[Float64, Float64, Float64, Float64],
        Float64,
    ),
];

/// Builder pre-seeded with the libdevice table, for adding more routines.
pub fn builder() -> RegistryBuilder {
    let mut builder = RegistryBuilder::new().version(VERSION);
    for &(name, template, args, ret) in TABLE {
        builder.register(ExternSignature::new(LIBRARY, name, template, args, ret));
    }
    builder
}

pub fn registry() -> SignatureRegistry {
    builder().build()
}
