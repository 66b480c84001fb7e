use std::sync::Arc;

use warpc_core::Dtype::{self, *};

use super::{
    Dispatcher, ExternLibrary, ExternSignature, LinkedLibraries, RegistryBuilder,
    SignatureRegistry, libdevice, resolve_call, select_overload,
};
use crate::CompileError;

/// libdevice registry with every one of its symbols linked.
fn linked() -> (SignatureRegistry, LinkedLibraries) {
    let registry = libdevice::registry();
    let mut libraries = LinkedLibraries::new();
    libraries.link(ExternLibrary::from_symbols(
        libdevice::LIBRARY,
        registry.symbols(libdevice::LIBRARY),
    ));
    (registry, libraries)
}

fn symbol(name: &str, args: &[Dtype]) -> String {
    let (registry, libraries) = linked();
    resolve_call(&registry, &libraries, None, name, args)
        .unwrap_or_else(|e| panic!("{name}: {e}"))
        .symbol
}

#[test]
fn exact_match() {
    let (registry, libraries) = linked();
    let call = resolve_call(&registry, &libraries, None, "pow", &[Float32, Float32]).unwrap();
    assert_eq!(call.symbol, "__nv_powf");
    assert_eq!(call.ret, Float32);
    assert_eq!(call.library, "libdevice");
    assert!(!call.widened);

    assert_eq!(symbol("pow", &[Float64, Float64]), "__nv_pow");
    assert_eq!(symbol("ffs", &[Int32]), "__nv_ffs");
    assert_eq!(symbol("ffs", &[Int64]), "__nv_ffsll");
    assert_eq!(symbol("abs", &[Int64]), "__nv_llabs");
    assert_eq!(symbol("abs", &[Float32]), "__nv_fabsf");
    assert_eq!(
        symbol("norm4d", &[Float64, Float64, Float64, Float64]),
        "__nv_norm4d"
    );
}

#[test]
fn integer_arguments_never_reach_float_overloads() {
    let (registry, libraries) = linked();
    let err = resolve_call(&registry, &libraries, None, "sqrt", &[Int32]).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnresolvedOverload {
            name: "sqrt".into(),
            args: vec![Int32.into()],
        }
    );
    insta::assert_snapshot!(err.to_string(), @"no overload of `sqrt` accepts (int32)");
}

#[test]
fn integers_never_widen() {
    let (registry, libraries) = linked();
    let err = resolve_call(&registry, &libraries, None, "ffs", &[Int8]).unwrap_err();
    assert!(matches!(err, CompileError::UnresolvedOverload { .. }));
    let err = resolve_call(&registry, &libraries, None, "ffs", &[Uint32]).unwrap_err();
    assert!(matches!(err, CompileError::UnresolvedOverload { .. }));
}

#[test]
fn half_precision_widens_to_the_narrowest_overload() {
    let (registry, libraries) = linked();
    let call = resolve_call(&registry, &libraries, None, "pow", &[Float16, Float16]).unwrap();
    assert_eq!(call.symbol, "__nv_powf");
    assert_eq!(call.params, [Float32, Float32]);
    assert!(call.widened);

    assert_eq!(symbol("sin", &[BFloat16]), "__nv_sinf");
    assert_eq!(symbol("pow", &[Float32, Float64]), "__nv_pow");
}

#[test]
fn narrowest_wins_regardless_of_registration_order() {
    let registry = RegistryBuilder::new()
        .signature(ExternSignature::new("m", "f", "f64", [Float64], Float64))
        .signature(ExternSignature::new("m", "f", "f32", [Float32], Float32))
        .build();
    let id = select_overload(&registry, None, "f", &[Float16]).unwrap();
    assert_eq!(registry.get(id).symbol(), "f32");
}

#[test]
fn equal_width_ties_go_to_the_first_registered() {
    let registry = RegistryBuilder::new()
        .signature(ExternSignature::new("m", "f", "first", [Float32, Float64], Float64))
        .signature(ExternSignature::new("m", "f", "second", [Float64, Float32], Float64))
        .build();
    let id = select_overload(&registry, None, "f", &[Float16, Float16]).unwrap();
    assert_eq!(registry.get(id).symbol(), "first");
}

#[test]
fn sixteen_bit_formats_never_convert() {
    let registry = RegistryBuilder::new()
        .signature(ExternSignature::new("m", "f", "bf", [BFloat16], BFloat16))
        .build();
    let err = select_overload(&registry, None, "f", &[Float16]).unwrap_err();
    assert!(matches!(err, CompileError::UnresolvedOverload { .. }));
}

#[test]
fn arity_is_part_of_the_key() {
    let (registry, libraries) = linked();
    let err = resolve_call(&registry, &libraries, None, "pow", &[Float32]).unwrap_err();
    assert!(matches!(err, CompileError::UnresolvedOverload { .. }));
}

#[test]
fn library_namespace_restricts_candidates() {
    let (registry, libraries) = linked();
    let call = resolve_call(
        &registry,
        &libraries,
        Some("libdevice"),
        "exp",
        &[Float64],
    )
    .unwrap();
    assert_eq!(call.symbol, "__nv_exp");

    let err = resolve_call(&registry, &libraries, Some("other"), "exp", &[Float64]).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"no overload of `other.exp` accepts (float64)");
}

#[test]
fn unlinked_library_is_a_missing_symbol() {
    let registry = libdevice::registry();
    let err = resolve_call(
        &registry,
        &LinkedLibraries::new(),
        None,
        "pow",
        &[Float32, Float32],
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::MissingExternalSymbol {
            symbol: "__nv_powf".into(),
            library: "libdevice".into(),
        }
    );
    insta::assert_snapshot!(
        err.to_string(),
        @"symbol `__nv_powf` not found in linked library `libdevice`"
    );
}

#[test]
fn symbol_absent_from_linked_library() {
    let registry = libdevice::registry();
    let mut libraries = LinkedLibraries::new();
    libraries.link(ExternLibrary::from_symbols("libdevice", ["__nv_pow"]));

    assert!(resolve_call(&registry, &libraries, None, "pow", &[Float64, Float64]).is_ok());
    let err = resolve_call(&registry, &libraries, None, "pow", &[Float32, Float32]).unwrap_err();
    assert!(matches!(err, CompileError::MissingExternalSymbol { .. }));
}

#[test]
fn dispatcher_memoizes_per_call_signature() {
    let (registry, libraries) = linked();
    let mut dispatcher = Dispatcher::new(&registry, &libraries);

    let a = dispatcher.resolve(None, "pow", &[Float32, Float32]).unwrap();
    let b = dispatcher.resolve(None, "pow", &[Float32, Float32]).unwrap();
    assert_eq!(a, b);
    assert!(dispatcher.resolve(None, "sqrt", &[Int8]).is_err());
    assert!(dispatcher.resolve(None, "sqrt", &[Int8]).is_err());

    assert_eq!(dispatcher.cache().len(), 2);
    assert_eq!(dispatcher.cache().hits(), 2);
}

#[test]
fn concurrent_resolution_against_a_shared_registry() {
    let (registry, libraries) = linked();
    let registry = Arc::new(registry);
    let calls: [(&str, &[Dtype]); 4] = [
        ("pow", &[Float16, Float16]),
        ("ffs", &[Int32]),
        ("norm4d", &[Float32, Float32, Float32, Float32]),
        ("cos", &[Float64]),
    ];

    let expected: Vec<_> = calls
        .iter()
        .map(|(name, args)| resolve_call(&registry, &libraries, None, name, args))
        .collect();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let libraries = &libraries;
                s.spawn(move || {
                    calls
                        .iter()
                        .map(|(name, args)| resolve_call(&registry, libraries, None, name, args))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn resolved_call_json() {
    let (registry, libraries) = linked();
    let call = resolve_call(&registry, &libraries, None, "sqrt", &[Float16]).unwrap();
    insta::assert_snapshot!(serde_json::to_string(&call).unwrap(), @r#"{"library":"libdevice","name":"sqrt","symbol":"__nv_sqrtf","params":["float32"],"ret":"float32","widened":true}"#);
}
