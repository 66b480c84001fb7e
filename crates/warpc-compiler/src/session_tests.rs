use std::io::Write;
use std::sync::Arc;

use indoc::indoc;
use warpc_core::{Dtype, ExprType};

use crate::extern_lib::{ExternSignature, RegistryBuilder, libdevice};
use crate::{CompileError, CompilerOptions, DiagnosticKind, Error, Session};

#[test]
fn default_session_resolves_but_does_not_link() {
    let session = Session::builder().build().unwrap();
    assert!(session.libraries().is_empty());
    assert_eq!(session.registry().len(), 26);

    let checked = session.check("int8 + uint8").unwrap();
    assert_eq!(checked.expr.ty(), ExprType::Scalar(Dtype::Uint8));

    let err = session.check("pow(float32, float32)").unwrap_err();
    let diags = err.diagnostics().unwrap();
    assert_eq!(
        diags.iter().next().unwrap().kind(),
        DiagnosticKind::MissingExternalSymbol
    );
}

#[test]
fn assume_linked_links_the_registry() {
    let session = Session::builder().assume_linked(true).build().unwrap();
    assert_eq!(session.libraries().names().collect::<Vec<_>>(), ["libdevice"]);

    let checked = session.check("pow(float32, float32)").unwrap();
    assert_eq!(checked.expr.calls()[0].symbol, "__nv_powf");
    assert!(checked.diagnostics.is_empty());
}

#[test]
fn file_backed_library() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\0__nv_sqrtf\0__nv_sqrt\0").unwrap();
    file.flush().unwrap();

    let options = CompilerOptions::new().extern_lib("libdevice", file.path());
    let session = Session::new(options).unwrap();

    assert!(session.check("sqrt(float32)").is_ok());
    assert!(session.check("sqrt(float64)").is_ok());
    assert!(session.check("exp(float32)").is_err());
}

#[test]
fn missing_library_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Session::builder()
        .extern_lib("libdevice", dir.path().join("missing.bc"))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Library { .. }));
    assert!(err.diagnostics().is_none());
}

#[test]
fn custom_registry() {
    let registry = RegistryBuilder::new()
        .signature(ExternSignature::new(
            "mylib",
            "lerp",
            "my_{name}",
            [Dtype::Float32, Dtype::Float32, Dtype::Float32],
            Dtype::Float32,
        ))
        .build();
    let session = Session::builder()
        .registry(registry)
        .assume_linked(true)
        .build()
        .unwrap();

    let checked = session.check("mylib.lerp(float16, float32, bf16)").unwrap();
    assert_eq!(checked.expr.calls()[0].symbol, "my_lerp");
    assert!(checked.diagnostics.has_warnings());
    assert!(session.check("pow(float32, float32)").is_err());
}

#[test]
fn extended_registry_shared_across_threads() {
    let registry = Arc::new(
        libdevice::builder()
            .overloads(
                "libdevice",
                "rsqrt",
                "__nv_{name}f",
                &[(&[Dtype::Float32], Dtype::Float32)],
            )
            .build(),
    );
    let session = Session::builder()
        .registry(Arc::clone(&registry))
        .assume_linked(true)
        .build()
        .unwrap();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let checked = session.check("rsqrt(float16) * float32").unwrap();
                assert_eq!(checked.expr.ty(), ExprType::Scalar(Dtype::Float32));
            });
        }
    });
    assert_eq!(registry.len(), 27);
}

#[test]
fn parse_and_check_failures_are_distinct() {
    let session = Session::builder().build().unwrap();

    let err = session.check("int32 +").unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    insta::assert_snapshot!(err.to_string(), @"probe parsing failed with 1 errors");

    let err = session.check("int32 / uint32").unwrap_err();
    assert!(matches!(err, Error::Check(_)));
    insta::assert_snapshot!(err.to_string(), @"type checking failed with 1 errors");
}

#[test]
fn check_lines_offsets_diagnostics() {
    let session = Session::builder().assume_linked(true).build().unwrap();
    let source = indoc! {"
        int32 + int8

        float32 & int8
        sqrt(float64)
    "};

    let results = session.check_lines(source);
    let texts: Vec<_> = results.iter().map(|(text, _)| *text).collect();
    assert_eq!(texts, ["int32 + int8", "float32 & int8", "sqrt(float64)"]);

    let (_, failed) = &results[1];
    let diag = failed
        .as_ref()
        .unwrap_err()
        .diagnostics()
        .unwrap()
        .iter()
        .next()
        .unwrap();
    assert_eq!(u32::from(diag.range().start()), 14);
    assert_eq!(u32::from(diag.range().end()), 28);

    let rendered = failed
        .as_ref()
        .unwrap_err()
        .diagnostics()
        .unwrap()
        .printer()
        .source(source)
        .render();
    assert!(rendered.contains("float32 & int8"));
    assert!(rendered.contains("3 |"));

    assert!(results[0].1.is_ok());
    assert!(results[2].1.is_ok());
}

#[test]
fn compile_errors_surface_verbatim() {
    let session = Session::builder().build().unwrap();
    let err = session.check("select(mask, int8, uint8)").unwrap_err();
    let diag = err.diagnostics().unwrap().iter().next().unwrap();
    let expected = CompileError::from(warpc_core::TypeError::DtypeMismatch {
        lhs: Dtype::Int8.into(),
        rhs: Dtype::Uint8.into(),
    });
    assert_eq!(diag.message(), expected.to_string());
}
