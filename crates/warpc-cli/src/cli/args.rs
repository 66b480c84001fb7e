//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};
use warpc_core::{Dtype, OperatorKind};

/// Probe file, one expression per line (positional).
pub fn probe_path_arg() -> Arg {
    Arg::new("probe_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Probe file, one expression per line ('-' for stdin)")
}

/// Inline probe text (-q/--probe).
pub fn probe_text_arg() -> Arg {
    Arg::new("probe_text")
        .short('q')
        .long("probe")
        .value_name("TEXT")
        .conflicts_with("probe_path")
        .help("Inline probe text")
}

/// Linked library (--extern-lib NAME=PATH), repeatable.
pub fn extern_lib_arg() -> Arg {
    Arg::new("extern_lib")
        .long("extern-lib")
        .value_name("NAME=PATH")
        .action(ArgAction::Append)
        .value_parser(parse_extern_lib)
        .help("Link a library file under NAME")
}

/// Treat every registered symbol as linked (--assume-linked).
pub fn assume_linked_arg() -> Arg {
    Arg::new("assume_linked")
        .long("assume-linked")
        .action(ArgAction::SetTrue)
        .help("Assume every registered library is linked")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Binary operator, by symbol or name (positional).
pub fn operator_arg() -> Arg {
    Arg::new("operator")
        .value_name("OP")
        .required(true)
        .value_parser(parse_operator)
        .help("Operator symbol or name (`+`, `floordiv`, `<<`)")
}

/// Output format (--format).
pub fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .value_name("FORMAT")
        .default_value("text")
        .value_parser(["text", "json"])
        .help("Output format")
}

/// Binary probe to evaluate (positional).
pub fn expr_arg() -> Arg {
    Arg::new("expr")
        .value_name("EXPR")
        .required(true)
        .help("Binary probe, e.g. 'int32 + float32'")
}

/// Left operand lanes (--lhs).
pub fn lhs_arg() -> Arg {
    Arg::new("lhs")
        .long("lhs")
        .value_name("VALUES")
        .required(true)
        .allow_hyphen_values(true)
        .help("Comma-separated left operand lanes")
}

/// Right operand lanes (--rhs).
pub fn rhs_arg() -> Arg {
    Arg::new("rhs")
        .long("rhs")
        .value_name("VALUES")
        .required(true)
        .allow_hyphen_values(true)
        .help("Comma-separated right operand lanes")
}

/// Active lanes (--mask).
pub fn mask_arg() -> Arg {
    Arg::new("mask")
        .long("mask")
        .value_name("BITS")
        .help("Comma-separated lane mask (1/0); all lanes active if omitted")
}

/// Print per-lane events (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Print per-lane execution trace to stderr")
}

/// Masked operation to lower (positional).
pub fn masked_op_arg() -> Arg {
    Arg::new("masked_op")
        .value_name("OP")
        .required(true)
        .value_parser(["load", "store", "select"])
        .help("Masked operation")
}

/// Element dtype (positional).
pub fn dtype_arg() -> Arg {
    Arg::new("dtype")
        .value_name("DTYPE")
        .required(true)
        .value_parser(parse_dtype)
        .help("Element dtype (`int32`, `f16`, ...)")
}

/// Lane count (--lanes).
pub fn lanes_arg() -> Arg {
    Arg::new("lanes")
        .long("lanes")
        .value_name("N")
        .default_value("4")
        .value_parser(value_parser!(usize))
        .help("Number of lanes")
}

/// First element offset (--offset).
pub fn offset_arg() -> Arg {
    Arg::new("offset")
        .long("offset")
        .value_name("N")
        .default_value("0")
        .value_parser(value_parser!(usize))
        .help("Element offset of lane 0; lane i accesses offset + i")
}

fn parse_operator(s: &str) -> Result<OperatorKind, String> {
    OperatorKind::parse(s).ok_or_else(|| format!("unknown operator `{s}`"))
}

fn parse_dtype(s: &str) -> Result<Dtype, String> {
    s.parse::<Dtype>().map_err(|e| e.to_string())
}

fn parse_extern_lib(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_owned(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, found `{s}`")),
    }
}
