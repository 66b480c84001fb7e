//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("warpc")
        .about("Type and operator legality for SIMT kernels")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(promote_command())
        .subcommand(dtypes_command())
        .subcommand(eval_command())
        .subcommand(asm_command())
}

/// Type check probe expressions.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Type check probe expressions")
        .override_usage(
            "\
  warpc check <FILE>
  warpc check -q <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  warpc check probes.txt                          # one probe per line
  warpc check -q 'int32 + float16'                # inline probe
  warpc check -q 'pow(f16, f16)' --assume-linked  # resolve extern calls
  warpc check -q 'libdevice.sqrt(f64)' --extern-lib libdevice=libdevice.10.bc"#,
        )
        .arg(probe_path_arg())
        .arg(probe_text_arg())
        .arg(extern_lib_arg())
        .arg(assume_linked_arg())
        .arg(color_arg())
}

/// Print the promotion table of one operator.
pub fn promote_command() -> Command {
    Command::new("promote")
        .about("Show result types of an operator over every dtype pair")
        .override_usage("  warpc promote <OP> [--format text|json]")
        .after_help(
            r#"EXAMPLES:
  warpc promote +                 # grid of result types
  warpc promote floordiv          # operators by name
  warpc promote '<<' --format json"#,
        )
        .arg(operator_arg())
        .arg(format_arg())
        .arg(color_arg())
}

/// List the dtype lattice.
pub fn dtypes_command() -> Command {
    Command::new("dtypes")
        .about("List supported dtypes")
        .arg(format_arg())
}

/// Evaluate a binary probe on concrete lanes.
pub fn eval_command() -> Command {
    Command::new("eval")
        .about("Evaluate a binary probe on concrete lane values")
        .override_usage("  warpc eval <EXPR> --lhs <VALUES> --rhs <VALUES> [--mask <BITS>]")
        .after_help(
            r#"EXAMPLES:
  warpc eval 'int8 + uint8' --lhs -1,2 --rhs 255,3
  warpc eval 'float16 * float32' --lhs 0.5,2 --rhs 3,4 --mask 1,0
  warpc eval 'int32 < int32' --lhs 1,5 --rhs 2,2 --trace"#,
        )
        .arg(expr_arg())
        .arg(lhs_arg())
        .arg(rhs_arg())
        .arg(mask_arg())
        .arg(trace_arg())
        .arg(color_arg())
}

/// Print the predicated PTX for a masked operation.
pub fn asm_command() -> Command {
    Command::new("asm")
        .about("Show predicated inline PTX for a masked operation")
        .override_usage("  warpc asm <load|store|select> <DTYPE> [--lanes <N>] [--offset <N>]")
        .after_help(
            r#"EXAMPLES:
  warpc asm load int32                   # 4 lanes from offset 0
  warpc asm store f16 --lanes 2 --offset 8
  warpc asm select float64 --lanes 1"#,
        )
        .arg(masked_op_arg())
        .arg(dtype_arg())
        .arg(lanes_arg())
        .arg(offset_arg())
}
