//! Promotion table of one operator over every dtype pair.

use std::fmt::Write;

use serde::Serialize;
use warpc_core::{Colors, Dtype, ExprType, OperatorKind, resolve_dtypes};

pub struct PromoteArgs {
    pub operator: OperatorKind,
    pub json: bool,
    pub color: bool,
}

/// Resolution of `lhs op rhs`. Exactly one of `result` and `error` is set.
#[derive(Debug, Serialize)]
pub struct PromotionEntry {
    pub lhs: Dtype,
    pub rhs: Dtype,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn run(args: PromoteArgs) {
    if args.json {
        let entries = entries(args.operator);
        match serde_json::to_string_pretty(&entries) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    print!("{}", render_grid(args.operator, Colors::new(args.color)));
}

/// Row-major over [`Dtype::ALL`]: `lhs` outer, `rhs` inner.
pub fn entries(op: OperatorKind) -> Vec<PromotionEntry> {
    let mut out = Vec::with_capacity(Dtype::ALL.len() * Dtype::ALL.len());
    for lhs in Dtype::ALL {
        for rhs in Dtype::ALL {
            let entry = match resolve_dtypes(op, lhs, rhs) {
                Ok(res) => PromotionEntry {
                    lhs,
                    rhs,
                    compute: Some(res.compute.to_string()),
                    result: Some(res.result.to_string()),
                    error: None,
                },
                Err(e) => PromotionEntry {
                    lhs,
                    rhs,
                    compute: None,
                    result: None,
                    error: Some(e.to_string()),
                },
            };
            out.push(entry);
        }
    }
    out
}

const CELL: usize = 5;

/// Grid of result types: rows are the left operand, columns the right.
/// Illegal pairs show `-`.
pub fn render_grid(op: OperatorKind, colors: Colors) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<CELL$}", op.to_string());
    for rhs in Dtype::ALL {
        let _ = write!(out, "{}{:>CELL$}{}", colors.dim, rhs.short_name(), colors.reset);
    }
    out.push('\n');

    for lhs in Dtype::ALL {
        let _ = write!(out, "{}{:<CELL$}{}", colors.dim, lhs.short_name(), colors.reset);
        for rhs in Dtype::ALL {
            match resolve_dtypes(op, lhs, rhs) {
                Ok(res) => {
                    let _ = write!(out, "{:>CELL$}", cell(res.result));
                }
                Err(_) => {
                    let _ = write!(out, "{}{:>CELL$}{}", colors.red, "-", colors.reset);
                }
            }
        }
        out.push('\n');
    }
    out
}

fn cell(ty: ExprType) -> &'static str {
    match ty {
        ExprType::Scalar(d) => d.short_name(),
        ExprType::Mask => "mask",
    }
}
