//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the fields each command uses
//! - `Into<*Args>` impls bridge dispatch to command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use warpc_core::{Dtype, OperatorKind};

use super::{ColorChoice, OutputFormat};
use crate::commands::asm::{AsmArgs, MaskedOp};
use crate::commands::check::CheckArgs;
use crate::commands::dtypes::DtypesArgs;
use crate::commands::eval::EvalArgs;
use crate::commands::promote::PromoteArgs;

pub struct CheckParams {
    pub probe_path: Option<PathBuf>,
    pub probe_text: Option<String>,
    pub extern_libs: Vec<(String, PathBuf)>,
    pub assume_linked: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            probe_path: m.get_one::<PathBuf>("probe_path").cloned(),
            probe_text: m.get_one::<String>("probe_text").cloned(),
            extern_libs: m
                .get_many::<(String, PathBuf)>("extern_lib")
                .map(|libs| libs.cloned().collect())
                .unwrap_or_default(),
            assume_linked: m.get_flag("assume_linked"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            probe_path: p.probe_path,
            probe_text: p.probe_text,
            extern_libs: p.extern_libs,
            assume_linked: p.assume_linked,
            color: p.color.should_colorize(),
        }
    }
}

pub struct PromoteParams {
    pub operator: OperatorKind,
    pub format: OutputFormat,
    pub color: ColorChoice,
}

impl PromoteParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            operator: *m
                .get_one::<OperatorKind>("operator")
                .expect("operator is required"),
            format: parse_format(m),
            color: parse_color(m),
        }
    }
}

impl From<PromoteParams> for PromoteArgs {
    fn from(p: PromoteParams) -> Self {
        Self {
            operator: p.operator,
            json: p.format == OutputFormat::Json,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DtypesParams {
    pub format: OutputFormat,
}

impl DtypesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            format: parse_format(m),
        }
    }
}

impl From<DtypesParams> for DtypesArgs {
    fn from(p: DtypesParams) -> Self {
        Self {
            json: p.format == OutputFormat::Json,
        }
    }
}

pub struct EvalParams {
    pub expr: String,
    pub lhs: String,
    pub rhs: String,
    pub mask: Option<String>,
    pub trace: bool,
    pub color: ColorChoice,
}

impl EvalParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            expr: required_string(m, "expr"),
            lhs: required_string(m, "lhs"),
            rhs: required_string(m, "rhs"),
            mask: m.get_one::<String>("mask").cloned(),
            trace: m.get_flag("trace"),
            color: parse_color(m),
        }
    }
}

impl From<EvalParams> for EvalArgs {
    fn from(p: EvalParams) -> Self {
        Self {
            expr: p.expr,
            lhs: p.lhs,
            rhs: p.rhs,
            mask: p.mask,
            trace: p.trace,
            color: p.color.should_colorize(),
        }
    }
}

pub struct AsmParams {
    pub op: MaskedOp,
    pub dtype: Dtype,
    pub lanes: usize,
    pub offset: usize,
}

impl AsmParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let op = match m.get_one::<String>("masked_op").map(|s| s.as_str()) {
            Some("store") => MaskedOp::Store,
            Some("select") => MaskedOp::Select,
            _ => MaskedOp::Load,
        };
        Self {
            op,
            dtype: *m.get_one::<Dtype>("dtype").expect("dtype is required"),
            lanes: m.get_one::<usize>("lanes").copied().unwrap_or(4),
            offset: m.get_one::<usize>("offset").copied().unwrap_or(0),
        }
    }
}

impl From<AsmParams> for AsmArgs {
    fn from(p: AsmParams) -> Self {
        Self {
            op: p.op,
            dtype: p.dtype,
            lanes: p.lanes,
            offset: p.offset,
        }
    }
}

fn required_string(m: &ArgMatches, id: &str) -> String {
    m.get_one::<String>(id)
        .cloned()
        .expect("clap enforces required args")
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_format(m: &ArgMatches) -> OutputFormat {
    match m.get_one::<String>("format").map(|s| s.as_str()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}
