//! The dtype lattice.

use serde::Serialize;
use warpc_core::{Dtype, DtypeKind, FloatFormat};

pub struct DtypesArgs {
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct DtypeInfo {
    pub name: &'static str,
    pub short_name: &'static str,
    pub kind: DtypeKind,
    pub bits: u32,
    pub reduced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float_format: Option<FloatFormat>,
}

impl From<Dtype> for DtypeInfo {
    fn from(d: Dtype) -> Self {
        Self {
            name: d.name(),
            short_name: d.short_name(),
            kind: d.kind(),
            bits: d.bit_width(),
            reduced: d.is_reduced(),
            float_format: d.float_format(),
        }
    }
}

pub fn run(args: DtypesArgs) {
    if args.json {
        let infos: Vec<DtypeInfo> = Dtype::ALL.into_iter().map(Into::into).collect();
        match serde_json::to_string_pretty(&infos) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    print!("{}", render_table());
}

pub fn render_table() -> String {
    let mut out = String::new();
    for d in Dtype::ALL {
        let layout = d
            .float_format()
            .map(|f| format!("e{}m{}", f.exponent_bits, f.mantissa_bits))
            .unwrap_or_default();
        let line = format!(
            "{:<9}{:<5}{:<9}{:>3}  {}",
            d.name(),
            d.short_name(),
            d.kind().to_string(),
            d.bit_width(),
            layout
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
