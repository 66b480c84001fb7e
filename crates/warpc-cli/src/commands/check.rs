use std::path::PathBuf;

use warpc_compiler::{Diagnostics, Error, Session};
use warpc_core::Colors;

use super::probe_loader::load_probe_source;

pub struct CheckArgs {
    pub probe_path: Option<PathBuf>,
    pub probe_text: Option<String>,
    pub extern_libs: Vec<(String, PathBuf)>,
    pub assume_linked: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let source = match load_probe_source(args.probe_path.as_deref(), args.probe_text.as_deref())
    {
        Ok(source) => source,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    if source.text.trim().is_empty() {
        eprintln!("error: no probes to check");
        std::process::exit(1);
    }

    let mut builder = Session::builder().assume_linked(args.assume_linked);
    for (name, path) in args.extern_libs {
        builder = builder.extern_lib(name, path);
    }
    let session = match builder.build() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let colors = Colors::new(args.color);
    let mut diagnostics = Diagnostics::new();
    for (text, result) in session.check_lines(&source.text) {
        match result {
            Ok(checked) => {
                println!("{text} : {}{}{}", colors.blue, checked.expr.ty(), colors.reset);
                for call in checked.expr.calls() {
                    println!(
                        "  {}{}.{}{} -> {}",
                        colors.dim, call.library, call.name, colors.reset, call.symbol
                    );
                }
                diagnostics.extend(checked.diagnostics);
            }
            Err(Error::Parse(d) | Error::Check(d)) => diagnostics.extend(d),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Parse recovery can cascade; show root causes only.
    let diagnostics = diagnostics.filtered();
    if !diagnostics.is_empty() {
        let mut printer = diagnostics
            .printer()
            .source(&source.text)
            .colored(args.color);
        if let Some(name) = source.name.as_deref() {
            printer = printer.path(name);
        }
        eprintln!("{}", printer.render());
        eprintln!("{}", diagnostics.summary());
    }

    if diagnostics.has_errors() {
        std::process::exit(1);
    }
}
