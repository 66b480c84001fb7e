mod cli;
mod commands;

use cli::{AsmParams, CheckParams, DtypesParams, EvalParams, PromoteParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("promote", m)) => {
            let params = PromoteParams::from_matches(m);
            commands::promote::run(params.into());
        }
        Some(("dtypes", m)) => {
            let params = DtypesParams::from_matches(m);
            commands::dtypes::run(params.into());
        }
        Some(("eval", m)) => {
            let params = EvalParams::from_matches(m);
            commands::eval::run(params.into());
        }
        Some(("asm", m)) => {
            let params = AsmParams::from_matches(m);
            commands::asm::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
