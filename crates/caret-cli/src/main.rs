mod cli;
mod commands;

use cli::{CompleteParams, DumpParams, TokensParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("tokens", m)) => {
            let params = TokensParams::from_matches(m);
            commands::tokens::run(params.into());
        }
        Some(("complete", m)) => {
            let params = CompleteParams::from_matches(m);
            commands::complete::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
