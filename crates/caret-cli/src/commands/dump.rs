use std::path::PathBuf;

use caret_core::Colors;
use caret_runtime::{AtnPrinter, Recognizer};

use super::loader::load_grammar;

pub struct DumpArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub rules_only: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let recognizer = match load_grammar(
        args.grammar_path.as_deref(),
        args.grammar_text.as_deref(),
        args.color,
    ) {
        Ok(recognizer) => recognizer,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let Some(atn) = recognizer.atn() else {
        eprintln!("error: grammar `{}` has no ATN", recognizer.grammar_name());
        std::process::exit(1);
    };

    let output = AtnPrinter::new(atn)
        .colors(Colors::new(args.color))
        .rules_only(args.rules_only)
        .dump();
    print!("{}", output);
}
