use std::fmt::Write as _;
use std::path::PathBuf;

use caret_core::{Colors, Vocabulary};
use caret_runtime::Token;

use super::loader::{load_grammar, load_input};

pub struct TokensArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub color: bool,
}

pub fn run(args: TokensArgs) {
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

    let input = match load_input(args.input_path.as_deref(), args.input_text.as_deref()) {
        Ok(input) => input,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    let stream = match recognizer.tokenize(&input) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let vocabulary = recognizer.vocabulary();
    print!(
        "{}",
        format_tokens(stream.tokens(), vocabulary, Colors::new(args.color))
    );
}

/// One line per token: index, display name, byte span, text. Hidden tokens
/// are dimmed and tagged.
pub fn format_tokens(tokens: &[Token], vocabulary: &Vocabulary, colors: Colors) -> String {
    let width = tokens.len().saturating_sub(1).to_string().len();
    let mut out = String::new();
    for token in tokens {
        let name = vocabulary.display_name(token.token_type);
        let span = format!("{}..{}", token.span.start, token.span.end);
        let line = if token.is_visible() {
            format!(
                "{:>width$} {} {} {:?}",
                token.index,
                colors.token(&name),
                colors.dimmed(&span),
                token.text,
            )
        } else {
            colors.dimmed(&format!(
                "{:>width$} {} {} {:?} (hidden)",
                token.index, name, span, token.text,
            ))
        };
        writeln!(out, "{line}").expect("String write never fails");
    }
    out
}
