//! Collect completion candidates at a caret, optionally tracing the walk.

use std::path::PathBuf;

use caret_completion::{
    CancellationToken, CodeCompletionCore, Limits, PrintTracer, RuleContext, RulePreference,
    Verbosity,
};
use caret_core::{Colors, TokenType, Vocabulary};
use caret_runtime::{Atn, BufferedTokenStream, Recognizer, RuleIndex, TokenStream};

use super::loader::{load_grammar, load_input};

/// Where the caret is, before it is resolved against the token stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaretPosition {
    /// Stream index.
    Token(usize),
    /// Byte offset into the input.
    Offset(usize),
    /// The EOF token.
    End,
}

pub struct CompleteArgs {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub caret: CaretPosition,
    pub prefer: Vec<String>,
    pub ignore: Vec<String>,
    pub outermost: bool,
    pub rule: Option<String>,
    pub start: usize,
    pub trace: bool,
    pub verbosity: Verbosity,
    pub fuel: u32,
    pub recursion_limit: u32,
    pub color: bool,
}

pub fn run(args: CompleteArgs) {
    let recognizer = match load_grammar(
        args.grammar_path.as_deref(),
        args.grammar_text.as_deref(),
        args.color,
    ) {
        Ok(recognizer) => recognizer,
        Err(msg) => fail(&msg),
    };
    let Some(atn) = recognizer.atn() else {
        fail(&format!("grammar `{}` has no ATN", recognizer.grammar_name()));
    };

    let input = match load_input(args.input_path.as_deref(), args.input_text.as_deref()) {
        Ok(input) => input,
        Err(msg) => fail(&msg),
    };
    let mut stream = match recognizer.tokenize(&input) {
        Ok(stream) => stream,
        Err(e) => fail(&e.to_string()),
    };

    let caret = match resolve_caret(&stream, args.caret) {
        Ok(caret) => caret,
        Err(msg) => fail(&msg),
    };
    let preferred = match resolve_rules(atn, &args.prefer) {
        Ok(rules) => rules,
        Err(msg) => fail(&msg),
    };
    let ignored = match resolve_tokens(atn.vocabulary(), &args.ignore) {
        Ok(tokens) => tokens,
        Err(msg) => fail(&msg),
    };
    let context = match args.rule.as_deref() {
        Some(name) => match resolve_rules(atn, &[name.to_string()]) {
            Ok(rules) => Some(RuleContext::new(rules[0], args.start)),
            Err(msg) => fail(&msg),
        },
        None => None,
    };

    let preference = if args.outermost {
        RulePreference::Outermost
    } else {
        RulePreference::Innermost
    };
    let mut core = match CodeCompletionCore::builder(&recognizer)
        .preferred_rules(preferred)
        .ignored_tokens(ignored)
        .rule_preference(preference)
        .limits(
            Limits::new()
                .exec_fuel(args.fuel)
                .recursion_limit(args.recursion_limit),
        )
        .build()
    {
        Ok(core) => core,
        Err(e) => fail(&e.to_string()),
    };

    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::new(atn, args.verbosity, colors);
    let result = if args.trace {
        core.collect_candidates_with(
            &mut stream,
            caret,
            context.as_ref(),
            &mut tracer,
            &CancellationToken::new(),
        )
    } else {
        core.collect_candidates(&mut stream, caret, context.as_ref())
    };

    if args.trace {
        tracer.print();
    }
    let candidates = match result {
        Ok(candidates) => candidates,
        Err(e) => {
            eprintln!("completion error: {}", e);
            std::process::exit(2);
        }
    };

    if args.trace {
        let stats = core.stats();
        println!(
            "{}--- {} rule walks, {} shortcut hits, {} follow sets, {} states{}",
            colors.dim,
            stats.rule_walks,
            stats.shortcut_hits,
            stats.follow_set_computations,
            stats.states_processed,
            colors.reset
        );
    }

    if candidates.is_empty() {
        std::process::exit(1);
    }
    print!("{}", candidates.dump(atn));
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    std::process::exit(1);
}

/// Stream index of the caret. Offsets map to the first visible token
/// ending at or after them.
pub fn resolve_caret(stream: &BufferedTokenStream, caret: CaretPosition) -> Result<usize, String> {
    match caret {
        CaretPosition::Token(index) if index < stream.size() => Ok(index),
        CaretPosition::Token(index) => Err(format!(
            "caret {index} is past the last token (stream has {} tokens)",
            stream.size()
        )),
        CaretPosition::Offset(offset) => stream
            .token_index_at(offset)
            .ok_or_else(|| format!("offset {offset} is past the end of the input")),
        CaretPosition::End => Ok(stream.size().saturating_sub(1)),
    }
}

pub fn resolve_rules(atn: &Atn, names: &[String]) -> Result<Vec<RuleIndex>, String> {
    names
        .iter()
        .map(|name| {
            atn.rule_index(name)
                .ok_or_else(|| format!("unknown rule `{name}`"))
        })
        .collect()
}

/// Tokens by symbolic name (`ID`) or quoted literal (`'='`).
pub fn resolve_tokens(vocabulary: &Vocabulary, names: &[String]) -> Result<Vec<TokenType>, String> {
    names
        .iter()
        .map(|name| {
            vocabulary
                .token_type(name)
                .ok_or_else(|| format!("unknown token `{name}`"))
        })
        .collect()
}
