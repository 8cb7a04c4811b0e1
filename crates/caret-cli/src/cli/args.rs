//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands compose the same
//! definitions.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file (positional). `.json` and `.bin` select the serialized
/// forms, anything else is read as grammar notation.
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .help("Grammar file (notation, .json or .bin), `-` for stdin")
}

/// Inline grammar notation (-g/--grammar).
pub fn grammar_text_arg() -> Arg {
    Arg::new("grammar_text")
        .short('g')
        .long("grammar")
        .value_name("TEXT")
        .help("Inline grammar notation")
}

/// Input file to tokenize (positional).
pub fn input_path_arg() -> Arg {
    Arg::new("input_path")
        .value_name("INPUT")
        .value_parser(value_parser!(PathBuf))
        .help("Input file to complete in, `-` for stdin")
}

/// Inline input text (-i/--input).
pub fn input_text_arg() -> Arg {
    Arg::new("input_text")
        .short('i')
        .long("input")
        .value_name("TEXT")
        .allow_hyphen_values(true)
        .help("Inline input text")
}

/// Caret as a token index (--caret).
pub fn caret_arg() -> Arg {
    Arg::new("caret")
        .long("caret")
        .value_name("INDEX")
        .value_parser(value_parser!(usize))
        .conflicts_with("offset")
        .help("Caret token index")
}

/// Caret as a byte offset into the input (--offset).
pub fn offset_arg() -> Arg {
    Arg::new("offset")
        .long("offset")
        .value_name("BYTES")
        .value_parser(value_parser!(usize))
        .help("Caret byte offset (default: end of input)")
}

/// Preferred rules (--prefer, repeatable).
pub fn prefer_arg() -> Arg {
    Arg::new("prefer")
        .short('p')
        .long("prefer")
        .value_name("RULE")
        .action(ArgAction::Append)
        .help("Report this rule instead of the tokens it starts with")
}

/// Ignored tokens (--ignore, repeatable).
pub fn ignore_arg() -> Arg {
    Arg::new("ignore")
        .long("ignore")
        .value_name("TOKEN")
        .action(ArgAction::Append)
        .help("Never offer this token (name or 'literal')")
}

/// Outermost preferred rule wins (--outermost).
pub fn outermost_arg() -> Arg {
    Arg::new("outermost")
        .long("outermost")
        .action(ArgAction::SetTrue)
        .help("Translate to the outermost preferred rule instead of the innermost")
}

/// Rule to start the walk in (--rule).
pub fn rule_arg() -> Arg {
    Arg::new("rule")
        .long("rule")
        .value_name("RULE")
        .help("Start rule (default: first rule of the grammar)")
}

/// First token of the start rule (--start).
pub fn start_arg() -> Arg {
    Arg::new("start")
        .long("start")
        .value_name("INDEX")
        .value_parser(value_parser!(usize))
        .requires("rule")
        .help("Token index where the start rule begins (default: 0)")
}

/// Only list rules (--rules-only).
pub fn rules_only_arg() -> Arg {
    Arg::new("rules_only")
        .long("rules-only")
        .action(ArgAction::SetTrue)
        .help("List rules and their entry states only")
}

/// Print a walk trace before the candidates (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Trace the walk")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Trace verbosity (-v for follow sets, -vv for every state)")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .default_value("1000000")
        .value_parser(value_parser!(u32))
        .help("Walker step limit")
}

/// Rule nesting limit (--recursion-limit).
pub fn recursion_limit_arg() -> Arg {
    Arg::new("recursion_limit")
        .long("recursion-limit")
        .value_name("N")
        .default_value("65536")
        .value_parser(value_parser!(u32))
        .help("Rule nesting limit")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
