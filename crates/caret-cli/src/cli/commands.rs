//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("caret")
        .about("Grammar-driven code completion")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(dump_command())
        .subcommand(tokens_command())
        .subcommand(complete_command())
}

/// Print the ATN a grammar lowers to.
///
/// Examples:
///   caret dump expr.g
///   caret dump -g 'stat : ID ;  ID : /[a-z]+/ ;' --rules-only
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the ATN of a grammar")
        .arg(grammar_path_arg())
        .arg(grammar_text_arg())
        .arg(rules_only_arg())
        .arg(color_arg())
}

/// Tokenize input with a grammar's lexer.
///
/// Examples:
///   caret tokens expr.g input.txt
///   caret tokens expr.g -i 'a + b'
pub fn tokens_command() -> Command {
    Command::new("tokens")
        .about("Show the token stream of an input")
        .arg(grammar_path_arg())
        .arg(input_path_arg())
        .arg(grammar_text_arg())
        .arg(input_text_arg())
        .arg(color_arg())
}

/// Collect completion candidates at a caret.
///
/// Examples:
///   caret complete expr.g -i 'a + '
///   caret complete expr.g -i 'a + ' --prefer expr --trace -v
///   caret complete expr.g input.txt --offset 12 --ignore WS
pub fn complete_command() -> Command {
    Command::new("complete")
        .about("Show completion candidates at a caret")
        .arg(grammar_path_arg())
        .arg(input_path_arg())
        .arg(grammar_text_arg())
        .arg(input_text_arg())
        .arg(caret_arg())
        .arg(offset_arg())
        .arg(prefer_arg())
        .arg(ignore_arg())
        .arg(outermost_arg())
        .arg(rule_arg())
        .arg(start_arg())
        .arg(trace_arg())
        .arg(verbose_arg())
        .arg(fuel_arg())
        .arg(recursion_limit_arg())
        .arg(color_arg())
}
