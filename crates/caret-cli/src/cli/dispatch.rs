//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` mirror the command `*Args` but keep clap-level choices
//! (`ColorChoice`, the raw `-v` count) until conversion.

use std::path::PathBuf;

use clap::ArgMatches;

use caret_completion::Verbosity;

use super::ColorChoice;
use crate::commands::complete::{CaretPosition, CompleteArgs};
use crate::commands::dump::DumpArgs;
use crate::commands::tokens::TokensArgs;

pub struct DumpParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub rules_only: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            grammar_path: m.get_one::<PathBuf>("grammar_path").cloned(),
            grammar_text: m.get_one::<String>("grammar_text").cloned(),
            rules_only: m.get_flag("rules_only"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            rules_only: p.rules_only,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TokensParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub color: ColorChoice,
}

impl TokensParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let grammar_text = m.get_one::<String>("grammar_text").cloned();
        let (grammar_path, input_path) = shift_positional_to_input(
            grammar_text.is_some(),
            m.get_one::<PathBuf>("grammar_path").cloned(),
            m.get_one::<PathBuf>("input_path").cloned(),
        );

        Self {
            grammar_path,
            grammar_text,
            input_path,
            input_text: m.get_one::<String>("input_text").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<TokensParams> for TokensArgs {
    fn from(p: TokensParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            input_path: p.input_path,
            input_text: p.input_text,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CompleteParams {
    pub grammar_path: Option<PathBuf>,
    pub grammar_text: Option<String>,
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub caret: Option<usize>,
    pub offset: Option<usize>,
    pub prefer: Vec<String>,
    pub ignore: Vec<String>,
    pub outermost: bool,
    pub rule: Option<String>,
    pub start: usize,
    pub trace: bool,
    pub verbose: u8,
    pub fuel: u32,
    pub recursion_limit: u32,
    pub color: ColorChoice,
}

impl CompleteParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let grammar_text = m.get_one::<String>("grammar_text").cloned();
        let (grammar_path, input_path) = shift_positional_to_input(
            grammar_text.is_some(),
            m.get_one::<PathBuf>("grammar_path").cloned(),
            m.get_one::<PathBuf>("input_path").cloned(),
        );

        Self {
            grammar_path,
            grammar_text,
            input_path,
            input_text: m.get_one::<String>("input_text").cloned(),
            caret: m.get_one::<usize>("caret").copied(),
            offset: m.get_one::<usize>("offset").copied(),
            prefer: strings(m, "prefer"),
            ignore: strings(m, "ignore"),
            outermost: m.get_flag("outermost"),
            rule: m.get_one::<String>("rule").cloned(),
            start: m.get_one::<usize>("start").copied().unwrap_or(0),
            trace: m.get_flag("trace"),
            verbose: m.get_count("verbose"),
            fuel: *m.get_one::<u32>("fuel").unwrap_or(&1_000_000),
            recursion_limit: *m.get_one::<u32>("recursion_limit").unwrap_or(&65_536),
            color: parse_color(m),
        }
    }
}

impl From<CompleteParams> for CompleteArgs {
    fn from(p: CompleteParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };
        let caret = match (p.caret, p.offset) {
            (Some(index), _) => CaretPosition::Token(index),
            (None, Some(offset)) => CaretPosition::Offset(offset),
            (None, None) => CaretPosition::End,
        };

        Self {
            grammar_path: p.grammar_path,
            grammar_text: p.grammar_text,
            input_path: p.input_path,
            input_text: p.input_text,
            caret,
            prefer: p.prefer,
            ignore: p.ignore,
            outermost: p.outermost,
            rule: p.rule,
            start: p.start,
            trace: p.trace,
            verbosity,
            fuel: p.fuel,
            recursion_limit: p.recursion_limit,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn strings(m: &ArgMatches, id: &str) -> Vec<String> {
    m.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// With `-g`, a single positional is the input, not the grammar.
/// This enables: `caret complete -g 'grammar' input.txt`
fn shift_positional_to_input(
    has_grammar_text: bool,
    grammar_path: Option<PathBuf>,
    input_path: Option<PathBuf>,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if has_grammar_text && input_path.is_none() {
        (None, grammar_path)
    } else {
        (grammar_path, input_path)
    }
}
