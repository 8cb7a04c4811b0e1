use std::fs;
use std::io::{self, Read};
use std::path::Path;

use caret_core::Grammar;
use caret_runtime::GrammarRecognizer;

/// Load a grammar from inline notation or a file and build its recognizer.
///
/// Syntax errors in notation are rendered against the source.
pub fn load_grammar(
    grammar_path: Option<&Path>,
    grammar_text: Option<&str>,
    color: bool,
) -> Result<GrammarRecognizer, String> {
    let grammar = if let Some(text) = grammar_text {
        parse_notation(text, color)?
    } else if let Some(path) = grammar_path {
        load_grammar_file(path, color)?
    } else {
        return Err("grammar is required: use positional argument or -g/--grammar".to_string());
    };

    GrammarRecognizer::new(grammar).map_err(|e| e.to_string())
}

fn load_grammar_file(path: &Path, color: bool) -> Result<Grammar, String> {
    if path.as_os_str() == "-" {
        return parse_notation(&read_stdin()?, color);
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            let json = read_file(path)?;
            Grammar::from_json(&json).map_err(|e| format!("'{}': {}", path.display(), e))
        }
        Some("bin") => {
            let bytes = fs::read(path)
                .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
            Grammar::from_binary(&bytes).map_err(|e| format!("'{}': {}", path.display(), e))
        }
        _ => parse_notation(&read_file(path)?, color),
    }
}

pub(crate) fn parse_notation(source: &str, color: bool) -> Result<Grammar, String> {
    Grammar::parse(source).map_err(|e| e.render(source, color))
}

/// Input text from `-i`, a file, or stdin (`-`).
pub fn load_input(input_path: Option<&Path>, input_text: Option<&str>) -> Result<String, String> {
    if let Some(text) = input_text {
        return Ok(text.to_string());
    }

    match input_path {
        Some(path) if path.as_os_str() == "-" => read_stdin(),
        Some(path) => read_file(path),
        None => Err("input is required: use positional argument or -i/--input".to_string()),
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path.display(), e))
}

fn read_stdin() -> Result<String, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(buf)
}
