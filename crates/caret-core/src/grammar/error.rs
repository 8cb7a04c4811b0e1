//! Errors raised while loading a grammar.

use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

/// Error during grammar loading.
#[derive(Debug)]
pub enum GrammarError {
    Json(serde_json::Error),
    Binary(postcard::Error),
    /// Grammar notation could not be parsed. `span` is a byte range into the source.
    Syntax { message: String, span: Range<usize> },
}

impl GrammarError {
    pub(crate) fn syntax(message: impl Into<String>, span: Range<usize>) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    /// Byte range of a syntax error.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::Syntax { span, .. } => Some(span.clone()),
            _ => None,
        }
    }

    /// Render the error against its source as an annotated snippet.
    ///
    /// Non-syntax errors have no location and render as their message.
    pub fn render(&self, source: &str, colored: bool) -> String {
        let Self::Syntax { message, span } = self else {
            return self.to_string();
        };

        let renderer = if colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let range = adjust_range(span.clone(), source.len());
        let snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(message));
        let report = vec![Level::ERROR.primary_title(message).element(snippet)];
        renderer.render(&report).to_string()
    }
}

fn adjust_range(range: Range<usize>, limit: usize) -> Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Binary(e) => write!(f, "binary decode error: {e}"),
            Self::Syntax { message, span } => {
                write!(f, "syntax error at {}..{}: {message}", span.start, span.end)
            }
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Binary(e) => Some(e),
            Self::Syntax { .. } => None,
        }
    }
}
