//! Lexer for the grammar notation.

use std::ops::Range;

use logos::Logos;

use super::error::GrammarError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TokenKind {
    #[token("grammar")]
    KwGrammar,

    #[token(":")]
    Colon,

    #[token(";")]
    Semi,

    #[token("|")]
    Pipe,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("~")]
    Tilde,

    #[token(".")]
    Dot,

    #[token("->")]
    Arrow,

    #[regex(r"'(?:[^'\\]|\\.)*'")]
    StringLiteral,

    /// `/.../`; `//` starts a comment instead.
    #[regex(r"/(?:[^/\\\n]|\\.)+/")]
    RegexLiteral,

    /// `{name}?`
    #[regex(r"\{[^}]*\}\?")]
    Predicate,

    /// Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Id,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
}

impl TokenKind {
    fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::LineComment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Lexeme {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// Tokenizes grammar source, dropping whitespace and comments.
pub(super) fn lex(source: &str) -> Result<Vec<Lexeme>, GrammarError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if !kind.is_trivia() {
                    tokens.push(Lexeme {
                        kind,
                        span: lexer.span(),
                    });
                }
            }
            Some(Err(())) => {
                let span = lexer.span();
                let text = &source[span.clone()];
                return Err(GrammarError::syntax(
                    format!("unexpected character `{text}`"),
                    span,
                ));
            }
            None => break,
        }
    }

    Ok(tokens)
}

/// Resolves backslash escapes inside a quoted literal or regex body.
///
/// `\n`, `\r`, `\t` become control characters; `\'`, `\\` and `\/` lose the
/// backslash when `strip` lists them. Anything else is kept verbatim.
pub(super) fn unescape(body: &str, strip: &[char]) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') if strip.contains(&'n') => out.push('\n'),
            Some('r') if strip.contains(&'r') => out.push('\r'),
            Some('t') if strip.contains(&'t') => out.push('\t'),
            Some(e) if strip.contains(&e) => out.push(e),
            Some(e) => {
                out.push('\\');
                out.push(e);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn skips_trivia() {
        use TokenKind::*;
        assert_eq!(
            kinds("grammar G; // name\nstat : ID ;"),
            [KwGrammar, Id, Semi, Id, Colon, Id, Semi]
        );
    }

    #[test]
    fn regex_versus_comment() {
        use TokenKind::*;
        assert_eq!(kinds("/[a-z]+/ // tail"), [RegexLiteral]);
        assert_eq!(kinds(r"/a\/b/"), [RegexLiteral]);
    }

    #[test]
    fn predicates_and_commands() {
        use TokenKind::*;
        assert_eq!(
            kinds("{ready}? x -> skip ~(A|'b')*"),
            [Predicate, Id, Arrow, Id, Tilde, ParenOpen, Id, Pipe, StringLiteral, ParenClose, Star]
        );
    }

    #[test]
    fn unexpected_character() {
        let err = lex("stat : # ;").unwrap_err();
        assert_eq!(err.span(), Some(7..8));
    }

    #[test]
    fn unescape_literals() {
        assert_eq!(unescape(r"\'a\\", &['\'', '\\', 'n', 'r', 't']), r"'a\");
        assert_eq!(unescape(r"\n", &['n']), "\n");
        assert_eq!(unescape(r"a\/b\d", &['/']), r"a/b\d");
    }
}
