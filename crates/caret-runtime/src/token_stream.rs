//! Tokens and seekable token streams.

use std::ops::Range;

use caret_core::{Channel, EOF, TokenType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    /// Position in the stream, counting hidden tokens.
    pub index: usize,
    pub channel: Channel,
    /// Byte range in the source text.
    pub span: Range<usize>,
    pub text: String,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        self.token_type == EOF
    }

    /// On the channel parsers see.
    pub fn is_visible(&self) -> bool {
        self.channel == Channel::Default
    }
}

/// Random-access token source with a cursor.
///
/// `next_token` returns the token under the cursor and advances past it.
pub trait TokenStream {
    /// Cursor position.
    fn index(&self) -> usize;

    /// Move the cursor; positions past the end are clamped to `size()`.
    fn seek(&mut self, index: usize);

    fn next_token(&mut self) -> Option<&Token>;

    fn get(&self, index: usize) -> Option<&Token>;

    fn size(&self) -> usize;
}

/// Token stream over a fully lexed token vector.
#[derive(Debug, Clone, Default)]
pub struct BufferedTokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl BufferedTokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the first visible token whose span ends at or after `offset`.
    /// Maps an editor caret (byte offset) to a token index.
    pub fn token_index_at(&self, offset: usize) -> Option<usize> {
        self.tokens
            .iter()
            .find(|t| t.is_visible() && t.span.end >= offset)
            .map(|t| t.index)
    }
}

impl TokenStream for BufferedTokenStream {
    fn index(&self) -> usize {
        self.cursor
    }

    fn seek(&mut self, index: usize) {
        self.cursor = index.min(self.tokens.len());
    }

    fn next_token(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    fn size(&self) -> usize {
        self.tokens.len()
    }
}
