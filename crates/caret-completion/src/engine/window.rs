//! The tokens a completion request walks over.

use std::ops::{Deref, DerefMut};

use caret_core::{Channel, EOF, TokenType};
use caret_runtime::{Token, TokenStream};

/// Visible tokens from the start of the enclosing rule up to the caret.
///
/// The last entry is the caret token: the first visible token at or after
/// the caret index, or EOF when input ends earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWindow {
    tokens: Vec<Token>,
}

impl TokenWindow {
    /// Read the window from `stream`, starting at stream index `start`.
    ///
    /// The stream cursor is left where it was.
    pub fn build<S: TokenStream + ?Sized>(stream: &mut S, start: usize, caret: usize) -> Self {
        let mut cursor = CursorGuard::new(stream);
        cursor.seek(start);

        let mut tokens = Vec::new();
        loop {
            let Some(token) = cursor.next_token() else {
                tokens.push(synthetic_eof(&*cursor));
                break;
            };
            if token.is_visible() {
                let done = token.index >= caret || token.is_eof();
                tokens.push(token.clone());
                if done {
                    break;
                }
            } else if token.is_eof() {
                tokens.push(synthetic_eof(&*cursor));
                break;
            }
        }

        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Window position of the caret token.
    pub fn caret_index(&self) -> usize {
        self.tokens.len().saturating_sub(1)
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Token type at a window position; EOF past the end.
    pub fn token_type(&self, index: usize) -> TokenType {
        self.tokens.get(index).map_or(EOF, |t| t.token_type)
    }

    /// Stream index of a window position.
    pub fn stream_index(&self, index: usize) -> usize {
        match self.tokens.get(index) {
            Some(t) => t.index,
            None => self.tokens.last().map_or(0, |t| t.index),
        }
    }
}

/// EOF placed after the last token of a stream that ran dry.
fn synthetic_eof<S: TokenStream + ?Sized>(stream: &S) -> Token {
    let end = stream
        .size()
        .checked_sub(1)
        .and_then(|i| stream.get(i))
        .map_or(0, |t| t.span.end);
    Token {
        token_type: EOF,
        index: stream.size(),
        channel: Channel::Default,
        span: end..end,
        text: String::new(),
    }
}

/// Restores the stream cursor on drop.
struct CursorGuard<'s, S: TokenStream + ?Sized> {
    stream: &'s mut S,
    saved: usize,
}

impl<'s, S: TokenStream + ?Sized> CursorGuard<'s, S> {
    fn new(stream: &'s mut S) -> Self {
        let saved = stream.index();
        Self { stream, saved }
    }
}

impl<S: TokenStream + ?Sized> Deref for CursorGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.stream
    }
}

impl<S: TokenStream + ?Sized> DerefMut for CursorGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.stream
    }
}

impl<S: TokenStream + ?Sized> Drop for CursorGuard<'_, S> {
    fn drop(&mut self) {
        self.stream.seek(self.saved);
    }
}
