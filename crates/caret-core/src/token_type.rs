//! Token type numbering shared by the grammar, the ATN and token streams.

/// Token type as assigned by grammar lowering. Negative values are markers.
pub type TokenType = i32;

/// End of input.
pub const EOF: TokenType = -1;

/// "May end here": recorded in follow sets when a rule can complete
/// without consuming another token.
pub const EPSILON: TokenType = -2;

/// Reserved; never assigned to a token.
pub const INVALID_TYPE: TokenType = 0;

/// First type handed out to grammar tokens.
pub const MIN_USER_TOKEN_TYPE: TokenType = 1;
