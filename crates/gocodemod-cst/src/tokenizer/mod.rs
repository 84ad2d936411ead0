// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

pub mod core;


pub use self::core::{RawComment, TokError, TokErrorKind, TokState, TokType, Token};

/// Tokens of a whole source text plus the comments found between them.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    /// Every token, ending with a single `EndMarker`.
    pub tokens: Vec<Token>,
    pub comments: Vec<RawComment>,
}

/// Scan `text` to completion.
pub fn tokenize(text: &str) -> Result<TokenStream, TokError> {
    let mut state = TokState::new(text);
    let mut tokens = Vec::with_capacity(text.len() / 4 + 1);
    for token in state.by_ref() {
        tokens.push(token?);
    }
    Ok(TokenStream {
        tokens,
        comments: state.comments,
    })
}
