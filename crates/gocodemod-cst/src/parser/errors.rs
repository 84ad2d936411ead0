// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::parser::grammar::ParseLoc;
use crate::tokenizer::TokError;
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error: {0}")]
    TokenizerError(#[from] TokError),
    #[error("parser error: {0}")]
    ParserError(peg::error::ParseError<ParseLoc>),
    /// Input the grammar accepts but Go does not, such as `package _`.
    #[error("parser error: {message} at offset {offset}")]
    SyntaxError { message: String, offset: usize },
    #[error("parser error: nesting too deep at offset {offset}")]
    NestingTooDeep { offset: usize },
}

impl ParserError {
    /// Byte offset of the failure in the parsed text.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError(e) => e.offset,
            ParserError::ParserError(e) => e.location.offset,
            ParserError::SyntaxError { offset, .. } | ParserError::NestingTooDeep { offset } => {
                *offset
            }
        }
    }

    /// The error message without the offset.
    pub fn message(&self) -> String {
        match self {
            ParserError::TokenizerError(e) => e.kind.to_string(),
            ParserError::ParserError(e) => {
                format!("expected {}, found {}", e.expected, e.location.found)
            }
            ParserError::SyntaxError { message, .. } => message.clone(),
            ParserError::NestingTooDeep { .. } => "nesting too deep".to_string(),
        }
    }
}
