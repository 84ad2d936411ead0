// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG parser for Go source files.
//!
//! The grammar in [`grammar`] runs over the token stream and builds the
//! tree directly. Nesting is capped at a fixed depth so hostile input fails
//! with [`ParserError::NestingTooDeep`] instead of exhausting the stack, and
//! large files are parsed on a thread with a generous stack of its own.
//!
//! Comments are attached once the parse has succeeded. Every list item
//! (declaration, spec, statement, field, composite literal element, case
//! clause) takes the pending comments before it as leading comments, and the
//! comments on its last line plus any unclaimed comments inside it as
//! trailing comments.

mod builders;
mod errors;
pub(crate) mod grammar;
mod state;

#[cfg(test)]
mod tests;

pub use errors::ParserError;
pub use grammar::ParseLoc;

use std::collections::HashMap;
use std::panic;
use std::thread;

use gocodemod_core::LineIndex;

use self::grammar::{go, TokVec};
use self::state::{attach_comments, ParseState};
use crate::nodes::{CommentTable, File, NodeId, NodeIdGenerator};
use crate::tokenizer::{tokenize, RawComment, Token};
use crate::visitor::{VisitorMut, Walk};

/// Stack reserved for parsing large files.
const PARSER_STACK_SIZE: usize = 128 * 1024 * 1024;

/// Files with at most this many tokens are parsed on the calling thread.
const INLINE_TOKENS: usize = 64;

/// Result of parsing a source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: File,
    pub comments: CommentTable,
    pub lines: LineIndex,
    /// First id not used by any node of `file`.
    pub next_id: u32,
}

/// Parse a complete Go source file.
pub fn parse_file(source: &str) -> Result<ParsedFile, ParserError> {
    let stream = tokenize(source)?;
    let (tokens, comments) = (stream.tokens, stream.comments);
    if tokens.len() <= INLINE_TOKENS {
        return parse_tokens(source, &tokens, &comments);
    }
    thread::scope(|scope| {
        let spawned = thread::Builder::new()
            .name("gocodemod-parser".into())
            .stack_size(PARSER_STACK_SIZE)
            .spawn_scoped(scope, || parse_tokens(source, &tokens, &comments));
        match spawned {
            Ok(handle) => handle.join().unwrap_or_else(|p| panic::resume_unwind(p)),
            Err(_) => parse_tokens(source, &tokens, &comments),
        }
    })
}

fn parse_tokens(
    source: &str,
    tokens: &[Token],
    comments: &[RawComment],
) -> Result<ParsedFile, ParserError> {
    let lines = LineIndex::new(source);
    let input = TokVec::new(source, tokens, &lines);
    let state = ParseState::new(source, tokens);
    let mut file = match go::file(&input, &state) {
        Ok(file) => file,
        Err(err) => return Err(state.into_error(err)),
    };

    let mut renumber = Renumber {
        ids: NodeIdGenerator::new(),
        map: HashMap::new(),
    };
    file.walk_mut(&mut renumber);
    let comments = attach_comments(state.into_events(), &renumber.map, tokens, comments, &lines);
    Ok(ParsedFile {
        file,
        comments,
        lines,
        next_id: renumber.ids.count(),
    })
}

/// Gives the nodes of the final tree dense ids in pre-order, remembering
/// the id each had while parsing.
struct Renumber {
    ids: NodeIdGenerator,
    map: HashMap<NodeId, NodeId>,
}

impl VisitorMut for Renumber {
    fn visit_node_id(&mut self, id: &mut Option<NodeId>) {
        let new = self.ids.next_id();
        if let Some(old) = id.replace(new) {
            self.map.insert(old, new);
        }
    }
}
