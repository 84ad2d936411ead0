// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! State threaded through the grammar, and comment attachment.
//!
//! The grammar backtracks, so nothing it records may depend on the order in
//! which alternatives are tried. Node ids come from a counter that never
//! repeats; comment placements are recorded as events keyed by the id of the
//! node they belong to and the token index the sequential attachment would
//! happen at. Once the parse succeeds, events whose node did not make it into
//! the tree are dropped and the rest are replayed in token order against the
//! comment list.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use gocodemod_core::LineIndex;

use super::errors::ParserError;
use super::grammar::ParseLoc;
use crate::nodes::{Comment, CommentTable, NodeComments, NodeId, Pos};
use crate::tokenizer::{RawComment, Token};

/// Deepest nesting of expressions, types, blocks and literals accepted.
pub(crate) const MAX_NESTING: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Comments before the token at `at`.
    Leading,
    /// Comments inside an item ending at token `end`, or on its last line.
    Trailing { end: usize },
    /// Comments on the line of the opening token just before `at`.
    Opening,
    /// Comments before the closing token at `at`.
    Closing,
    /// Everything left at the end of the file.
    Rest,
}

impl Placement {
    /// Order of placements recorded at the same token.
    fn rank(self) -> u8 {
        match self {
            Placement::Trailing { .. } => 0,
            Placement::Opening => 1,
            Placement::Closing | Placement::Rest => 2,
            Placement::Leading => 3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CommentEvent {
    id: NodeId,
    at: usize,
    placement: Placement,
}

#[derive(Debug, Clone)]
struct Failure {
    index: usize,
    offset: usize,
    message: &'static str,
}

pub(crate) struct ParseState<'a> {
    pub(crate) source: &'a str,
    pub(crate) tokens: &'a [Token],
    next_id: Cell<u32>,
    depth: Cell<usize>,
    too_deep: Cell<Option<usize>>,
    failure: RefCell<Option<Failure>>,
    events: RefCell<Vec<CommentEvent>>,
}

impl<'a> ParseState<'a> {
    pub(crate) fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        ParseState {
            source,
            tokens,
            next_id: Cell::new(0),
            depth: Cell::new(0),
            too_deep: Cell::new(None),
            failure: RefCell::new(None),
            events: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn id(&self) -> Option<NodeId> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Some(NodeId(id))
    }

    pub(crate) fn pos(&self, tok: Token) -> Pos {
        Pos::from_offset(tok.start)
    }

    pub(crate) fn text(&self, tok: Token) -> String {
        tok.text(self.source).to_string()
    }

    /// Byte offset of the token at `index`, or the end of the text.
    pub(crate) fn offset_at(&self, index: usize) -> usize {
        self.tokens
            .get(index)
            .map_or(self.source.len(), |tok| tok.start)
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    pub(crate) fn enter(&self, index: usize) -> Result<(), &'static str> {
        let depth = self.depth.get();
        if depth >= MAX_NESTING {
            if self.too_deep.get().is_none() {
                self.too_deep.set(Some(index));
            }
            return Err("shallower nesting");
        }
        self.depth.set(depth + 1);
        Ok(())
    }

    pub(crate) fn leave(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    // ========================================================================
    // Failures
    // ========================================================================

    /// Record a failure the grammar alone cannot describe well, reported
    /// instead of the grammar's expectations when the parse stops at `index`.
    pub(crate) fn fail<T>(
        &self,
        index: usize,
        offset: usize,
        message: &'static str,
    ) -> Result<T, &'static str> {
        let mut failure = self.failure.borrow_mut();
        if failure.as_ref().is_none_or(|f| index >= f.index) {
            *failure = Some(Failure {
                index,
                offset,
                message,
            });
        }
        Err(message)
    }

    /// The error to report for a parse that failed with `err`.
    pub(crate) fn into_error(self, err: peg::error::ParseError<ParseLoc>) -> ParserError {
        if let Some(index) = self.too_deep.get() {
            return ParserError::NestingTooDeep {
                offset: self.offset_at(index),
            };
        }
        match self.failure.into_inner() {
            Some(failure) if failure.index >= err.location.index => ParserError::SyntaxError {
                message: failure.message.to_string(),
                offset: failure.offset,
            },
            _ => ParserError::ParserError(err),
        }
    }

    // ========================================================================
    // Comment events
    // ========================================================================

    fn record(&self, id: Option<NodeId>, at: usize, placement: Placement) {
        if let Some(id) = id {
            self.events.borrow_mut().push(CommentEvent { id, at, placement });
        }
    }

    /// A list item spanning tokens `start..end`, its terminator ending
    /// before `after`.
    pub(crate) fn item(&self, id: Option<NodeId>, start: usize, end: usize, after: usize) {
        self.record(id, start, Placement::Leading);
        self.record(id, after, Placement::Trailing { end });
    }

    pub(crate) fn leading(&self, id: Option<NodeId>, start: usize) {
        self.record(id, start, Placement::Leading);
    }

    /// A container opened by the token before `after_open` and closed by the
    /// token at `close`.
    pub(crate) fn container(&self, id: Option<NodeId>, after_open: usize, close: usize) {
        self.record(id, after_open, Placement::Opening);
        self.record(id, close, Placement::Closing);
    }

    pub(crate) fn opening(&self, id: Option<NodeId>, after_open: usize) {
        self.record(id, after_open, Placement::Opening);
    }

    pub(crate) fn rest(&self, id: Option<NodeId>, at: usize) {
        self.record(id, at, Placement::Rest);
    }

    pub(crate) fn into_events(self) -> Vec<CommentEvent> {
        self.events.into_inner()
    }
}

/// Walks the comment list front to back, handing out runs of comments.
struct CommentCursor<'c> {
    comments: &'c [RawComment],
    next: usize,
    lines: &'c LineIndex,
}

impl CommentCursor<'_> {
    fn take_while(&mut self, keep: impl Fn(&RawComment) -> bool) -> Vec<Comment> {
        let mut taken = Vec::new();
        while let Some(comment) = self.comments.get(self.next) {
            if !keep(comment) {
                break;
            }
            taken.push(Comment::new(
                Pos::from_offset(comment.start),
                comment.text.clone(),
            ));
            self.next += 1;
        }
        taken
    }

    fn line_of(&self, offset: usize) -> u32 {
        self.lines.line_of(offset)
    }
}

/// Build the comment table for a parsed tree.
///
/// `renumbered` maps the ids handed out during parsing to the ids of the
/// nodes in the final tree; events for any other id are dropped.
pub(crate) fn attach_comments(
    events: Vec<CommentEvent>,
    renumbered: &HashMap<NodeId, NodeId>,
    tokens: &[Token],
    comments: &[RawComment],
    lines: &LineIndex,
) -> CommentTable {
    let mut events: Vec<CommentEvent> = events
        .into_iter()
        .filter_map(|event| {
            renumbered
                .get(&event.id)
                .map(|&id| CommentEvent { id, ..event })
        })
        .collect();
    events.sort_by_key(|event| (event.at, event.placement.rank()));

    let start_of = |index: usize| tokens.get(index).map_or(usize::MAX, |tok| tok.start);
    let end_of = |index: Option<usize>| {
        index
            .and_then(|index| tokens.get(index))
            .map_or(0, |tok| tok.end)
    };

    let mut cursor = CommentCursor {
        comments,
        next: 0,
        lines,
    };
    let mut table = CommentTable::new();
    for event in events {
        let limit = start_of(event.at);
        let (taken, slot): (Vec<Comment>, fn(&mut NodeComments) -> &mut Vec<Comment>) =
            match event.placement {
                Placement::Leading => (cursor.take_while(|c| c.start < limit), |c| &mut c.leading),
                Placement::Trailing { end } => {
                    let item_end = end_of(end.checked_sub(1));
                    let line = cursor.line_of(item_end.saturating_sub(1));
                    let lines = cursor.lines;
                    (
                        cursor.take_while(|c| {
                            c.start < item_end || (c.start < limit && lines.line_of(c.start) == line)
                        }),
                        |c| &mut c.trailing,
                    )
                }
                Placement::Opening => {
                    let open_end = end_of(event.at.checked_sub(1));
                    let line = cursor.line_of(open_end.saturating_sub(1));
                    let lines = cursor.lines;
                    (
                        cursor.take_while(|c| c.start < limit && lines.line_of(c.start) == line),
                        |c| &mut c.opening,
                    )
                }
                Placement::Closing => (cursor.take_while(|c| c.start < limit), |c| &mut c.closing),
                Placement::Rest => (cursor.take_while(|_| true), |c| &mut c.closing),
            };
        if !taken.is_empty() {
            slot(table.entry(event.id)).extend(taken);
        }
    }
    table.prune();
    table
}
