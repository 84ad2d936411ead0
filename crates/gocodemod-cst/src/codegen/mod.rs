// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! gofmt-style printing of syntax trees.
//!
//! # Architecture
//!
//! Printing happens in two passes:
//!
//! 1. [`CodegenState`] walks the tree and emits tokens interleaved with
//!    *buffered* whitespace. Line breaks are decided by comparing the source
//!    lines of neighbouring tokens; tokens without a position (synthesized
//!    nodes) get the compact layout. Comments from the [`CommentTable`] are
//!    queued when their owner is printed and flushed in front of the next
//!    token, where the buffered whitespace can still be rearranged around
//!    them.
//! 2. The raw output, in which `\v`/`\t` separate alignment cells and `\f`
//!    ends an alignment section, goes through an elastic tabstop pass and a
//!    trailing-whitespace trim (see [`tabwriter`]).
//!
//! # Example
//!
//! ```
//! use gocodemod_cst::{parse_file, print_file};
//!
//! let parsed = parse_file("package main\nfunc main() {\nx:=1\n_ = x\n}\n").unwrap();
//! assert_eq!(
//!     print_file(&parsed),
//!     "package main\n\nfunc main() {\n\tx := 1\n\t_ = x\n}\n"
//! );
//! ```

mod declaration;
mod expression;
mod statement;
mod tabwriter;

use std::collections::HashMap;

use gocodemod_core::LineIndex;

use crate::nodes::*;
use crate::parser::ParsedFile;
use tabwriter::{trim, TabWriter, ESCAPE};

/// Maximum number of consecutive newlines kept from the source.
const MAX_NEWLINES: i64 = 2;

/// Larger than any source line, column or node size.
pub(crate) const INFINITY: usize = 1 << 30;

/// Layout options for the printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Width of a tab stop used when aligning columns.
    pub tab_width: usize,
    /// Number of extra tabs in front of every line.
    pub indent: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            tab_width: 8,
            indent: 0,
        }
    }
}

/// Implemented by every node that can be printed on its own.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState<'_>);
}

/// Buffered whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ws {
    Ignore,
    Blank,
    Vtab,
    Newline,
    Formfeed,
    Indent,
    Unindent,
}

impl Ws {
    fn byte(self) -> u8 {
        match self {
            Ws::Blank => b' ',
            Ws::Vtab => b'\x0b',
            Ws::Newline => b'\n',
            Ws::Formfeed => b'\x0c',
            Ws::Ignore | Ws::Indent | Ws::Unindent => 0,
        }
    }
}

/// The last token printed, as far as spacing decisions care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tok {
    /// Nothing, or whitespace.
    Illegal,
    Ident,
    Int,
    /// Any literal other than an integer.
    Literal,
    Op(&'static str),
    Eof,
}

/// A line/column pair in either the source or the output; line 0 is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Position {
    line: u32,
    column: u32,
}

impl Position {
    const START: Position = Position { line: 1, column: 1 };

    const END: Position = Position {
        line: INFINITY as u32,
        column: 1,
    };

    fn is_valid(self) -> bool {
        self.line > 0
    }
}

struct PendingComment<'a> {
    comment: &'a Comment,
    /// Belongs on the line of the token printed before it.
    trailing: bool,
}

/// A node whose printed size may be measured.
#[derive(Clone, Copy)]
pub(crate) enum SizeNode<'n> {
    Expr(&'n Expr),
    Stmt(&'n Stmt),
}

impl SizeNode<'_> {
    fn key(self) -> (usize, u8) {
        match self {
            SizeNode::Expr(x) => (x as *const Expr as usize, 0),
            SizeNode::Stmt(s) => (s as *const Stmt as usize, 1),
        }
    }
}

/// Printer state.
pub struct CodegenState<'a> {
    config: PrinterConfig,
    lines: Option<&'a LineIndex>,
    comments: Option<&'a CommentTable>,
    /// Measuring node sizes: no alignment pass, no comments.
    sizing: bool,

    output: Vec<u8>,
    indent: usize,
    /// Composite literal nesting depth.
    level: usize,
    no_extra_blank: bool,
    no_extra_linebreak: bool,
    implied_semi: bool,
    last_tok: Tok,
    prev_open: Tok,

    /// Source position of the next item, advanced as output is written.
    pos: Position,
    /// Position in the output.
    out: Position,
    /// Position after the last item written.
    last: Position,
    end_alignment: bool,

    wsbuf: Vec<Ws>,
    pending: Vec<PendingComment<'a>>,

    /// Output lines recorded for the first token printed after a request.
    line_slots: Vec<u32>,
    line_request: Option<usize>,

    node_sizes: HashMap<(usize, u8), usize>,
}

impl<'a> CodegenState<'a> {
    /// A printer laying out nodes against `lines` and interleaving `comments`.
    ///
    /// Without `lines` every node is printed in its compact layout.
    pub fn new(
        config: PrinterConfig,
        lines: Option<&'a LineIndex>,
        comments: Option<&'a CommentTable>,
    ) -> Self {
        CodegenState {
            config,
            lines,
            comments,
            sizing: false,
            output: Vec::new(),
            indent: 0,
            level: 0,
            no_extra_blank: false,
            no_extra_linebreak: false,
            implied_semi: false,
            last_tok: Tok::Illegal,
            prev_open: Tok::Illegal,
            pos: Position::START,
            out: Position::START,
            last: Position::default(),
            end_alignment: false,
            wsbuf: Vec::with_capacity(16),
            pending: Vec::new(),
            line_slots: Vec::new(),
            line_request: None,
            node_sizes: HashMap::new(),
        }
    }

    fn sizer(
        config: PrinterConfig,
        lines: Option<&'a LineIndex>,
        node_sizes: HashMap<(usize, u8), usize>,
    ) -> Self {
        let mut state = CodegenState::new(config, lines, None);
        state.sizing = true;
        state.node_sizes = node_sizes;
        state
    }

    /// Flush pending comments and whitespace and return the formatted text.
    pub fn finish(mut self) -> String {
        let text = self.finish_bytes();
        match String::from_utf8(text) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    fn finish_bytes(&mut self) -> Vec<u8> {
        self.implied_semi = false;
        self.flush(Position::END, Tok::Eof);
        let raw = std::mem::take(&mut self.output);
        if self.sizing {
            trim(&raw)
        } else {
            trim(&TabWriter::new(self.config.tab_width, 1).align(&raw))
        }
    }

    // ------------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------------

    fn pos_for(&self, pos: Pos) -> Position {
        match (self.lines, pos.offset()) {
            (Some(lines), Some(offset)) => {
                let (line, column) = lines.position(offset);
                Position { line, column }
            }
            _ => Position::default(),
        }
    }

    /// Source line of `pos`, or 0.
    pub(crate) fn line_for(&self, pos: Pos) -> u32 {
        match (self.lines, pos.offset()) {
            (Some(lines), Some(offset)) => lines.line_of(offset),
            _ => 0,
        }
    }

    /// Source line computed by `f`, or 0.
    pub(crate) fn line_with(&self, f: impl FnOnce(&LineIndex) -> Option<u32>) -> u32 {
        self.lines.and_then(f).unwrap_or(0)
    }

    /// The next item is printed at `pos`, if known.
    pub(crate) fn set_pos(&mut self, pos: Pos) {
        let pos = self.pos_for(pos);
        if pos.is_valid() {
            self.pos = pos;
        }
    }

    /// Carry on as if the last item written ended at `pos`.
    pub(crate) fn skip_to(&mut self, pos: Pos) {
        let pos = self.pos_for(pos);
        if pos.is_valid() {
            self.pos = pos;
            self.last = pos;
        }
    }

    /// Reserve a slot for the output line of the next printed token.
    pub(crate) fn record_line(&mut self) -> usize {
        self.line_slots.push(0);
        let slot = self.line_slots.len() - 1;
        self.line_request = Some(slot);
        slot
    }

    pub(crate) fn recorded_line(&self, slot: usize) -> u32 {
        self.line_slots.get(slot).copied().unwrap_or(0)
    }

    /// Number of output lines written since `line`.
    pub(crate) fn lines_from(&self, line: u32) -> u32 {
        self.out.line.saturating_sub(line)
    }

    pub(crate) fn output_is_empty(&self) -> bool {
        self.output.is_empty()
    }

    // ------------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------------

    fn note_prev_open(&mut self) {
        match self.last_tok {
            Tok::Illegal => {}
            Tok::Op("(") | Tok::Op("[") => self.prev_open = self.last_tok,
            _ => self.prev_open = Tok::Illegal,
        }
    }

    /// Buffer whitespace.
    pub(crate) fn ws(&mut self, ws: Ws) {
        self.note_prev_open();
        if ws == Ws::Ignore {
            return;
        }
        if matches!(ws, Ws::Newline | Ws::Formfeed) {
            self.implied_semi = false;
        }
        self.wsbuf.push(ws);
        self.last_tok = Tok::Illegal;
    }

    /// Print a keyword or operator.
    pub(crate) fn token(&mut self, text: &'static str) {
        self.note_prev_open();
        if let Some(&first) = text.as_bytes().first() {
            if may_combine(self.last_tok, first) {
                self.wsbuf.push(Ws::Blank);
            }
        }
        let implied_semi = matches!(
            text,
            "break" | "continue" | "fallthrough" | "return" | "++" | "--" | ")" | "]" | "}"
        );
        self.last_tok = Tok::Op(text);
        self.print_data(text, false, implied_semi);
    }

    pub(crate) fn ident(&mut self, ident: &Ident) {
        self.set_pos(ident.pos);
        self.note_prev_open();
        self.last_tok = Tok::Ident;
        self.print_data(&ident.name, false, true);
    }

    pub(crate) fn basic_lit(&mut self, lit: &BasicLit) {
        self.set_pos(lit.pos);
        self.note_prev_open();
        self.last_tok = if lit.kind == LitKind::Int {
            Tok::Int
        } else {
            Tok::Literal
        };
        let value = normalized_number(lit);
        self.print_data(&value, true, true);
    }

    fn print_data(&mut self, data: &str, is_lit: bool, mut implied_semi: bool) {
        let next = self.pos;
        let (wrote_newline, dropped_ff) = self.flush(next, self.last_tok);

        // Keep the blank lines the source had before this item, unless a
        // statement could end here.
        if !self.implied_semi {
            let mut n = nlimit(next.line as i64 - self.pos.line as i64);
            if wrote_newline && n == MAX_NEWLINES {
                n = MAX_NEWLINES - 1;
            }
            if n > 0 {
                let ch = if dropped_ff { b'\x0c' } else { b'\n' };
                self.write_byte(ch, n as usize);
                implied_semi = false;
            }
        }

        if let Some(slot) = self.line_request.take() {
            if let Some(line) = self.line_slots.get_mut(slot) {
                *line = self.out.line;
            }
        }

        self.write_string(next, data, is_lit);
        self.implied_semi = implied_semi;
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    fn write_indent(&mut self) {
        let n = self.config.indent + self.indent;
        self.output.resize(self.output.len() + n, b'\t');
        self.pos.column += n as u32;
        self.out.column += n as u32;
    }

    fn write_byte(&mut self, ch: u8, n: usize) {
        if n == 0 {
            return;
        }
        let mut ch = ch;
        if self.end_alignment {
            match ch {
                b'\t' | b'\x0b' => ch = b' ',
                b'\n' | b'\x0c' => {
                    ch = b'\x0c';
                    self.end_alignment = false;
                }
                _ => {}
            }
        }

        if self.out.column == 1 {
            self.write_indent();
        }
        self.output.resize(self.output.len() + n, ch);

        let n = n as u32;
        if ch == b'\n' || ch == b'\x0c' {
            self.pos.line += n;
            self.out.line += n;
            self.pos.column = 1;
            self.out.column = 1;
            return;
        }
        self.pos.column += n;
        self.out.column += n;
    }

    fn write_string(&mut self, pos: Position, s: &str, is_lit: bool) {
        if self.out.column == 1 {
            self.write_indent();
        }
        if pos.is_valid() {
            self.pos = pos;
        }

        let bytes = s.as_bytes();
        if is_lit {
            // Multi-line literals and comments must not take part in the
            // alignment of the lines around them.
            self.output.push(ESCAPE);
        }
        self.output.extend_from_slice(bytes);

        let mut nlines = 0u32;
        let mut last_break = 0;
        for i in memchr::memchr2_iter(b'\n', b'\x0c', bytes) {
            nlines += 1;
            last_break = i;
        }
        if nlines > 0 {
            self.end_alignment = true;
            let column = (bytes.len() - last_break) as u32;
            self.pos.line += nlines;
            self.out.line += nlines;
            self.pos.column = column;
            self.out.column = column;
        } else {
            self.pos.column += bytes.len() as u32;
            self.out.column += bytes.len() as u32;
        }

        if is_lit {
            self.output.push(ESCAPE);
        }
        self.last = self.pos;
    }

    fn write_whitespace(&mut self, n: usize) {
        let mut i = 0;
        while i < n {
            match self.wsbuf[i] {
                Ws::Ignore => {}
                Ws::Indent => self.indent += 1,
                Ws::Unindent => self.indent = self.indent.saturating_sub(1),
                ch @ (Ws::Newline | Ws::Formfeed) => {
                    // A line break followed by an unindent is written after
                    // the unindent so a comment in between lines up with
                    // the closing token.
                    if i + 1 < n && self.wsbuf[i + 1] == Ws::Unindent {
                        self.wsbuf[i] = Ws::Unindent;
                        self.wsbuf[i + 1] = Ws::Formfeed;
                        continue;
                    }
                    self.write_byte(ch.byte(), 1);
                }
                ch => self.write_byte(ch.byte(), 1),
            }
            i += 1;
        }
        self.wsbuf.drain(..n);
    }

    fn contains_linebreak(&self) -> bool {
        self.wsbuf
            .iter()
            .any(|ws| matches!(ws, Ws::Newline | Ws::Formfeed))
    }

    /// Buffer between `min` and [`MAX_NEWLINES`] line breaks before an item
    /// on source line `line`, preceded by `ws`. A new section starts with a
    /// formfeed, which ends column alignment. Returns the number of breaks.
    pub(crate) fn linebreak(&mut self, line: u32, min: usize, ws: Ws, new_section: bool) -> usize {
        let mut n = nlimit(line as i64 - self.pos.line as i64).max(min as i64) as usize;
        let mut nbreaks = 0;
        if n > 0 {
            self.ws(ws);
            if new_section {
                self.ws(Ws::Formfeed);
                n -= 1;
                nbreaks = 2;
            }
            nbreaks += n;
            for _ in 0..n {
                self.ws(Ws::Newline);
            }
        }
        nbreaks
    }

    // ------------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------------

    fn queue_comments(&mut self, comments: &'a [Comment], trailing: bool) {
        self.pending.extend(
            comments
                .iter()
                .map(|comment| PendingComment { comment, trailing }),
        );
    }

    /// Queue the comments on the lines before node `id`.
    pub(crate) fn leading_comments(&mut self, id: Option<NodeId>) {
        if let Some(table) = self.comments {
            self.queue_comments(table.leading(id), false);
        }
    }

    /// Queue the comments after node `id` on its last line.
    pub(crate) fn trailing_comments(&mut self, id: Option<NodeId>) {
        if let Some(table) = self.comments {
            self.queue_comments(table.trailing(id), true);
        }
    }

    /// Queue the comments after the opening token of node `id`.
    pub(crate) fn opening_comments(&mut self, id: Option<NodeId>) {
        if let Some(table) = self.comments {
            self.queue_comments(table.opening(id), true);
        }
    }

    /// Queue the comments before the closing token of node `id`.
    pub(crate) fn closing_comments(&mut self, id: Option<NodeId>) {
        if let Some(table) = self.comments {
            self.queue_comments(table.closing(id), false);
        }
    }

    /// Whether node `id` has any comments that would be printed.
    pub(crate) fn has_comments(&self, id: Option<NodeId>) -> bool {
        self.comments
            .and_then(|table| table.get(id))
            .is_some_and(|c| !c.is_empty())
    }

    /// Whether node `id` is followed by a `//` comment.
    pub(crate) fn has_trailing_line_comment(&self, id: Option<NodeId>) -> bool {
        self.comments
            .is_some_and(|table| table.trailing(id).iter().any(Comment::is_line_comment))
    }

    /// Printed size of all comments attached to `id`, or `None` if one of
    /// them needs a line of its own.
    pub(crate) fn comments_size(&self, id: Option<NodeId>) -> Option<usize> {
        let Some(comments) = self.comments.and_then(|table| table.get(id)) else {
            return Some(0);
        };
        let mut size = 0;
        for comment in comments
            .leading
            .iter()
            .chain(&comments.trailing)
            .chain(&comments.opening)
            .chain(&comments.closing)
        {
            if comment.is_line_comment() || comment.text.contains('\n') {
                return None;
            }
            size += comment.text.len();
        }
        Some(size)
    }

    fn flush(&mut self, next: Position, tok: Tok) -> (bool, bool) {
        if self.pending.is_empty() {
            let n = self.wsbuf.len();
            self.write_whitespace(n);
            return (false, false);
        }
        self.intersperse_comments(next, tok)
    }

    fn intersperse_comments(&mut self, next: Position, tok: Tok) -> (bool, bool) {
        let pending = std::mem::take(&mut self.pending);
        let mut last: Option<&'a Comment> = None;
        for item in pending {
            let pos = self.pos_for(item.comment.pos);
            self.write_comment_prefix(pos, next, last, tok, item.trailing);
            self.write_comment(item.comment);
            last = Some(item.comment);
        }
        let Some(last) = last else {
            return (false, false);
        };

        let mut needs_linebreak = false;
        if !self.no_extra_blank
            && !last.is_line_comment()
            && self.line_for(last.pos) == next.line
            && tok != Tok::Op(",")
            && (tok != Tok::Op(")") || self.prev_open == Tok::Op("("))
            && (tok != Tok::Op("]") || self.prev_open == Tok::Op("["))
        {
            if self.contains_linebreak() && !self.no_extra_linebreak && self.level == 0 {
                needs_linebreak = true;
            } else {
                self.write_byte(b' ', 1);
            }
        }
        if last.is_line_comment()
            || tok == Tok::Eof
            || (tok == Tok::Op("}") && !self.no_extra_linebreak)
        {
            needs_linebreak = true;
        }
        self.write_comment_suffix(needs_linebreak)
    }

    fn write_comment_prefix(
        &mut self,
        pos: Position,
        next: Position,
        prev: Option<&Comment>,
        tok: Tok,
        trailing: bool,
    ) {
        if self.output.is_empty() {
            return;
        }

        let after_line_comment = prev.is_some_and(Comment::is_line_comment);
        let same_line = !after_line_comment
            && (trailing || (pos.is_valid() && self.last.is_valid() && pos.line == self.last.line));

        if same_line {
            let mut has_sep = false;
            if prev.is_none() {
                let mut j = 0;
                for i in 0..self.wsbuf.len() {
                    match self.wsbuf[i] {
                        Ws::Blank => {
                            self.wsbuf[i] = Ws::Ignore;
                            continue;
                        }
                        Ws::Vtab => {
                            has_sep = true;
                            continue;
                        }
                        Ws::Indent => continue,
                        _ => {}
                    }
                    j = i;
                    break;
                }
                self.write_whitespace(j);
            }
            if !has_sep {
                let sep = if pos.is_valid() && pos.line == next.line {
                    b' '
                } else {
                    b'\t'
                };
                self.write_byte(sep, 1);
            }
            return;
        }

        let mut dropped_linebreak = false;
        let mut j = 0;
        for i in 0..self.wsbuf.len() {
            match self.wsbuf[i] {
                Ws::Blank | Ws::Vtab => {
                    self.wsbuf[i] = Ws::Ignore;
                    continue;
                }
                Ws::Indent => continue,
                Ws::Unindent => {
                    // A comment before a closing token stays at the inner
                    // indentation unless it is aligned with that token.
                    if i + 1 < self.wsbuf.len() && self.wsbuf[i + 1] == Ws::Unindent {
                        continue;
                    }
                    if tok != Tok::Op("}") && pos.column == next.column {
                        continue;
                    }
                }
                Ws::Newline | Ws::Formfeed => {
                    self.wsbuf[i] = Ws::Ignore;
                    dropped_linebreak = prev.is_none();
                }
                Ws::Ignore => {}
            }
            j = i;
            break;
        }
        self.write_whitespace(j);

        let mut n: i64 = 0;
        if pos.is_valid() && self.last.is_valid() {
            n = (pos.line as i64 - self.last.line as i64).max(0);
        }
        // Top-level comments keep a blank line from the code before them.
        if self.indent == 0 && dropped_linebreak {
            n += 1;
        }
        self.write_byte(b'\x0c', nlimit(n.max(1)) as usize);
    }

    fn write_comment(&mut self, comment: &Comment) {
        let text = comment.text.as_str();
        let pos = self.pos_for(comment.pos);

        if comment.is_line_comment() || !text.contains('\n') {
            self.write_string(pos, text.trim_end(), true);
            return;
        }

        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        // A comment starting in the first column of indented code was
        // written against the left margin; give its continuation lines a
        // common prefix so they re-indent as a block.
        if pos.is_valid() && pos.column == 1 && self.indent > 0 {
            for line in lines.iter_mut().skip(1) {
                line.insert_str(0, "   ");
            }
        }
        strip_common_prefix(&mut lines);

        let mut pos = pos;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.write_byte(b'\x0c', 1);
                pos = self.pos;
            }
            if !line.is_empty() {
                self.write_string(pos, line.trim_end(), true);
            }
        }
    }

    fn write_comment_suffix(&mut self, mut needs_linebreak: bool) -> (bool, bool) {
        let mut wrote_newline = false;
        let mut dropped_ff = false;
        for i in 0..self.wsbuf.len() {
            match self.wsbuf[i] {
                Ws::Blank | Ws::Vtab => self.wsbuf[i] = Ws::Ignore,
                ch @ (Ws::Newline | Ws::Formfeed) => {
                    if needs_linebreak {
                        needs_linebreak = false;
                        wrote_newline = true;
                    } else {
                        if ch == Ws::Formfeed {
                            dropped_ff = true;
                        }
                        self.wsbuf[i] = Ws::Ignore;
                    }
                }
                Ws::Indent | Ws::Unindent | Ws::Ignore => {}
            }
        }
        let n = self.wsbuf.len();
        self.write_whitespace(n);

        if needs_linebreak {
            self.write_byte(b'\n', 1);
            wrote_newline = true;
        }
        (wrote_newline, dropped_ff)
    }

    // ------------------------------------------------------------------------
    // Sizes
    // ------------------------------------------------------------------------

    /// Width of `node` printed on one line, or `max_size + 1` if it does not
    /// fit in `max_size` or needs more than one line.
    pub(crate) fn node_size(&mut self, node: SizeNode<'_>, max_size: usize) -> usize {
        let key = node.key();
        if let Some(&size) = self.node_sizes.get(&key) {
            return size;
        }

        let mut size = max_size + 1;
        self.node_sizes.insert(key, size);

        let mut sizer =
            CodegenState::sizer(self.config, self.lines, std::mem::take(&mut self.node_sizes));
        match node {
            SizeNode::Expr(x) => sizer.expr(x),
            SizeNode::Stmt(s) => sizer.stmt(s, false),
        }
        let text = sizer.finish_bytes();
        self.node_sizes = std::mem::take(&mut sizer.node_sizes);

        if text.len() <= max_size && memchr::memchr(b'\n', &text).is_none() {
            size = text.len();
            self.node_sizes.insert(key, size);
        }
        size
    }
}

fn nlimit(n: i64) -> i64 {
    n.min(MAX_NEWLINES)
}

/// Whether printing a token starting with `next` right after `prev` would
/// read as a different token.
fn may_combine(prev: Tok, next: u8) -> bool {
    match prev {
        Tok::Int => next == b'.',
        Tok::Op("+") => next == b'+',
        Tok::Op("-") => next == b'-',
        Tok::Op("/") => next == b'*',
        Tok::Op("<") => next == b'-' || next == b'<',
        Tok::Op("&") => next == b'&' || next == b'^',
        _ => false,
    }
}

/// Lower-case prefixes and exponents of a number literal; other literals are
/// returned as they are.
fn normalized_number(lit: &BasicLit) -> std::borrow::Cow<'_, str> {
    use std::borrow::Cow;

    let x = lit.value.as_str();
    if !matches!(lit.kind, LitKind::Int | LitKind::Float | LitKind::Imag) || x.len() < 2 {
        return Cow::Borrowed(x);
    }
    let replace_last = |x: &str, from: char, to: &str| -> Option<String> {
        x.rfind(from)
            .map(|i| format!("{}{}{}", &x[..i], to, &x[i + 1..]))
    };
    match &x[..2] {
        "0X" => {
            let x = format!("0x{}", &x[2..]);
            Cow::Owned(replace_last(&x, 'P', "p").unwrap_or(x))
        }
        "0x" => replace_last(x, 'P', "p").map_or(Cow::Borrowed(x), Cow::Owned),
        "0O" => Cow::Owned(format!("0o{}", &x[2..])),
        "0B" => Cow::Owned(format!("0b{}", &x[2..])),
        "0o" | "0b" => Cow::Borrowed(x),
        _ => {
            if let Some(x) = replace_last(x, 'E', "e") {
                return Cow::Owned(x);
            }
            if x.ends_with('i') && !x.contains(['.', 'e']) {
                let trimmed = x.trim_start_matches(['0', '_']);
                if trimmed == "i" {
                    return Cow::Borrowed("0i");
                }
                return Cow::Borrowed(trimmed);
            }
            Cow::Borrowed(x)
        }
    }
}

/// Remove the indentation shared by the continuation lines of a `/* */`
/// comment. A vertical line of stars stays aligned, and a closing `*/` on a
/// line of its own is lined up with the opening `/*`.
fn strip_common_prefix(lines: &mut [String]) {
    if lines.len() <= 1 {
        return;
    }
    let last_index = lines.len() - 1;

    let mut prefix = String::new();
    let mut prefix_set = false;
    for line in lines[1..last_index].iter_mut() {
        if is_blank(line) {
            line.clear();
            continue;
        }
        if !prefix_set {
            prefix = line.clone();
            prefix_set = true;
        }
        prefix = common_prefix(&prefix, line).to_string();
    }
    if !prefix_set {
        let last = &lines[last_index];
        prefix = common_prefix(last, last).to_string();
    }

    let mut line_of_stars = false;
    if let Some(star) = prefix.find('*') {
        prefix.truncate(star);
        if prefix.ends_with(' ') {
            prefix.pop();
        }
        line_of_stars = true;
    } else {
        let first = lines[0].as_bytes();
        let after_open = first.get(2..).unwrap_or_default();
        if after_open.iter().all(|&b| b <= b' ') {
            // Keep text indented relative to the `/*` if it was.
            let mut i = prefix.len();
            let bytes = prefix.as_bytes();
            let mut n = 0;
            while n < 3 && i > 0 && bytes[i - 1] == b' ' {
                i -= 1;
                n += 1;
            }
            if i == prefix.len() && i > 0 && bytes[i - 1] == b'\t' {
                i -= 1;
            }
            prefix.truncate(i);
        } else {
            // Text follows the `/*`: the whitespace after the opener (or
            // two blanks standing in for it) is part of the text's indent.
            let mut n = 2;
            while n < first.len() && first[n] <= b' ' {
                n += 1;
            }
            let suffix = if n > 2 && first[2] == b'\t' {
                first[2..n].to_vec()
            } else {
                let mut suffix = b"  ".to_vec();
                suffix.extend_from_slice(&first[2..n]);
                suffix
            };
            if prefix.as_bytes().ends_with(&suffix) {
                prefix.truncate(prefix.len() - suffix.len());
            }
        }
    }

    let last = &lines[last_index];
    let before_close = last.find("*/").map_or(last.as_str(), |i| &last[..i]);
    if is_blank(before_close) {
        let closing = if line_of_stars { " */" } else { "*/" };
        lines[last_index] = format!("{prefix}{closing}");
    } else {
        prefix = common_prefix(&prefix, last).to_string();
    }

    for line in lines.iter_mut().skip(1) {
        if !line.is_empty() {
            *line = line.get(prefix.len()..).unwrap_or_default().to_string();
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| b <= b' ')
}

fn common_prefix<'s>(a: &'s str, b: &str) -> &'s str {
    let end = a
        .bytes()
        .zip(b.bytes())
        .take_while(|&(x, y)| x == y && (x <= b' ' || x == b'*'))
        .count();
    &a[..end]
}

// ============================================================================
// Entry points
// ============================================================================

impl Codegen for File {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.file(self);
    }
}

impl Codegen for Decl {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.decl(self);
    }
}

impl Codegen for GenDecl {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.gen_decl(self);
    }
}

impl Codegen for FuncDecl {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.func_decl(self);
    }
}

impl Codegen for Spec {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.spec(self, 1, false);
    }
}

impl Codegen for Stmt {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        // A label is printed one tab left of its statement.
        if let Stmt::Labeled(_) = self {
            state.indent = 1;
        }
        state.stmt(self, false);
    }
}

impl Codegen for BlockStmt {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.block(self, 1);
    }
}

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.expr(self);
    }
}

impl Codegen for CallExpr {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.call_expr(self, 1);
    }
}

impl Codegen for Ident {
    fn codegen(&self, state: &mut CodegenState<'_>) {
        state.ident(self);
    }
}

/// Format a parsed (and possibly modified) file the way gofmt does.
pub fn print_file(parsed: &ParsedFile) -> String {
    print_file_with(parsed, &PrinterConfig::default())
}

pub fn print_file_with(parsed: &ParsedFile, config: &PrinterConfig) -> String {
    let mut state = CodegenState::new(*config, Some(&parsed.lines), Some(&parsed.comments));
    parsed.file.codegen(&mut state);
    state.finish()
}

/// Render `node` on its own, without source layout or comments.
///
/// ```
/// use gocodemod_cst::{source_code, CallExpr, Expr};
///
/// let call = CallExpr::new(Expr::selector(Expr::ident("errors"), "New"), vec![]);
/// assert_eq!(source_code(&call), "errors.New()");
/// ```
pub fn source_code<T: Codegen + ?Sized>(node: &T) -> String {
    let mut state = CodegenState::new(PrinterConfig::default(), None, None);
    node.codegen(&mut state);
    state.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;

    fn format(source: &str) -> String {
        print_file(&parse_file(source).unwrap())
    }

    #[test]
    fn test_may_combine() {
        assert!(may_combine(Tok::Op("-"), b'-'));
        assert!(may_combine(Tok::Int, b'.'));
        assert!(may_combine(Tok::Op("<"), b'-'));
        assert!(!may_combine(Tok::Ident, b'.'));
        assert!(!may_combine(Tok::Op("+"), b'-'));
    }

    #[test]
    fn test_normalized_number() {
        let lit = |v: &str, kind| BasicLit {
            kind,
            ..BasicLit::int(v)
        };
        assert_eq!(normalized_number(&lit("0XFF", LitKind::Int)), "0xFF");
        assert_eq!(normalized_number(&lit("1E5", LitKind::Float)), "1e5");
        assert_eq!(normalized_number(&lit("0O17", LitKind::Int)), "0o17");
        assert_eq!(normalized_number(&lit("0x1P-2", LitKind::Float)), "0x1p-2");
        assert_eq!(normalized_number(&lit("007i", LitKind::Imag)), "7i");
        assert_eq!(normalized_number(&lit("00i", LitKind::Imag)), "0i");
        assert_eq!(normalized_number(&lit("42", LitKind::Int)), "42");
        assert_eq!(normalized_number(&lit("\"E\"", LitKind::String)), "\"E\"");
    }

    #[test]
    fn test_strip_common_prefix() {
        let mut lines: Vec<String> = ["/*", "\t\tfirst", "\t\tsecond", "\t\t*/"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        strip_common_prefix(&mut lines);
        assert_eq!(lines, vec!["/*", "\tfirst", "\tsecond", "*/"]);

        let mut stars: Vec<String> = ["/*", "\t * one", "\t * two", "\t */"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        strip_common_prefix(&mut stars);
        assert_eq!(stars, vec!["/*", " * one", " * two", " */"]);
    }

    #[test]
    fn test_source_code_is_compact() {
        let parsed = parse_file("package p\n\nvar x = f(\n\ta,\n\tb,\n)\n").unwrap();
        let spec = &parsed.file.decls[0].as_gen().unwrap().specs[0];
        let Spec::Value(value) = spec else {
            panic!("expected a value spec");
        };
        assert_eq!(source_code(&value.values[0]), "f(a, b)");
    }

    #[test]
    fn test_print_file_normalizes_spacing() {
        assert_eq!(
            format("package main\nimport \"fmt\"\nfunc main(){fmt.Println(1+2)}\n"),
            "package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println(1 + 2) }\n"
        );
    }

    #[test]
    fn test_blank_lines_are_capped() {
        assert_eq!(
            format("package main\n\n\n\nvar a = 1\n\n\n\nvar b = 2\n"),
            "package main\n\nvar a = 1\n\nvar b = 2\n"
        );
    }

    #[test]
    fn test_comments_are_kept() {
        let source = "// Package main does things.\npackage main\n\n// f is documented.\nfunc f() {\n\tx := 1 // trailing\n\t// before y\n\ty := 2\n\t_, _ = x, y\n}\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_printer_config_indent() {
        let parsed = parse_file("package p\n\nvar x = 1\n").unwrap();
        let config = PrinterConfig {
            indent: 1,
            ..PrinterConfig::default()
        };
        assert_eq!(
            print_file_with(&parsed, &config),
            "\tpackage p\n\n\tvar x = 1\n"
        );
    }
}
