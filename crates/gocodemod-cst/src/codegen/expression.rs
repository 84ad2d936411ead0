// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression and type layout.
//!
//! Binary expressions drop the blanks around operators that bind tighter
//! than the loosest operator of the whole expression (`a*b + c`), and
//! expression lists break lines where the source did, keeping runs of
//! similarly sized elements in one alignment section.

use gocodemod_core::LineIndex;

use super::{CodegenState, SizeNode, Ws, INFINITY};
use crate::nodes::*;

const LOWEST_PREC: u8 = 0;

/// Options for [`CodegenState::expr_list`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ListMode {
    /// A list that may end in a comma before its closing token.
    pub comma_term: bool,
    /// Never indent continuation lines.
    pub no_indent: bool,
}

impl ListMode {
    pub(crate) const COMMA_TERM: ListMode = ListMode {
        comma_term: true,
        no_indent: false,
    };

    pub(crate) const NO_INDENT: ListMode = ListMode {
        comma_term: false,
        no_indent: true,
    };
}

/// Parameter list flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamMode {
    Func,
    FuncTypeParams,
    TypeTypeParams,
}

/// An element of a comma-separated list.
pub(crate) trait ListItem {
    fn pos(&self) -> Pos;
    fn end_line(&self, lines: &LineIndex) -> Option<u32>;
    fn node_id(&self) -> Option<NodeId>;
    fn key_value(&self) -> Option<&KeyValueExpr>;
    fn print(&self, state: &mut CodegenState<'_>, depth: usize);
    fn size(&self, state: &mut CodegenState<'_>, max_size: usize) -> usize;
}

impl ListItem for Expr {
    fn pos(&self) -> Pos {
        Expr::pos(self)
    }

    fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        Expr::end_line(self, lines)
    }

    fn node_id(&self) -> Option<NodeId> {
        Expr::node_id(self)
    }

    fn key_value(&self) -> Option<&KeyValueExpr> {
        match self {
            Expr::KeyValue(pair) => Some(pair),
            _ => None,
        }
    }

    fn print(&self, state: &mut CodegenState<'_>, depth: usize) {
        state.expr0(self, depth);
    }

    fn size(&self, state: &mut CodegenState<'_>, max_size: usize) -> usize {
        state.node_size(SizeNode::Expr(self), max_size)
    }
}

impl ListItem for Ident {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos.line(lines)
    }

    fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    fn key_value(&self) -> Option<&KeyValueExpr> {
        None
    }

    fn print(&self, state: &mut CodegenState<'_>, _depth: usize) {
        state.ident(self);
    }

    fn size(&self, _state: &mut CodegenState<'_>, max_size: usize) -> usize {
        if self.name.len() <= max_size {
            self.name.len()
        } else {
            max_size + 1
        }
    }
}

impl CodegenState<'_> {
    /// Print a comma-separated list. `prev` and `next` are the positions of
    /// the tokens around the list; line breaks are taken from the source
    /// only when the list did not fit on the line of `prev`.
    pub(crate) fn expr_list<T: ListItem>(
        &mut self,
        prev0: Pos,
        list: &[T],
        depth: usize,
        mode: ListMode,
        next0: Pos,
    ) {
        let Some(last) = list.last() else {
            return;
        };
        let prev = self.pos_for(prev0);
        let next = self.pos_for(next0);
        let mut line = self.line_for(list[0].pos());
        let end_line = self.line_with(|l| last.end_line(l));

        if prev.is_valid() && prev.line == line && line == end_line {
            // All on one line.
            for (i, x) in list.iter().enumerate() {
                if i > 0 {
                    self.set_pos(x.pos());
                    self.token(",");
                    self.trailing_comments(list[i - 1].node_id());
                    self.ws(Ws::Blank);
                }
                self.leading_comments(x.node_id());
                x.print(self, depth);
            }
            if mode.comma_term && self.has_trailing_line_comment(last.node_id()) {
                self.token(",");
            }
            self.trailing_comments(last.node_id());
            return;
        }

        // Indent the list unless it starts on a new line, in which case the
        // first linebreak already did.
        let mut ws = if mode.no_indent { Ws::Ignore } else { Ws::Indent };
        let mut prev_break: isize = -1;
        if prev.is_valid() && prev.line < line && self.linebreak(line, 0, ws, true) > 0 {
            ws = Ws::Ignore;
            prev_break = 0;
        }

        // Sizes of the elements since the last line break, as a running
        // geometric mean, decide whether a break starts a new section.
        let mut size = 0usize;
        let mut lnsum = 0.0f64;
        let mut count = 0usize;

        let mut prev_line = prev.line;
        for (i, x) in list.iter().enumerate() {
            line = self.line_for(x.pos());

            let mut use_ff = true;
            let prev_size = size;
            size = x.size(self, INFINITY);
            let pair = x.key_value();
            if size <= INFINITY && prev.is_valid() && next.is_valid() {
                if let Some(pair) = pair {
                    size = self.node_size(SizeNode::Expr(&pair.key), INFINITY);
                }
            } else {
                size = 0;
            }

            if prev_size > 0 && size > 0 {
                const SMALL_SIZE: usize = 40;
                if count == 0 || (prev_size <= SMALL_SIZE && size <= SMALL_SIZE) {
                    use_ff = false;
                } else {
                    const RATIO: f64 = 2.5;
                    let geomean = (lnsum / count as f64).exp();
                    let ratio = size as f64 / geomean;
                    use_ff = RATIO * ratio <= 1.0 || RATIO <= ratio;
                }
            }

            let needs_linebreak = 0 < prev_line && prev_line < line;
            if i > 0 {
                // The comma takes the position of the next element when
                // both are on one line.
                if !needs_linebreak {
                    self.set_pos(x.pos());
                }
                self.token(",");
                self.trailing_comments(list[i - 1].node_id());
                let mut needs_blank = true;
                if needs_linebreak {
                    let nbreaks =
                        self.linebreak(line, 0, ws, use_ff || prev_break + 1 < i as isize);
                    if nbreaks > 0 {
                        ws = Ws::Ignore;
                        prev_break = i as isize;
                        needs_blank = false;
                    }
                    if nbreaks > 1 {
                        lnsum = 0.0;
                        count = 0;
                    }
                }
                if needs_blank {
                    self.ws(Ws::Blank);
                }
            }

            self.leading_comments(x.node_id());
            match pair.filter(|_| list.len() > 1 && size > 0 && needs_linebreak) {
                // Align the values of key: value pairs on separate lines.
                Some(pair) => {
                    self.expr(&pair.key);
                    self.set_pos(pair.colon);
                    self.token(":");
                    self.ws(Ws::Vtab);
                    self.expr(&pair.value);
                }
                None => x.print(self, depth),
            }

            if size > 0 {
                lnsum += (size as f64).ln();
                count += 1;
            }
            prev_line = self.line_with(|l| x.end_line(l));
        }

        let force_comma = mode.comma_term && self.has_trailing_line_comment(last.node_id());
        if mode.comma_term && ((next.is_valid() && self.pos.line < next.line) || force_comma) {
            // The closing token is on its own line.
            self.token(",");
            self.trailing_comments(last.node_id());
            if ws == Ws::Ignore && !mode.no_indent {
                self.ws(Ws::Unindent);
            }
            self.ws(Ws::Formfeed);
            return;
        }

        self.trailing_comments(last.node_id());
        if ws == Ws::Ignore && !mode.no_indent {
            self.ws(Ws::Unindent);
        }
    }

    pub(crate) fn ident_list(&mut self, list: &[Ident], indent: bool) {
        let mode = if indent {
            ListMode::default()
        } else {
            ListMode::NO_INDENT
        };
        self.expr_list(Pos::NONE, list, 1, mode, Pos::NONE);
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub(crate) fn expr(&mut self, x: &Expr) {
        self.expr1(x, LOWEST_PREC, 1);
    }

    pub(crate) fn expr0(&mut self, x: &Expr, depth: usize) {
        self.expr1(x, LOWEST_PREC, depth);
    }

    pub(crate) fn expr1(&mut self, expr: &Expr, prec1: u8, depth: usize) {
        self.set_pos(expr.pos());

        match expr {
            Expr::Ident(x) => self.ident(x),

            Expr::BasicLit(x) => self.basic_lit(x),

            Expr::Binary(x) => {
                let depth = depth.max(1);
                self.binary_expr(x, prec1, cutoff(x, depth), depth);
            }

            Expr::KeyValue(x) => {
                self.expr(&x.key);
                self.set_pos(x.colon);
                self.token(":");
                self.ws(Ws::Blank);
                self.expr(&x.value);
            }

            Expr::Star(x) => {
                if UNARY_PREC < prec1 {
                    self.token("(");
                    self.token("*");
                    self.expr(&x.x);
                    self.token(")");
                } else {
                    self.token("*");
                    self.expr(&x.x);
                }
            }

            Expr::Unary(x) => {
                if UNARY_PREC < prec1 {
                    self.token("(");
                    self.expr(expr);
                    self.token(")");
                } else {
                    self.token(x.op.as_str());
                    self.expr1(&x.x, UNARY_PREC, depth);
                }
            }

            Expr::FuncLit(x) => {
                self.set_pos(x.ty.func_pos);
                self.token("func");
                let start_col = self.out.column.saturating_sub(4);
                self.signature(&x.ty);
                let header_size = self.distance_from(x.ty.func_pos, start_col);
                self.func_body(header_size, Ws::Blank, &x.body);
            }

            Expr::Paren(x) => {
                if let Expr::Paren(_) = &x.x {
                    // Redundant parentheses.
                    self.expr0(&x.x, depth);
                } else {
                    self.token("(");
                    self.expr0(&x.x, reduce_depth(depth));
                    self.set_pos(x.rparen);
                    self.token(")");
                }
            }

            Expr::Selector(x) => {
                self.selector_expr(x, depth, false);
            }

            Expr::TypeAssert(x) => {
                self.expr1(&x.x, HIGHEST_PREC, depth);
                self.token(".");
                self.set_pos(x.lparen);
                self.token("(");
                match &x.ty {
                    Some(ty) => self.expr(ty),
                    None => self.token("type"),
                }
                self.set_pos(x.rparen);
                self.token(")");
            }

            Expr::Index(x) => {
                self.expr1(&x.x, HIGHEST_PREC, 1);
                self.set_pos(x.lbrack);
                self.token("[");
                if let [index] = x.indices.as_slice() {
                    self.expr0(index, depth + 1);
                } else {
                    self.expr_list(x.lbrack, &x.indices, depth + 1, ListMode::COMMA_TERM, x.rbrack);
                }
                self.set_pos(x.rbrack);
                self.token("]");
            }

            Expr::Slice(x) => self.slice_expr(x, depth),

            Expr::Call(x) => self.call_expr(x, depth),

            Expr::CompositeLit(x) => self.composite_lit(x, depth),

            Expr::Ellipsis(x) => {
                self.token("...");
                if let Some(elt) = &x.elt {
                    self.expr(elt);
                }
            }

            Expr::ArrayType(x) => {
                self.token("[");
                if let Some(len) = &x.len {
                    self.expr(len);
                }
                self.token("]");
                self.expr(&x.elt);
            }

            Expr::StructType(x) => {
                self.token("struct");
                self.field_list(&x.fields, true);
            }

            Expr::FuncType(x) => {
                self.token("func");
                self.signature(x);
            }

            Expr::InterfaceType(x) => {
                self.token("interface");
                self.field_list(&x.methods, false);
            }

            Expr::MapType(x) => {
                self.token("map");
                self.token("[");
                self.expr(&x.key);
                self.token("]");
                self.expr(&x.value);
            }

            Expr::ChanType(x) => {
                match x.dir {
                    ChanDir::Both => self.token("chan"),
                    ChanDir::Recv => {
                        self.token("<-");
                        self.token("chan");
                    }
                    ChanDir::Send => {
                        self.token("chan");
                        self.set_pos(x.arrow);
                        self.token("<-");
                    }
                }
                self.ws(Ws::Blank);
                self.expr(&x.value);
            }
        }
    }

    fn binary_expr(&mut self, x: &BinaryExpr, prec1: u8, cutoff_prec: u8, depth: usize) {
        let prec = x.op.precedence();
        if prec < prec1 {
            // Parenthesize, restarting the blank decisions inside.
            self.token("(");
            let depth = reduce_depth(depth);
            self.binary_expr(x, LOWEST_PREC, cutoff(x, depth), depth);
            self.token(")");
            return;
        }

        let mut print_blank = prec < cutoff_prec;

        let mut ws = Ws::Indent;
        self.expr1(&x.x, prec, depth + diff_prec(&x.x, prec));
        if print_blank {
            self.ws(Ws::Blank);
        }
        let xline = self.pos.line;
        let yline = self.line_for(x.y.pos());
        self.set_pos(x.op_pos);
        self.token(x.op.as_str());
        if xline != yline && xline > 0 && yline > 0 {
            // At least one line break, but respect an extra empty line
            // in the source.
            if self.linebreak(yline, 1, ws, true) > 0 {
                ws = Ws::Ignore;
                print_blank = false;
            }
        }
        if print_blank {
            self.ws(Ws::Blank);
        }
        self.expr1(&x.y, prec + 1, depth + 1);
        if ws == Ws::Ignore {
            self.ws(Ws::Unindent);
        }
    }

    /// Print `x.sel`, breaking before `sel` when the source did. Returns
    /// whether the line break was indented; method calls leave the
    /// unindent to the caller.
    fn selector_expr(&mut self, x: &SelectorExpr, depth: usize, is_method: bool) -> bool {
        self.expr1(&x.x, HIGHEST_PREC, depth);
        self.token(".");
        let line = self.line_for(x.sel.pos);
        if self.pos.is_valid() && self.pos.line < line {
            self.ws(Ws::Indent);
            self.ws(Ws::Newline);
            self.ident(&x.sel);
            if !is_method {
                self.ws(Ws::Unindent);
            }
            return true;
        }
        self.ident(&x.sel);
        false
    }

    fn slice_expr(&mut self, x: &SliceExpr, depth: usize) {
        self.expr1(&x.x, HIGHEST_PREC, 1);
        self.set_pos(x.lbrack);
        self.token("[");
        let mut indices = vec![x.low.as_ref(), x.high.as_ref()];
        if x.slice3 || x.max.is_some() {
            indices.push(x.max.as_ref());
        }
        // Blanks around the colons when more than one index is present
        // and one of them is a binary expression, unless nested.
        let mut needs_blanks = false;
        if depth <= 1 {
            let count = indices.iter().flatten().count();
            let has_binaries = indices
                .iter()
                .flatten()
                .any(|index| matches!(index, Expr::Binary(_)));
            needs_blanks = count > 1 && has_binaries;
        }
        for (i, index) in indices.iter().enumerate() {
            if i > 0 {
                if indices[i - 1].is_some() && needs_blanks {
                    self.ws(Ws::Blank);
                }
                self.token(":");
                if index.is_some() && needs_blanks {
                    self.ws(Ws::Blank);
                }
            }
            if let Some(index) = index {
                self.expr0(index, depth + 1);
            }
        }
        self.set_pos(x.rbrack);
        self.token("]");
    }

    pub(crate) fn call_expr(&mut self, x: &CallExpr, depth: usize) {
        self.set_pos(x.fun.pos());
        let depth = if x.args.len() > 1 { depth + 1 } else { depth };

        // Conversions to literal function types or `<-chan` types need
        // parentheses around the type.
        let paren = match &x.fun {
            Expr::FuncType(_) => true,
            Expr::ChanType(chan) => chan.dir == ChanDir::Recv,
            _ => false,
        };
        if paren {
            self.token("(");
        }
        let was_indented = match &x.fun {
            Expr::Selector(sel) => self.selector_expr(sel, depth, true),
            fun => {
                self.expr1(fun, HIGHEST_PREC, depth);
                false
            }
        };
        if paren {
            self.token(")");
        }

        self.set_pos(x.lparen);
        self.token("(");
        if x.has_ellipsis {
            self.expr_list(x.lparen, &x.args, depth, ListMode::default(), x.ellipsis);
            self.set_pos(x.ellipsis);
            self.token("...");
            if x.ellipsis.is_valid()
                && x.rparen.is_valid()
                && self.line_for(x.ellipsis) < self.line_for(x.rparen)
            {
                self.token(",");
                self.ws(Ws::Formfeed);
            }
        } else {
            self.expr_list(x.lparen, &x.args, depth, ListMode::COMMA_TERM, x.rparen);
        }
        self.set_pos(x.rparen);
        self.token(")");
        if was_indented {
            self.ws(Ws::Unindent);
        }
    }

    fn composite_lit(&mut self, x: &CompositeLit, depth: usize) {
        // Composite literal types bind tighter than anything around them.
        if let Some(ty) = &x.ty {
            self.expr1(ty, HIGHEST_PREC, depth);
        }
        self.level += 1;
        self.set_pos(x.lbrace);
        self.token("{");
        self.opening_comments(x.node_id);
        self.expr_list(x.lbrace, &x.elts, 1, ListMode::COMMA_TERM, x.rbrace);
        // Comments before the closing brace are indented like the
        // elements.
        self.ws(Ws::Indent);
        self.ws(Ws::Unindent);
        self.closing_comments(x.node_id);
        let saved = (self.no_extra_blank, self.no_extra_linebreak);
        self.no_extra_linebreak = true;
        if !x.elts.is_empty() {
            self.no_extra_blank = true;
        }
        self.set_pos(x.rbrace);
        self.token("}");
        (self.no_extra_blank, self.no_extra_linebreak) = saved;
        self.level -= 1;
    }

    // ------------------------------------------------------------------------
    // Signatures and field lists
    // ------------------------------------------------------------------------

    pub(crate) fn parameters(&mut self, fields: &FieldList, mode: ParamMode) {
        let (open, close) = match mode {
            ParamMode::Func => ("(", ")"),
            ParamMode::FuncTypeParams | ParamMode::TypeTypeParams => ("[", "]"),
        };
        self.set_pos(fields.opening);
        self.token(open);
        if !fields.list.is_empty() {
            let mut prev_line = self.line_for(fields.opening);
            let mut ws = Ws::Indent;
            for (i, par) in fields.list.iter().enumerate() {
                let par_line_beg = self.line_for(par.pos());
                let par_line_end = self.line_for(par.ty.pos());
                let needs_linebreak = 0 < prev_line && prev_line < par_line_beg;
                if i > 0 {
                    if !needs_linebreak {
                        self.set_pos(par.pos());
                    }
                    self.token(",");
                }
                if needs_linebreak && self.linebreak(par_line_beg, 0, ws, true) > 0 {
                    ws = Ws::Ignore;
                } else if i > 0 {
                    self.ws(Ws::Blank);
                }
                if !par.names.is_empty() {
                    self.ident_list(&par.names, ws == Ws::Indent);
                    self.ws(Ws::Blank);
                }
                self.expr(par.ty.unparen());
                prev_line = par_line_end;
            }

            let closing = self.line_for(fields.closing);
            if 0 < prev_line && prev_line < closing {
                self.token(",");
                self.linebreak(closing, 0, Ws::Ignore, true);
            } else if mode == ParamMode::TypeTypeParams
                && fields.num_fields() == 1
                && combines_with_name(&fields.list[0].ty)
            {
                // `[P *T,]` must not read as an array length.
                self.token(",");
            }

            if ws == Ws::Ignore {
                self.ws(Ws::Unindent);
            }
        }
        self.set_pos(fields.closing);
        self.token(close);
    }

    pub(crate) fn signature(&mut self, sig: &FuncType) {
        if let Some(type_params) = &sig.type_params {
            self.parameters(type_params, ParamMode::FuncTypeParams);
        }
        self.parameters(&sig.params, ParamMode::Func);
        let Some(results) = &sig.results else {
            return;
        };
        let n = results.num_fields();
        if n > 0 {
            self.ws(Ws::Blank);
            if let [single] = results.list.as_slice() {
                if n == 1 && single.names.is_empty() {
                    self.expr(single.ty.unparen());
                    return;
                }
            }
            self.parameters(results, ParamMode::Func);
        }
    }

    pub(crate) fn field_list(&mut self, fields: &FieldList, is_struct: bool) {
        let lbrace = fields.opening;
        let rbrace = fields.closing;
        let list = &fields.list;
        let has_comments = self.has_comments(fields.node_id)
            || list.iter().any(|f| self.has_comments(f.node_id));
        let src_is_one_line =
            lbrace.is_valid() && rbrace.is_valid() && self.line_for(lbrace) == self.line_for(rbrace);

        if !has_comments && src_is_one_line {
            if list.is_empty() {
                self.set_pos(lbrace);
                self.token("{");
                self.set_pos(rbrace);
                self.token("}");
                return;
            }
            if let [f] = list.as_slice() {
                self.set_pos(lbrace);
                self.token("{");
                self.ws(Ws::Blank);
                if is_struct {
                    for (i, name) in f.names.iter().enumerate() {
                        if i > 0 {
                            self.token(",");
                            self.ws(Ws::Blank);
                        }
                        self.ident(name);
                    }
                    if !f.names.is_empty() {
                        self.ws(Ws::Blank);
                    }
                    self.expr(&f.ty);
                } else {
                    self.interface_elem(f);
                }
                self.ws(Ws::Blank);
                self.set_pos(rbrace);
                self.token("}");
                return;
            }
        }

        self.ws(Ws::Blank);
        self.set_pos(lbrace);
        self.token("{");
        self.opening_comments(fields.node_id);
        self.ws(Ws::Indent);
        if has_comments || !list.is_empty() {
            self.ws(Ws::Formfeed);
        }

        if is_struct {
            let sep = if list.len() == 1 { Ws::Blank } else { Ws::Vtab };
            let mut line = 0;
            for (i, f) in list.iter().enumerate() {
                if i > 0 {
                    let new_section = self.lines_from(line) > 0;
                    self.linebreak(self.line_for(f.pos()), 1, Ws::Ignore, new_section);
                }
                self.leading_comments(f.node_id);
                let slot = self.record_line();
                let mut extra_tabs;
                if !f.names.is_empty() {
                    self.ident_list(&f.names, false);
                    self.ws(sep);
                    self.expr(&f.ty);
                    extra_tabs = 1;
                } else {
                    self.expr(&f.ty);
                    extra_tabs = 2;
                }
                if let Some(tag) = &f.tag {
                    if !f.names.is_empty() && sep == Ws::Vtab {
                        self.ws(sep);
                    }
                    self.ws(sep);
                    self.basic_lit(tag);
                    extra_tabs = 0;
                }
                line = self.recorded_line(slot);
                if self.has_trailing(f.node_id) {
                    for _ in 0..extra_tabs {
                        self.ws(sep);
                    }
                    self.trailing_comments(f.node_id);
                }
            }
        } else {
            let mut line = 0;
            for (i, f) in list.iter().enumerate() {
                if i > 0 {
                    let new_section = self.lines_from(line) > 0;
                    self.linebreak(self.line_for(f.pos()), 1, Ws::Ignore, new_section);
                }
                self.leading_comments(f.node_id);
                let slot = self.record_line();
                self.interface_elem(f);
                line = self.recorded_line(slot);
                self.trailing_comments(f.node_id);
            }
        }

        self.ws(Ws::Unindent);
        self.ws(Ws::Formfeed);
        self.closing_comments(fields.node_id);
        self.set_pos(rbrace);
        self.token("}");
    }

    /// A method (`M()`, without `func`) or an embedded type or type set.
    fn interface_elem(&mut self, f: &Field) {
        match (f.names.first(), &f.ty) {
            (Some(name), Expr::FuncType(sig)) => {
                self.ident(name);
                self.signature(sig);
            }
            _ => self.expr(&f.ty),
        }
    }

    pub(crate) fn has_trailing(&self, id: Option<NodeId>) -> bool {
        self.comments
            .is_some_and(|table| !table.trailing(id).is_empty())
    }

    /// Output columns since `start_col` when `start` is on the current
    /// source line, else [`INFINITY`].
    pub(crate) fn distance_from(&self, start: Pos, start_col: u32) -> usize {
        if start.is_valid() && self.pos.is_valid() && self.line_for(start) == self.pos.line {
            return self.out.column.saturating_sub(start_col) as usize;
        }
        INFINITY
    }
}

/// The precedence at or above which binary operators print without blanks.
fn cutoff(e: &BinaryExpr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(e);
    if max_problem > 0 {
        return max_problem + 1;
    }
    if has4 && has5 {
        if depth == 1 {
            return 5;
        }
        return 4;
    }
    if depth == 1 {
        return 6;
    }
    4
}

/// Which precedence levels occur in `e`, and the highest precedence at
/// which dropping blanks would glue two tokens into one (`x - -y`).
fn walk_binary(e: &BinaryExpr) -> (bool, bool, u8) {
    let prec = e.op.precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Expr::Binary(l) = &e.x {
        if l.op.precedence() >= prec {
            let (h4, h5, mp) = walk_binary(l);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }

    match &e.y {
        Expr::Binary(r) => {
            if r.op.precedence() > prec {
                let (h4, h5, mp) = walk_binary(r);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
        }
        Expr::Star(_) => {
            if e.op == BinaryOp::Quo {
                max_problem = 5;
            }
        }
        Expr::Unary(r) => match (e.op.as_str(), r.op.as_str()) {
            ("/", "*") | ("&", "&") | ("&", "^") => max_problem = 5,
            ("+", "+") | ("-", "-") => max_problem = max_problem.max(4),
            _ => {}
        },
        _ => {}
    }
    (has4, has5, max_problem)
}

fn diff_prec(x: &Expr, prec: u8) -> usize {
    match x {
        Expr::Binary(b) if b.op.precedence() == prec => 0,
        _ => 1,
    }
}

fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}

/// Whether `name x` in a type parameter list could parse as an expression.
fn combines_with_name(x: &Expr) -> bool {
    match x {
        Expr::Star(star) => !is_type_elem(&star.x),
        Expr::Binary(b) => combines_with_name(&b.x) && !is_type_elem(&b.y),
        _ => false,
    }
}

fn is_type_elem(x: &Expr) -> bool {
    match x {
        Expr::ArrayType(_)
        | Expr::StructType(_)
        | Expr::FuncType(_)
        | Expr::InterfaceType(_)
        | Expr::MapType(_)
        | Expr::ChanType(_) => true,
        Expr::Unary(u) => u.op == UnaryOp::Tilde,
        Expr::Binary(b) => is_type_elem(&b.x) || is_type_elem(&b.y),
        Expr::Paren(p) => is_type_elem(&p.x),
        _ => false,
    }
}
