// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for syntax tree traversal.
//!
//! Each node kind has a `walk_*` function for [`Visitor`] and a `walk_*_mut`
//! function for [`VisitorMut`]. Both are generated from a single body per
//! node kind, so the shared and mutable traversals cannot drift apart.
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::traits::{VisitResult, Visitor, VisitorMut};
use crate::nodes::*;

/// Return `Stop` from the enclosing walker if a child walk stopped.
macro_rules! try_walk {
    ($walk:expr) => {
        if $walk == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

/// The enter/children/leave protocol shared by every node walker.
macro_rules! walk_node {
    ($v:ident, $View:ident :: $Kind:ident, $name:ident, $id:expr, $node:expr, $children:block) => {
        paste::paste! {{
            $v.visit_node_id($id);
            let mut result = $v.enter_node($View::$Kind($node));
            if result == VisitResult::Continue {
                result = $v.[<visit_ $name>]($node);
            }
            match result {
                VisitResult::Stop => return VisitResult::Stop,
                VisitResult::SkipChildren => {}
                VisitResult::Continue => $children,
            }
            $v.[<leave_ $name>]($node);
            $v.leave_node($View::$Kind($node));
            VisitResult::Continue
        }}
    };
}

macro_rules! make_walkers {
    ($Visitor:ident, [$($suffix:ident)?], [$($mut:tt)?], $View:ident) => {
        paste::paste! {

        // ====================================================================
        // Enum dispatch
        // ====================================================================

        pub fn [<walk_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Expr,
        ) -> VisitResult {
            match node {
                Expr::Ident(x) => [<walk_ident $($suffix)?>](v, x),
                Expr::BasicLit(x) => [<walk_basic_lit $($suffix)?>](v, x),
                Expr::CompositeLit(x) => [<walk_composite_lit $($suffix)?>](v, x),
                Expr::FuncLit(x) => [<walk_func_lit $($suffix)?>](v, x),
                Expr::Paren(x) => [<walk_paren_expr $($suffix)?>](v, x),
                Expr::Selector(x) => [<walk_selector_expr $($suffix)?>](v, x),
                Expr::Index(x) => [<walk_index_expr $($suffix)?>](v, x),
                Expr::Slice(x) => [<walk_slice_expr $($suffix)?>](v, x),
                Expr::TypeAssert(x) => [<walk_type_assert_expr $($suffix)?>](v, x),
                Expr::Call(x) => [<walk_call_expr $($suffix)?>](v, x),
                Expr::Star(x) => [<walk_star_expr $($suffix)?>](v, x),
                Expr::Unary(x) => [<walk_unary_expr $($suffix)?>](v, x),
                Expr::Binary(x) => [<walk_binary_expr $($suffix)?>](v, x),
                Expr::KeyValue(x) => [<walk_key_value_expr $($suffix)?>](v, x),
                Expr::ArrayType(x) => [<walk_array_type $($suffix)?>](v, x),
                Expr::Ellipsis(x) => [<walk_ellipsis $($suffix)?>](v, x),
                Expr::StructType(x) => [<walk_struct_type $($suffix)?>](v, x),
                Expr::FuncType(x) => [<walk_func_type $($suffix)?>](v, x),
                Expr::InterfaceType(x) => [<walk_interface_type $($suffix)?>](v, x),
                Expr::MapType(x) => [<walk_map_type $($suffix)?>](v, x),
                Expr::ChanType(x) => [<walk_chan_type $($suffix)?>](v, x),
            }
        }

        pub fn [<walk_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Stmt,
        ) -> VisitResult {
            match node {
                Stmt::Decl(s) => [<walk_decl_stmt $($suffix)?>](v, s),
                Stmt::Empty(s) => [<walk_empty_stmt $($suffix)?>](v, s),
                Stmt::Labeled(s) => [<walk_labeled_stmt $($suffix)?>](v, s),
                Stmt::Expr(s) => [<walk_expr_stmt $($suffix)?>](v, s),
                Stmt::Send(s) => [<walk_send_stmt $($suffix)?>](v, s),
                Stmt::IncDec(s) => [<walk_inc_dec_stmt $($suffix)?>](v, s),
                Stmt::Assign(s) => [<walk_assign_stmt $($suffix)?>](v, s),
                Stmt::Go(s) => [<walk_go_stmt $($suffix)?>](v, s),
                Stmt::Defer(s) => [<walk_defer_stmt $($suffix)?>](v, s),
                Stmt::Return(s) => [<walk_return_stmt $($suffix)?>](v, s),
                Stmt::Branch(s) => [<walk_branch_stmt $($suffix)?>](v, s),
                Stmt::Block(s) => [<walk_block_stmt $($suffix)?>](v, s),
                Stmt::If(s) => [<walk_if_stmt $($suffix)?>](v, s),
                Stmt::CaseClause(s) => [<walk_case_clause $($suffix)?>](v, s),
                Stmt::Switch(s) => [<walk_switch_stmt $($suffix)?>](v, s),
                Stmt::TypeSwitch(s) => [<walk_type_switch_stmt $($suffix)?>](v, s),
                Stmt::CommClause(s) => [<walk_comm_clause $($suffix)?>](v, s),
                Stmt::Select(s) => [<walk_select_stmt $($suffix)?>](v, s),
                Stmt::For(s) => [<walk_for_stmt $($suffix)?>](v, s),
                Stmt::Range(s) => [<walk_range_stmt $($suffix)?>](v, s),
            }
        }

        pub fn [<walk_decl $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Decl,
        ) -> VisitResult {
            match node {
                Decl::Gen(d) => [<walk_gen_decl $($suffix)?>](v, d),
                Decl::Func(d) => [<walk_func_decl $($suffix)?>](v, d),
            }
        }

        pub fn [<walk_spec $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Spec,
        ) -> VisitResult {
            match node {
                Spec::Import(s) => [<walk_import_spec $($suffix)?>](v, s),
                Spec::Value(s) => [<walk_value_spec $($suffix)?>](v, s),
                Spec::Type(s) => [<walk_type_spec $($suffix)?>](v, s),
            }
        }

        // ====================================================================
        // File and declarations
        // ====================================================================

        pub fn [<walk_file $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? File,
        ) -> VisitResult {
            walk_node!(v, $View::File, file, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.package_pos);
                try_walk!([<walk_ident $($suffix)?>](v, &$($mut)? node.name));
                for decl in &$($mut)? node.decls {
                    try_walk!([<walk_decl $($suffix)?>](v, decl));
                }
            })
        }

        pub fn [<walk_gen_decl $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? GenDecl,
        ) -> VisitResult {
            walk_node!(v, $View::GenDecl, gen_decl, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.tok_pos);
                v.visit_pos(&$($mut)? node.lparen);
                for spec in &$($mut)? node.specs {
                    try_walk!([<walk_spec $($suffix)?>](v, spec));
                }
                v.visit_pos(&$($mut)? node.rparen);
            })
        }

        pub fn [<walk_func_decl $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? FuncDecl,
        ) -> VisitResult {
            walk_node!(v, $View::FuncDecl, func_decl, &$($mut)? node.node_id, &$($mut)? *node, {
                if let Some(recv) = &$($mut)? node.recv {
                    try_walk!([<walk_field_list $($suffix)?>](v, recv));
                }
                try_walk!([<walk_ident $($suffix)?>](v, &$($mut)? node.name));
                try_walk!([<walk_func_type $($suffix)?>](v, &$($mut)? node.ty));
                if let Some(body) = &$($mut)? node.body {
                    try_walk!([<walk_block_stmt $($suffix)?>](v, body));
                }
            })
        }

        pub fn [<walk_import_spec $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ImportSpec,
        ) -> VisitResult {
            walk_node!(v, $View::ImportSpec, import_spec, &$($mut)? node.node_id, &$($mut)? *node, {
                if let Some(name) = &$($mut)? node.name {
                    try_walk!([<walk_ident $($suffix)?>](v, name));
                }
                try_walk!([<walk_basic_lit $($suffix)?>](v, &$($mut)? node.path));
            })
        }

        pub fn [<walk_value_spec $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ValueSpec,
        ) -> VisitResult {
            walk_node!(v, $View::ValueSpec, value_spec, &$($mut)? node.node_id, &$($mut)? *node, {
                for name in &$($mut)? node.names {
                    try_walk!([<walk_ident $($suffix)?>](v, name));
                }
                if let Some(ty) = &$($mut)? node.ty {
                    try_walk!([<walk_expr $($suffix)?>](v, ty));
                }
                for value in &$($mut)? node.values {
                    try_walk!([<walk_expr $($suffix)?>](v, value));
                }
            })
        }

        pub fn [<walk_type_spec $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? TypeSpec,
        ) -> VisitResult {
            walk_node!(v, $View::TypeSpec, type_spec, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_ident $($suffix)?>](v, &$($mut)? node.name));
                if let Some(params) = &$($mut)? node.type_params {
                    try_walk!([<walk_field_list $($suffix)?>](v, params));
                }
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.ty));
            })
        }

        // ====================================================================
        // Expressions
        // ====================================================================

        pub fn [<walk_ident $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Ident,
        ) -> VisitResult {
            walk_node!(v, $View::Ident, ident, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.pos);
            })
        }

        pub fn [<walk_basic_lit $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? BasicLit,
        ) -> VisitResult {
            walk_node!(v, $View::BasicLit, basic_lit, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.pos);
            })
        }

        pub fn [<walk_composite_lit $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? CompositeLit,
        ) -> VisitResult {
            walk_node!(v, $View::CompositeLit, composite_lit, &$($mut)? node.node_id, &$($mut)? *node, {
                if let Some(ty) = &$($mut)? node.ty {
                    try_walk!([<walk_expr $($suffix)?>](v, ty));
                }
                v.visit_pos(&$($mut)? node.lbrace);
                for elt in &$($mut)? node.elts {
                    try_walk!([<walk_expr $($suffix)?>](v, elt));
                }
                v.visit_pos(&$($mut)? node.rbrace);
            })
        }

        pub fn [<walk_func_lit $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? FuncLit,
        ) -> VisitResult {
            walk_node!(v, $View::FuncLit, func_lit, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_func_type $($suffix)?>](v, &$($mut)? node.ty));
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
            })
        }

        pub fn [<walk_paren_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ParenExpr,
        ) -> VisitResult {
            walk_node!(v, $View::ParenExpr, paren_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.lparen);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                v.visit_pos(&$($mut)? node.rparen);
            })
        }

        pub fn [<walk_selector_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? SelectorExpr,
        ) -> VisitResult {
            walk_node!(v, $View::SelectorExpr, selector_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                try_walk!([<walk_ident $($suffix)?>](v, &$($mut)? node.sel));
            })
        }

        pub fn [<walk_index_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? IndexExpr,
        ) -> VisitResult {
            walk_node!(v, $View::IndexExpr, index_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                v.visit_pos(&$($mut)? node.lbrack);
                for index in &$($mut)? node.indices {
                    try_walk!([<walk_expr $($suffix)?>](v, index));
                }
                v.visit_pos(&$($mut)? node.rbrack);
            })
        }

        pub fn [<walk_slice_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? SliceExpr,
        ) -> VisitResult {
            walk_node!(v, $View::SliceExpr, slice_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                v.visit_pos(&$($mut)? node.lbrack);
                if let Some(low) = &$($mut)? node.low {
                    try_walk!([<walk_expr $($suffix)?>](v, low));
                }
                if let Some(high) = &$($mut)? node.high {
                    try_walk!([<walk_expr $($suffix)?>](v, high));
                }
                if let Some(max) = &$($mut)? node.max {
                    try_walk!([<walk_expr $($suffix)?>](v, max));
                }
                v.visit_pos(&$($mut)? node.rbrack);
            })
        }

        pub fn [<walk_type_assert_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? TypeAssertExpr,
        ) -> VisitResult {
            walk_node!(v, $View::TypeAssertExpr, type_assert_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                v.visit_pos(&$($mut)? node.lparen);
                if let Some(ty) = &$($mut)? node.ty {
                    try_walk!([<walk_expr $($suffix)?>](v, ty));
                }
                v.visit_pos(&$($mut)? node.rparen);
            })
        }

        pub fn [<walk_call_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? CallExpr,
        ) -> VisitResult {
            walk_node!(v, $View::CallExpr, call_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.fun));
                v.visit_pos(&$($mut)? node.lparen);
                for arg in &$($mut)? node.args {
                    try_walk!([<walk_expr $($suffix)?>](v, arg));
                }
                v.visit_pos(&$($mut)? node.ellipsis);
                v.visit_pos(&$($mut)? node.rparen);
            })
        }

        pub fn [<walk_star_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? StarExpr,
        ) -> VisitResult {
            walk_node!(v, $View::StarExpr, star_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.star);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
            })
        }

        pub fn [<walk_unary_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? UnaryExpr,
        ) -> VisitResult {
            walk_node!(v, $View::UnaryExpr, unary_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.op_pos);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
            })
        }

        pub fn [<walk_binary_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? BinaryExpr,
        ) -> VisitResult {
            walk_node!(v, $View::BinaryExpr, binary_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                v.visit_pos(&$($mut)? node.op_pos);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.y));
            })
        }

        pub fn [<walk_key_value_expr $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? KeyValueExpr,
        ) -> VisitResult {
            walk_node!(v, $View::KeyValueExpr, key_value_expr, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.key));
                v.visit_pos(&$($mut)? node.colon);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.value));
            })
        }

        // ====================================================================
        // Types
        // ====================================================================

        pub fn [<walk_array_type $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ArrayType,
        ) -> VisitResult {
            walk_node!(v, $View::ArrayType, array_type, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.lbrack);
                if let Some(len) = &$($mut)? node.len {
                    try_walk!([<walk_expr $($suffix)?>](v, len));
                }
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.elt));
            })
        }

        pub fn [<walk_ellipsis $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Ellipsis,
        ) -> VisitResult {
            walk_node!(v, $View::Ellipsis, ellipsis, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.pos);
                if let Some(elt) = &$($mut)? node.elt {
                    try_walk!([<walk_expr $($suffix)?>](v, elt));
                }
            })
        }

        pub fn [<walk_struct_type $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? StructType,
        ) -> VisitResult {
            walk_node!(v, $View::StructType, struct_type, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.struct_pos);
                try_walk!([<walk_field_list $($suffix)?>](v, &$($mut)? node.fields));
            })
        }

        pub fn [<walk_func_type $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? FuncType,
        ) -> VisitResult {
            walk_node!(v, $View::FuncType, func_type, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.func_pos);
                if let Some(params) = &$($mut)? node.type_params {
                    try_walk!([<walk_field_list $($suffix)?>](v, params));
                }
                try_walk!([<walk_field_list $($suffix)?>](v, &$($mut)? node.params));
                if let Some(results) = &$($mut)? node.results {
                    try_walk!([<walk_field_list $($suffix)?>](v, results));
                }
            })
        }

        pub fn [<walk_interface_type $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? InterfaceType,
        ) -> VisitResult {
            walk_node!(v, $View::InterfaceType, interface_type, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.interface_pos);
                try_walk!([<walk_field_list $($suffix)?>](v, &$($mut)? node.methods));
            })
        }

        pub fn [<walk_map_type $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? MapType,
        ) -> VisitResult {
            walk_node!(v, $View::MapType, map_type, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.map_pos);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.key));
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.value));
            })
        }

        pub fn [<walk_chan_type $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ChanType,
        ) -> VisitResult {
            walk_node!(v, $View::ChanType, chan_type, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.begin);
                v.visit_pos(&$($mut)? node.arrow);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.value));
            })
        }

        pub fn [<walk_field_list $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? FieldList,
        ) -> VisitResult {
            walk_node!(v, $View::FieldList, field_list, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.opening);
                for field in &$($mut)? node.list {
                    try_walk!([<walk_field $($suffix)?>](v, field));
                }
                v.visit_pos(&$($mut)? node.closing);
            })
        }

        pub fn [<walk_field $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? Field,
        ) -> VisitResult {
            walk_node!(v, $View::Field, field, &$($mut)? node.node_id, &$($mut)? *node, {
                for name in &$($mut)? node.names {
                    try_walk!([<walk_ident $($suffix)?>](v, name));
                }
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.ty));
                if let Some(tag) = &$($mut)? node.tag {
                    try_walk!([<walk_basic_lit $($suffix)?>](v, tag));
                }
            })
        }

        // ====================================================================
        // Statements
        // ====================================================================

        pub fn [<walk_decl_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? DeclStmt,
        ) -> VisitResult {
            walk_node!(v, $View::DeclStmt, decl_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_gen_decl $($suffix)?>](v, &$($mut)? node.decl));
            })
        }

        pub fn [<walk_empty_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? EmptyStmt,
        ) -> VisitResult {
            walk_node!(v, $View::EmptyStmt, empty_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.semicolon);
            })
        }

        pub fn [<walk_labeled_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? LabeledStmt,
        ) -> VisitResult {
            walk_node!(v, $View::LabeledStmt, labeled_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_ident $($suffix)?>](v, &$($mut)? node.label));
                v.visit_pos(&$($mut)? node.colon);
                try_walk!([<walk_stmt $($suffix)?>](v, &$($mut)? node.stmt));
            })
        }

        pub fn [<walk_expr_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ExprStmt,
        ) -> VisitResult {
            walk_node!(v, $View::ExprStmt, expr_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
            })
        }

        pub fn [<walk_send_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? SendStmt,
        ) -> VisitResult {
            walk_node!(v, $View::SendStmt, send_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.chan));
                v.visit_pos(&$($mut)? node.arrow);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.value));
            })
        }

        pub fn [<walk_inc_dec_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? IncDecStmt,
        ) -> VisitResult {
            walk_node!(v, $View::IncDecStmt, inc_dec_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                v.visit_pos(&$($mut)? node.tok_pos);
            })
        }

        pub fn [<walk_assign_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? AssignStmt,
        ) -> VisitResult {
            walk_node!(v, $View::AssignStmt, assign_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                for x in &$($mut)? node.lhs {
                    try_walk!([<walk_expr $($suffix)?>](v, x));
                }
                v.visit_pos(&$($mut)? node.tok_pos);
                for x in &$($mut)? node.rhs {
                    try_walk!([<walk_expr $($suffix)?>](v, x));
                }
            })
        }

        pub fn [<walk_go_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? GoStmt,
        ) -> VisitResult {
            walk_node!(v, $View::GoStmt, go_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.go_pos);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.call));
            })
        }

        pub fn [<walk_defer_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? DeferStmt,
        ) -> VisitResult {
            walk_node!(v, $View::DeferStmt, defer_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.defer_pos);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.call));
            })
        }

        pub fn [<walk_return_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ReturnStmt,
        ) -> VisitResult {
            walk_node!(v, $View::ReturnStmt, return_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.return_pos);
                for x in &$($mut)? node.results {
                    try_walk!([<walk_expr $($suffix)?>](v, x));
                }
            })
        }

        pub fn [<walk_branch_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? BranchStmt,
        ) -> VisitResult {
            walk_node!(v, $View::BranchStmt, branch_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.tok_pos);
                if let Some(label) = &$($mut)? node.label {
                    try_walk!([<walk_ident $($suffix)?>](v, label));
                }
            })
        }

        pub fn [<walk_block_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? BlockStmt,
        ) -> VisitResult {
            walk_node!(v, $View::BlockStmt, block_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.lbrace);
                for stmt in &$($mut)? node.stmts {
                    try_walk!([<walk_stmt $($suffix)?>](v, stmt));
                }
                v.visit_pos(&$($mut)? node.rbrace);
            })
        }

        pub fn [<walk_if_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? IfStmt,
        ) -> VisitResult {
            walk_node!(v, $View::IfStmt, if_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.if_pos);
                if let Some(init) = &$($mut)? node.init {
                    try_walk!([<walk_stmt $($suffix)?>](v, init));
                }
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.cond));
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
                if let Some(else_) = &$($mut)? node.else_ {
                    try_walk!([<walk_stmt $($suffix)?>](v, else_));
                }
            })
        }

        pub fn [<walk_case_clause $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? CaseClause,
        ) -> VisitResult {
            walk_node!(v, $View::CaseClause, case_clause, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.case_pos);
                for x in &$($mut)? node.list {
                    try_walk!([<walk_expr $($suffix)?>](v, x));
                }
                v.visit_pos(&$($mut)? node.colon);
                for stmt in &$($mut)? node.body {
                    try_walk!([<walk_stmt $($suffix)?>](v, stmt));
                }
            })
        }

        pub fn [<walk_switch_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? SwitchStmt,
        ) -> VisitResult {
            walk_node!(v, $View::SwitchStmt, switch_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.switch_pos);
                if let Some(init) = &$($mut)? node.init {
                    try_walk!([<walk_stmt $($suffix)?>](v, init));
                }
                if let Some(tag) = &$($mut)? node.tag {
                    try_walk!([<walk_expr $($suffix)?>](v, tag));
                }
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
            })
        }

        pub fn [<walk_type_switch_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? TypeSwitchStmt,
        ) -> VisitResult {
            walk_node!(v, $View::TypeSwitchStmt, type_switch_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.switch_pos);
                if let Some(init) = &$($mut)? node.init {
                    try_walk!([<walk_stmt $($suffix)?>](v, init));
                }
                try_walk!([<walk_stmt $($suffix)?>](v, &$($mut)? node.assign));
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
            })
        }

        pub fn [<walk_comm_clause $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? CommClause,
        ) -> VisitResult {
            walk_node!(v, $View::CommClause, comm_clause, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.case_pos);
                if let Some(comm) = &$($mut)? node.comm {
                    try_walk!([<walk_stmt $($suffix)?>](v, comm));
                }
                v.visit_pos(&$($mut)? node.colon);
                for stmt in &$($mut)? node.body {
                    try_walk!([<walk_stmt $($suffix)?>](v, stmt));
                }
            })
        }

        pub fn [<walk_select_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? SelectStmt,
        ) -> VisitResult {
            walk_node!(v, $View::SelectStmt, select_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.select_pos);
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
            })
        }

        pub fn [<walk_for_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? ForStmt,
        ) -> VisitResult {
            walk_node!(v, $View::ForStmt, for_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.for_pos);
                if let Some(init) = &$($mut)? node.init {
                    try_walk!([<walk_stmt $($suffix)?>](v, init));
                }
                if let Some(cond) = &$($mut)? node.cond {
                    try_walk!([<walk_expr $($suffix)?>](v, cond));
                }
                if let Some(post) = &$($mut)? node.post {
                    try_walk!([<walk_stmt $($suffix)?>](v, post));
                }
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
            })
        }

        pub fn [<walk_range_stmt $($suffix)?>]<V: $Visitor + ?Sized>(
            v: &mut V,
            node: &$($mut)? RangeStmt,
        ) -> VisitResult {
            walk_node!(v, $View::RangeStmt, range_stmt, &$($mut)? node.node_id, &$($mut)? *node, {
                v.visit_pos(&$($mut)? node.for_pos);
                if let Some(key) = &$($mut)? node.key {
                    try_walk!([<walk_expr $($suffix)?>](v, key));
                }
                if let Some(value) = &$($mut)? node.value {
                    try_walk!([<walk_expr $($suffix)?>](v, value));
                }
                v.visit_pos(&$($mut)? node.tok_pos);
                try_walk!([<walk_expr $($suffix)?>](v, &$($mut)? node.x));
                try_walk!([<walk_block_stmt $($suffix)?>](v, &$($mut)? node.body));
            })
        }

        }
    };
}

make_walkers!(Visitor, [], [], NodeRef);
make_walkers!(VisitorMut, [_mut], [mut], NodeMut);

/// A node (or node enum) that can be handed to a visitor.
pub trait Walk {
    fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult;
    fn walk_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) -> VisitResult;
}

macro_rules! impl_walk {
    ($($name:ident: $ty:ident),* $(,)?) => {
        paste::paste! {
            $(
                impl Walk for $ty {
                    fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
                        [<walk_ $name>](visitor, self)
                    }

                    fn walk_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) -> VisitResult {
                        [<walk_ $name _mut>](visitor, self)
                    }
                }
            )*
        }
    };
}

for_each_node_kind!(impl_walk);
impl_walk! {
    expr: Expr,
    stmt: Stmt,
    decl: Decl,
    spec: Spec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;

    const SOURCE: &str = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tx := 1\n\tif x > 0 {\n\t\tfmt.Println(x)\n\t}\n}\n";

    /// Records enter/leave order of statements.
    #[derive(Default)]
    struct OrderTracker {
        events: Vec<String>,
    }

    impl Visitor for OrderTracker {
        fn enter_node(&mut self, node: NodeRef<'_>) -> VisitResult {
            if matches!(node.kind(), NodeKind::AssignStmt | NodeKind::IfStmt | NodeKind::ExprStmt) {
                self.events.push(format!("enter {}", node.kind()));
            }
            VisitResult::Continue
        }

        fn leave_node(&mut self, node: NodeRef<'_>) {
            if matches!(node.kind(), NodeKind::AssignStmt | NodeKind::IfStmt | NodeKind::ExprStmt) {
                self.events.push(format!("leave {}", node.kind()));
            }
        }
    }

    #[test]
    fn test_traversal_order() {
        let parsed = parse_file(SOURCE).unwrap();
        let mut tracker = OrderTracker::default();
        assert_eq!(walk_file(&mut tracker, &parsed.file), VisitResult::Continue);
        assert_eq!(
            tracker.events,
            vec![
                "enter AssignStmt",
                "leave AssignStmt",
                "enter IfStmt",
                "enter ExprStmt",
                "leave ExprStmt",
                "leave IfStmt",
            ]
        );
    }

    struct IdentCollector {
        names: Vec<String>,
        skip_calls: bool,
        stop_at: Option<&'static str>,
    }

    impl Visitor for IdentCollector {
        fn visit_ident(&mut self, node: &Ident) -> VisitResult {
            self.names.push(node.name.clone());
            if self.stop_at == Some(node.name.as_str()) {
                VisitResult::Stop
            } else {
                VisitResult::Continue
            }
        }

        fn visit_call_expr(&mut self, _node: &CallExpr) -> VisitResult {
            if self.skip_calls {
                VisitResult::SkipChildren
            } else {
                VisitResult::Continue
            }
        }
    }

    #[test]
    fn test_skip_children_and_stop() {
        let parsed = parse_file(SOURCE).unwrap();

        let mut all = IdentCollector {
            names: Vec::new(),
            skip_calls: false,
            stop_at: None,
        };
        walk_file(&mut all, &parsed.file);
        assert_eq!(all.names, vec!["main", "main", "x", "x", "fmt", "Println", "x"]);

        let mut skipping = IdentCollector {
            names: Vec::new(),
            skip_calls: true,
            stop_at: None,
        };
        walk_file(&mut skipping, &parsed.file);
        assert_eq!(skipping.names, vec!["main", "main", "x", "x"]);

        let mut stopping = IdentCollector {
            names: Vec::new(),
            skip_calls: false,
            stop_at: Some("fmt"),
        };
        assert_eq!(walk_file(&mut stopping, &parsed.file), VisitResult::Stop);
        assert_eq!(stopping.names, vec!["main", "main", "x", "x", "fmt"]);
    }

    struct Renamer;

    impl VisitorMut for Renamer {
        fn visit_ident(&mut self, node: &mut Ident) -> VisitResult {
            if node.name == "x" {
                node.name = "y".to_string();
            }
            VisitResult::Continue
        }
    }

    #[test]
    fn test_mutating_walk() {
        let mut parsed = parse_file(SOURCE).unwrap();
        parsed.file.walk_mut(&mut Renamer);
        let mut collector = IdentCollector {
            names: Vec::new(),
            skip_calls: false,
            stop_at: None,
        };
        parsed.file.walk(&mut collector);
        assert!(!collector.names.contains(&"x".to_string()));
        assert_eq!(collector.names.iter().filter(|n| *n == "y").count(), 3);
    }
}
