// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The closed list of syntax tree node kinds.
//!
//! Every table that must cover all node kinds (the [`NodeKind`] enum, the
//! [`NodeRef`]/[`NodeMut`] views, the visitor hooks) is generated from this
//! one list, so adding a node kind forces every consumer to handle it.
//!
//! [`NodeKind`]: crate::NodeKind
//! [`NodeRef`]: crate::NodeRef
//! [`NodeMut`]: crate::NodeMut

/// Invoke `$callback!` with `snake_name: TypeName` pairs for every node kind.
macro_rules! for_each_node_kind {
    ($callback:ident) => {
        $callback! {
            file: File,
            ident: Ident,
            basic_lit: BasicLit,
            composite_lit: CompositeLit,
            func_lit: FuncLit,
            paren_expr: ParenExpr,
            selector_expr: SelectorExpr,
            index_expr: IndexExpr,
            slice_expr: SliceExpr,
            type_assert_expr: TypeAssertExpr,
            call_expr: CallExpr,
            star_expr: StarExpr,
            unary_expr: UnaryExpr,
            binary_expr: BinaryExpr,
            key_value_expr: KeyValueExpr,
            array_type: ArrayType,
            ellipsis: Ellipsis,
            struct_type: StructType,
            func_type: FuncType,
            interface_type: InterfaceType,
            map_type: MapType,
            chan_type: ChanType,
            field_list: FieldList,
            field: Field,
            decl_stmt: DeclStmt,
            empty_stmt: EmptyStmt,
            labeled_stmt: LabeledStmt,
            expr_stmt: ExprStmt,
            send_stmt: SendStmt,
            inc_dec_stmt: IncDecStmt,
            assign_stmt: AssignStmt,
            go_stmt: GoStmt,
            defer_stmt: DeferStmt,
            return_stmt: ReturnStmt,
            branch_stmt: BranchStmt,
            block_stmt: BlockStmt,
            if_stmt: IfStmt,
            case_clause: CaseClause,
            switch_stmt: SwitchStmt,
            type_switch_stmt: TypeSwitchStmt,
            comm_clause: CommClause,
            select_stmt: SelectStmt,
            for_stmt: ForStmt,
            range_stmt: RangeStmt,
            gen_decl: GenDecl,
            func_decl: FuncDecl,
            import_spec: ImportSpec,
            value_spec: ValueSpec,
            type_spec: TypeSpec,
        }
    };
}
