//! Function and type declarations, and the methods that belong to them.

use std::rc::Rc;

use gocodemod_cst::{
    source_code, Decl, Expr, Field, FieldList, FuncDecl, NodeId, NodeRef, TypeSpec,
};

use crate::ancestry::{NodeWithAncestry, Scope};
use crate::source_file::{ScopedMatches, SourceFile};

/// Swap every parameter whose type renders with `suffix` into position 0,
/// in order, so the last such parameter ends up first.
fn move_to_front(params: &mut [Field], suffix: &str) -> bool {
    let mut moved = false;
    for i in 0..params.len() {
        if source_code(&params[i].ty).ends_with(suffix) {
            params.swap(0, i);
            moved |= i != 0;
        }
    }
    moved
}

// ============================================================================
// Function
// ============================================================================

/// A function or method declaration.
#[derive(Debug, Clone)]
pub struct Function {
    ancestry: Rc<NodeWithAncestry>,
    decl: FuncDecl,
    scope: Scope,
}

impl Function {
    pub fn node(&self) -> &FuncDecl {
        &self.decl
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    pub fn name(&self) -> &str {
        &self.decl.name.name
    }

    pub fn is_method(&self) -> bool {
        self.decl.recv.is_some()
    }

    /// The receiver's base type, `T` for both `(t T)` and `(t *T)`.
    pub fn receiver_type_name(&self) -> Option<&str> {
        self.decl.receiver_type_name()
    }

    pub fn params(&self) -> &[Field] {
        &self.decl.ty.params.list
    }

    pub fn edit<F, U>(&mut self, file: &mut SourceFile, f: F) -> Option<U>
    where
        F: FnOnce(&mut FuncDecl) -> U,
    {
        file.edit_captured(&mut self.decl, f)
    }

    /// Move parameters whose type ends with `suffix` (`".Context"`) to the
    /// front of the parameter list. With several such parameters, each one
    /// is swapped to the front in turn and the last one stays there.
    pub fn move_param_to_front(&mut self, file: &mut SourceFile, suffix: &str) -> bool {
        self.edit(file, |decl| move_to_front(&mut decl.ty.params.list, suffix))
            .unwrap_or(false)
    }
}

// ============================================================================
// TypeDeclaration
// ============================================================================

/// A `type` declaration.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    ancestry: Rc<NodeWithAncestry>,
    spec: TypeSpec,
    scope: Scope,
}

impl TypeDeclaration {
    pub fn node(&self) -> &TypeSpec {
        &self.spec
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    pub fn name(&self) -> &str {
        &self.spec.name.name
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.spec.ty.unparen(), Expr::InterfaceType(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.spec.ty.unparen(), Expr::StructType(_))
    }

    /// Any type that is neither an interface nor a struct: `type ID int`,
    /// `type Handler func()`, and true aliases such as `type A = B`.
    pub fn is_type_alias(&self) -> bool {
        !self.is_interface() && !self.is_struct()
    }

    /// The method set: an interface's method elements, or for any other type
    /// the method declarations in `file` whose receiver is the type or a
    /// pointer to it. Embedded interfaces are not expanded.
    pub fn methods(&self, file: &SourceFile) -> Vec<Method> {
        if let Expr::InterfaceType(iface) = self.spec.ty.unparen() {
            return iface
                .methods
                .list
                .iter()
                .filter_map(|field| match (field.names.as_slice(), &field.ty) {
                    ([name], Expr::FuncType(ty)) => Some(Method {
                        name: name.name.clone(),
                        node_id: field.node_id,
                        origin: MethodOrigin::Interface,
                        params: ty.params.clone(),
                    }),
                    _ => None,
                })
                .collect();
        }
        file.file()
            .decls
            .iter()
            .filter_map(Decl::as_func)
            .filter(|decl| decl.receiver_type_name() == Some(self.name()))
            .map(|decl| Method {
                name: decl.name.name.clone(),
                node_id: decl.node_id,
                origin: MethodOrigin::Declaration,
                params: decl.ty.params.clone(),
            })
            .collect()
    }
}

// ============================================================================
// Method
// ============================================================================

/// Where a [`Method`] is written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodOrigin {
    /// A method element of an interface type.
    Interface,
    /// A function declaration with a receiver.
    Declaration,
}

/// One method of a [`TypeDeclaration`].
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    name: String,
    node_id: Option<NodeId>,
    origin: MethodOrigin,
    params: FieldList,
}

impl Method {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> MethodOrigin {
        self.origin
    }

    pub fn params(&self) -> &[Field] {
        &self.params.list
    }

    /// Same as [`Function::move_param_to_front`], for either kind of method.
    pub fn move_param_to_front(&mut self, file: &mut SourceFile, suffix: &str) -> bool {
        let Some(id) = self.node_id else {
            return false;
        };
        let edited = match self.origin {
            MethodOrigin::Interface => file
                .edit(id, |field: &mut Field| match &mut field.ty {
                    Expr::FuncType(ty) => {
                        let moved = move_to_front(&mut ty.params.list, suffix);
                        Some((moved, ty.params.clone()))
                    }
                    _ => None,
                })
                .flatten(),
            MethodOrigin::Declaration => file.edit(id, |decl: &mut FuncDecl| {
                let moved = move_to_front(&mut decl.ty.params.list, suffix);
                (moved, decl.ty.params.clone())
            }),
        };
        match edited {
            Some((moved, params)) => {
                self.params = params;
                moved
            }
            None => false,
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

impl SourceFile {
    /// Every function and method declaration. Declarations are always at the
    /// top level, so every match is in [`Scope::top_level`].
    pub fn functions(&self) -> ScopedMatches<Function> {
        self.collect(|node, link, scope| match node {
            NodeRef::FuncDecl(decl) => Some(Function {
                ancestry: Rc::clone(link),
                decl: decl.clone(),
                scope: scope.clone(),
            }),
            _ => None,
        })
    }

    /// Every type declaration, local types included.
    pub fn type_declarations(&self) -> ScopedMatches<TypeDeclaration> {
        self.collect(|node, link, scope| match node {
            NodeRef::TypeSpec(spec) => Some(TypeDeclaration {
                ancestry: Rc::clone(link),
                spec: spec.clone(),
                scope: scope.clone(),
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"package main

type UserService interface {
	DoSomething(int64, context.Context) error
	io.Closer
}

type Store struct {
	db *sql.DB
}

type ID int64

func (s *Store) Get(id ID, ctx context.Context) error {
	return nil
}

func (s Store) Close() error {
	return nil
}

func (id ID) String() string {
	type local struct{}
	return ""
}

func run(a int, ctx context.Context, b int) {
}
"#;

    fn file() -> SourceFile {
        SourceFile::new(SOURCE).unwrap()
    }

    fn all<T>(matches: ScopedMatches<T>) -> Vec<T> {
        matches.into_values().flatten().collect()
    }

    fn types(file: &SourceFile) -> Vec<TypeDeclaration> {
        all(file.type_declarations())
    }

    fn param_types(params: &[Field]) -> Vec<String> {
        params.iter().map(|p| source_code(&p.ty)).collect()
    }

    #[test]
    fn test_functions() {
        let file = file();
        let functions = file.functions();
        assert_eq!(functions.len(), 1);
        assert!(functions.keys().all(Scope::is_top_level));

        let functions = all(functions);
        let names: Vec<&str> = functions.iter().map(Function::name).collect();
        assert_eq!(names, ["Get", "Close", "String", "run"]);
        assert_eq!(functions[0].receiver_type_name(), Some("Store"));
        assert!(functions[1].is_method());
        assert!(!functions[3].is_method());
        assert_eq!(functions[3].params().len(), 3);
    }

    #[test]
    fn test_type_classification() {
        let file = file();
        let types = types(&file);
        let names: Vec<&str> = types.iter().map(TypeDeclaration::name).collect();
        assert_eq!(names, ["UserService", "Store", "ID", "local"]);
        assert!(types[0].is_interface());
        assert!(types[1].is_struct());
        assert!(types[2].is_type_alias());
        assert_eq!(types[3].scope().function_name(), Some("String"));
    }

    #[test]
    fn test_methods() {
        let file = file();
        let types = types(&file);

        let iface = types[0].methods(&file);
        assert_eq!(iface.len(), 1);
        assert_eq!(iface[0].name(), "DoSomething");
        assert_eq!(iface[0].origin(), MethodOrigin::Interface);

        let store: Vec<String> = types[1]
            .methods(&file)
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(store, ["Get", "Close"]);

        let id = types[2].methods(&file);
        assert_eq!(id.len(), 1);
        assert_eq!(id[0].origin(), MethodOrigin::Declaration);
    }

    #[test]
    fn test_move_param_to_front() {
        let mut file = file();
        let mut run = all(file.functions()).pop().unwrap();
        assert!(run.move_param_to_front(&mut file, ".Context"));
        assert_eq!(param_types(run.params()), ["context.Context", "int", "int"]);
        assert!(file.print().contains("func run(ctx context.Context, a int, b int) {"));
        assert!(!run.move_param_to_front(&mut file, ".Context"));
    }

    #[test]
    fn test_last_match_ends_first() {
        let mut params = vec![
            Field {
                node_id: None,
                names: vec![],
                ty: Expr::ident("a"),
                tag: None,
            };
            3
        ];
        params[1].ty = Expr::selector(Expr::ident("x"), "Context");
        params[2].ty = Expr::selector(Expr::ident("y"), "Context");
        assert!(move_to_front(&mut params, ".Context"));
        assert_eq!(param_types(&params), ["y.Context", "a", "x.Context"]);
    }

    #[test]
    fn test_move_method_params() {
        let mut file = file();
        let types = types(&file);
        let mut iface = types[0].methods(&file).remove(0);
        assert!(iface.move_param_to_front(&mut file, ".Context"));
        assert_eq!(param_types(iface.params()), ["context.Context", "int64"]);

        let mut get = types[1].methods(&file).remove(0);
        assert!(get.move_param_to_front(&mut file, ".Context"));

        let printed = file.print();
        assert!(printed.contains("\tDoSomething(context.Context, int64) error\n"));
        assert!(printed.contains("func (s *Store) Get(ctx context.Context, id ID) error {"));
    }
}
