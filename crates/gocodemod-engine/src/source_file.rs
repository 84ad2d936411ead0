//! A parsed Go file that queries run against and mutations rewrite.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use gocodemod_cst::visitor::{assign_missing_ids, edit_by_id, find_by_id, walk_file, Walk};
use gocodemod_cst::{
    parse_file, print_file, print_file_with, File, Ident, Node, NodeId, NodeIdGenerator, NodeRef,
    ParsedFile, PrinterConfig,
};

use crate::ancestry::{NodeWithAncestry, Scope, ScopedTraversal};
use crate::error::CodemodResult;
use crate::splice::Layout;

/// Query results grouped by enclosing function, in encounter order.
pub type ScopedMatches<T> = IndexMap<Scope, Vec<T>>;

/// How statement-level mutations pick the statements they affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Only the statement the match was found in.
    #[default]
    Identity,
    /// Every statement in the same list that is structurally equal to the
    /// matched one, positions ignored.
    Structural,
}

/// A parsed source file.
///
/// Queries take `&self` and return handles that remember which node they
/// matched; mutations take the handle and `&mut self`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    parsed: ParsedFile,
    file_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    match_mode: MatchMode,
    ids: NodeIdGenerator,
}

impl SourceFile {
    /// Parse `source` with no path information.
    pub fn new(source: &str) -> CodemodResult<Self> {
        let parsed = parse_file(source)?;
        let ids = NodeIdGenerator::starting_at(parsed.next_id);
        Ok(SourceFile {
            parsed,
            file_path: None,
            project_root: None,
            match_mode: MatchMode::default(),
            ids,
        })
    }

    /// Parse `source`, remembering where it came from. The paths are only
    /// carried along for codemods; they play no part in parsing.
    pub fn parse(
        source: &str,
        file_path: impl Into<PathBuf>,
        project_root: impl Into<PathBuf>,
    ) -> CodemodResult<Self> {
        let mut file = SourceFile::new(source)?;
        file.file_path = Some(file_path.into());
        file.project_root = Some(project_root.into());
        Ok(file)
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        self.match_mode = mode;
    }

    /// The syntax tree.
    pub fn file(&self) -> &File {
        &self.parsed.file
    }

    /// Render the file with gofmt layout.
    pub fn print(&self) -> String {
        print_file(&self.parsed)
    }

    pub fn print_with(&self, config: &PrinterConfig) -> String {
        print_file_with(&self.parsed, config)
    }

    /// Same as [`print`](Self::print).
    pub fn source_code(&self) -> String {
        self.print()
    }

    pub fn package(&self) -> Package<'_> {
        Package {
            ident: &self.parsed.file.name,
        }
    }

    pub fn set_package_name(&mut self, name: &str) {
        self.parsed.file.name.name = name.to_string();
    }

    /// Visit every node once, in source order, with its ancestry.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(NodeRef<'_>, &NodeWithAncestry),
    {
        self.walk_scoped(|node, link, _| visit(node, link));
    }

    // ------------------------------------------------------------------------
    // Engine internals
    // ------------------------------------------------------------------------

    pub(crate) fn walk_scoped<F>(&self, callback: F)
    where
        F: FnMut(NodeRef<'_>, &Rc<NodeWithAncestry>, &Scope),
    {
        let mut traversal = ScopedTraversal::new(callback);
        walk_file(&mut traversal, &self.parsed.file);
    }

    /// Run `classify` over every node and group what it keeps by scope.
    pub(crate) fn collect<T, F>(&self, mut classify: F) -> ScopedMatches<T>
    where
        F: FnMut(NodeRef<'_>, &Rc<NodeWithAncestry>, &Scope) -> Option<T>,
    {
        let mut matches = ScopedMatches::new();
        self.walk_scoped(|node, link, scope| {
            if let Some(found) = classify(node, link, scope) {
                matches.entry(scope.clone()).or_insert_with(Vec::new).push(found);
            }
        });
        matches
    }

    pub(crate) fn find<T: Node>(&self, id: NodeId) -> Option<T> {
        find_by_id(&self.parsed.file, id)
    }

    /// Apply `edit` to the node with id `id`, then give ids to any nodes the
    /// edit introduced so later queries can target them.
    pub(crate) fn edit<T, F, U>(&mut self, id: NodeId, edit: F) -> Option<U>
    where
        T: Node,
        F: FnOnce(&mut T) -> U,
    {
        self.edit_with_layout(id, |node, _| edit(node))
    }

    /// Like [`edit`](Self::edit), with the source lines and comments of the
    /// file at hand.
    pub(crate) fn edit_with_layout<T, F, U>(&mut self, id: NodeId, edit: F) -> Option<U>
    where
        T: Node,
        F: FnOnce(&mut T, &Layout<'_>) -> U,
    {
        let layout = Layout::new(&self.parsed.lines, &self.parsed.comments);
        let result = edit_by_id(&mut self.parsed.file, id, |node| edit(node, &layout));
        if result.is_none() {
            trace!(%id, "edit target not found");
        }
        assign_missing_ids(&mut self.parsed.file, &mut self.ids);
        result
    }

    /// Edit the live node `snapshot` was captured from and refresh the
    /// snapshot from the result.
    pub(crate) fn edit_captured<T, F, U>(&mut self, snapshot: &mut T, edit: F) -> Option<U>
    where
        T: Node,
        F: FnOnce(&mut T) -> U,
    {
        let id = snapshot.node_id()?;
        let result = self.edit(id, edit)?;
        if let Some(fresh) = self.find(id) {
            *snapshot = fresh;
        }
        Some(result)
    }

    pub(crate) fn file_mut(&mut self) -> &mut File {
        &mut self.parsed.file
    }

    /// Give ids to nodes built outside the parser before they join the tree.
    pub(crate) fn adopt<T: Walk + ?Sized>(&mut self, node: &mut T) {
        assign_missing_ids(node, &mut self.ids);
    }
}

/// The package clause of a file.
#[derive(Debug, Clone, Copy)]
pub struct Package<'a> {
    ident: &'a Ident,
}

impl<'a> Package<'a> {
    pub fn name(&self) -> &'a str {
        &self.ident.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocodemod_cst::{CallExpr, Expr, NodeKind};

    const SOURCE: &str = "package main\n\nfunc main() {\n\tprintln(1)\n}\n";

    #[test]
    fn test_parse_keeps_paths() {
        let file = SourceFile::parse(SOURCE, "cmd/main.go", "/repo").unwrap();
        assert_eq!(file.file_path(), Some(Path::new("cmd/main.go")));
        assert_eq!(file.project_root(), Some(Path::new("/repo")));
        assert!(SourceFile::new(SOURCE).unwrap().file_path().is_none());
    }

    #[test]
    fn test_parse_failure() {
        assert!(SourceFile::new("func main() {}\n").is_err());
    }

    #[test]
    fn test_print_is_repeatable() {
        let file = SourceFile::new("package main\nfunc main(){println(1)}\n").unwrap();
        let first = file.print();
        assert_eq!(first, file.print());
        assert_eq!(first, file.source_code());
        assert_eq!(SourceFile::new(&first).unwrap().print(), first);
    }

    #[test]
    fn test_package_name() {
        let mut file = SourceFile::new(SOURCE).unwrap();
        assert_eq!(file.package().name(), "main");
        file.set_package_name("tools");
        assert_eq!(file.package().name(), "tools");
        assert!(file.print().starts_with("package tools\n"));
    }

    #[test]
    fn test_traverse_visits_every_node_once() {
        let file = SourceFile::new(SOURCE).unwrap();
        let mut kinds = Vec::new();
        file.traverse(|node, ancestry| {
            kinds.push(node.kind());
            assert_eq!(ancestry.kind(), node.kind());
        });
        assert_eq!(kinds[0], NodeKind::File);
        assert_eq!(kinds.iter().filter(|k| **k == NodeKind::CallExpr).count(), 1);
        assert_eq!(kinds.iter().filter(|k| **k == NodeKind::FuncDecl).count(), 1);
    }

    #[test]
    fn test_edit_assigns_ids_to_new_nodes() {
        let mut file = SourceFile::new(SOURCE).unwrap();
        let mut call_id = None;
        file.traverse(|node, _| {
            if let NodeRef::CallExpr(call) = node {
                call_id = call.node_id;
            }
        });
        let call_id = call_id.unwrap();
        file.edit(call_id, |call: &mut CallExpr| {
            call.args.push(Expr::ident("x"));
        })
        .unwrap();

        let call: CallExpr = file.find(call_id).unwrap();
        assert!(call.args[1].node_id().is_some());
        assert!(file.print().contains("println(1, x)"));
    }

    #[test]
    fn test_match_mode_from_json() {
        let mode: MatchMode = serde_json::from_str("\"structural\"").unwrap();
        assert_eq!(mode, MatchMode::Structural);
        assert_eq!(MatchMode::default(), MatchMode::Identity);
    }
}
