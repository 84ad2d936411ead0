//! The set of import paths of a file.

use tracing::debug;

use gocodemod_cst::{Decl, DeclKeyword, GenDecl, ImportSpec, Pos, Spec};

use crate::source_file::SourceFile;

fn is_import_decl(decl: &Decl) -> bool {
    decl.as_gen().is_some_and(|gen| gen.tok == DeclKeyword::Import)
}

fn import_path(spec: &Spec) -> Option<&str> {
    match spec {
        Spec::Import(import) => Some(import.path.unquoted()),
        _ => None,
    }
}

/// Edits the imports of a [`SourceFile`].
///
/// Paths are compared as written, without quotes; the local name of an
/// import plays no part.
#[derive(Debug)]
pub struct Imports<'a> {
    file: &'a mut SourceFile,
}

impl Imports<'_> {
    /// Import paths in declaration order.
    pub fn paths(&self) -> Vec<String> {
        self.file.import_paths()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.file.file().imports().any(|i| i.path.unquoted() == path)
    }

    /// Import `path` unless it already is. The new import spec joins the first import
    /// declaration, or a new declaration after the package clause when the
    /// file has none.
    pub fn add(&mut self, path: &str) -> bool {
        if self.contains(path) {
            return false;
        }
        let mut spec = Spec::Import(Box::new(ImportSpec::new(path)));
        self.file.adopt(&mut spec);

        let existing = self.file.file().decls.iter().position(is_import_decl);
        match existing.map(|index| &mut self.file.file_mut().decls[index]) {
            Some(Decl::Gen(gen)) => gen.specs.push(spec),
            _ => {
                let mut decl = Decl::Gen(Box::new(GenDecl {
                    node_id: None,
                    tok_pos: Pos::NONE,
                    tok: DeclKeyword::Import,
                    lparen: Pos::NONE,
                    specs: vec![spec],
                    rparen: Pos::NONE,
                }));
                self.file.adopt(&mut decl);
                self.file.file_mut().decls.insert(0, decl);
            }
        }
        debug!(path, "import added");
        true
    }

    /// Remove every import of `path`, dropping import declarations left
    /// empty. Returns the number of specs removed.
    pub fn remove(&mut self, path: &str) -> usize {
        let decls = &mut self.file.file_mut().decls;
        let mut removed = 0;
        decls.retain_mut(|decl| {
            let Decl::Gen(gen) = decl else {
                return true;
            };
            if gen.tok != DeclKeyword::Import {
                return true;
            }
            let before = gen.specs.len();
            gen.specs.retain(|spec| import_path(spec) != Some(path));
            removed += before - gen.specs.len();
            before == gen.specs.len() || !gen.specs.is_empty()
        });
        if removed > 0 {
            debug!(path, removed, "import removed");
        }
        removed
    }
}

impl SourceFile {
    /// The file's imports, for editing.
    pub fn imports(&mut self) -> Imports<'_> {
        Imports { file: self }
    }

    /// Import paths in declaration order.
    pub fn import_paths(&self) -> Vec<String> {
        self.file()
            .imports()
            .map(|i| i.path.unquoted().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocodemod_core::normalize_string;

    const SOURCE: &str = "package main\n\nimport (\n\t\"errors\"\n\tlog \"github.com/sirupsen/logrus\"\n)\n\nfunc main() {\n}\n";

    #[test]
    fn test_paths() {
        let mut file = SourceFile::new(SOURCE).unwrap();
        assert_eq!(file.import_paths(), ["errors", "github.com/sirupsen/logrus"]);
        let imports = file.imports();
        assert!(imports.contains("errors"));
        assert!(!imports.contains("log"));
        assert_eq!(imports.paths().len(), 2);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut file = SourceFile::new(SOURCE).unwrap();
        assert!(file.imports().add("fmt"));
        assert!(!file.imports().add("fmt"));
        assert!(!file.imports().add("fmt"));
        assert_eq!(file.import_paths(), ["errors", "github.com/sirupsen/logrus", "fmt"]);
        assert_eq!(file.print().matches("\"fmt\"").count(), 1);
    }

    #[test]
    fn test_add_to_single_import_groups_it() {
        let mut file = SourceFile::new("package main\n\nimport \"errors\"\n").unwrap();
        file.imports().add("fmt");
        assert_eq!(
            normalize_string(&file.print()),
            normalize_string("package main\n\nimport (\n\t\"errors\"\n\t\"fmt\"\n)\n")
        );
    }

    #[test]
    fn test_add_without_import_declaration() {
        let mut file = SourceFile::new("package main\n\nfunc main() {\n}\n").unwrap();
        assert!(file.imports().add("os"));
        assert!(file.file().decls[0].as_gen().is_some());
        assert!(file.file().decls[0].node_id().is_some());
        let printed = normalize_string(&file.print());
        assert!(printed.starts_with("packagemainimport\"os\"funcmain()"));
    }

    #[test]
    fn test_remove() {
        let mut file = SourceFile::new(SOURCE).unwrap();
        assert_eq!(file.imports().remove("github.com/sirupsen/logrus"), 1);
        assert_eq!(file.import_paths(), ["errors"]);
        assert!(!file.print().contains("logrus"));
    }

    #[test]
    fn test_remove_absent_path_is_a_no_op() {
        let mut file = SourceFile::new(SOURCE).unwrap();
        assert_eq!(file.imports().remove("fmt"), 0);
        assert_eq!(file.print(), SOURCE);
    }

    #[test]
    fn test_remove_last_import_drops_declaration() {
        let mut file = SourceFile::new("package main\n\nimport \"errors\"\n\nvar x = 1\n").unwrap();
        assert_eq!(file.imports().remove("errors"), 1);
        assert_eq!(file.file().decls.len(), 1);
        assert!(!file.print().contains("import"));
    }
}
