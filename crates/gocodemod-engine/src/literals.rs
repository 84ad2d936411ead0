//! Keyed composite literals: struct literals and map literals.
//!
//! Keys are compared by their text: a string key by its unquoted contents,
//! an identifier key by its name, anything else by its rendered source.

use std::rc::Rc;

use gocodemod_core::{normalize_string, quote};
use gocodemod_cst::{source_code, BasicLit, CompositeLit, Expr, KeyValueExpr, LitKind, NodeRef};

use crate::ancestry::{NodeWithAncestry, Scope};
use crate::error::{CodemodError, CodemodResult};
use crate::fragment::parse_expr;
use crate::source_file::{ScopedMatches, SourceFile};

fn key_text(key: &Expr) -> String {
    match key {
        Expr::BasicLit(lit) if lit.kind == LitKind::String => lit.unquoted().to_string(),
        Expr::Ident(ident) => ident.name.clone(),
        other => source_code(other),
    }
}

fn keyed_elements(lit: &CompositeLit) -> impl Iterator<Item = &KeyValueExpr> {
    lit.elts.iter().filter_map(|elt| match elt {
        Expr::KeyValue(kv) => Some(kv.as_ref()),
        _ => None,
    })
}

fn lookup<'a>(lit: &'a CompositeLit, key: &str) -> Option<&'a Expr> {
    keyed_elements(lit)
        .find(|kv| key_text(&kv.key) == key)
        .map(|kv| &kv.value)
}

fn rename_key_in(lit: &mut CompositeLit, old: &str, new: &str) -> bool {
    let mut renamed = false;
    for elt in &mut lit.elts {
        let Expr::KeyValue(kv) = elt else { continue };
        if key_text(&kv.key) != old {
            continue;
        }
        match &mut kv.key {
            Expr::BasicLit(basic) if basic.kind == LitKind::String => basic.value = quote(new),
            Expr::BasicLit(basic) => basic.value = new.to_string(),
            Expr::Ident(ident) => ident.name = new.to_string(),
            key => *key = Expr::BasicLit(BasicLit::string(new)),
        }
        renamed = true;
    }
    renamed
}

fn remove_key_in(lit: &mut CompositeLit, key: &str) -> bool {
    let before = lit.elts.len();
    lit.elts
        .retain(|elt| !matches!(elt, Expr::KeyValue(kv) if key_text(&kv.key) == key));
    lit.elts.len() != before
}

// ============================================================================
// StructLiteral
// ============================================================================

/// A read-only view of a keyed composite literal such as `Config{Port: 80}`.
#[derive(Debug, Clone, PartialEq)]
pub struct StructLiteral {
    lit: CompositeLit,
}

impl StructLiteral {
    pub fn new(lit: CompositeLit) -> Self {
        StructLiteral { lit }
    }

    pub fn node(&self) -> &CompositeLit {
        &self.lit
    }

    /// The literal's type as written, if it has one.
    pub fn type_name(&self) -> Option<String> {
        self.lit.ty.as_ref().map(source_code)
    }

    pub fn keys(&self) -> Vec<String> {
        keyed_elements(&self.lit).map(|kv| key_text(&kv.key)).collect()
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Expr> {
        lookup(&self.lit, key)
    }

    /// The value given for `key`.
    ///
    /// # Panics
    ///
    /// Panics when the literal has no such key. Use [`get`](Self::get) when
    /// the key may be absent.
    pub fn field(&self, key: &str) -> &Expr {
        match self.get(key) {
            Some(value) => value,
            None => panic!(
                "struct literal {} doesn't have a field called {}",
                self.type_name().unwrap_or_default(),
                key
            ),
        }
    }
}

// ============================================================================
// MapLiteral
// ============================================================================

/// A map composite literal found in a file.
#[derive(Debug, Clone)]
pub struct MapLiteral {
    ancestry: Rc<NodeWithAncestry>,
    lit: CompositeLit,
    scope: Scope,
}

impl MapLiteral {
    pub fn node(&self) -> &CompositeLit {
        &self.lit
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    pub fn keys(&self) -> Vec<String> {
        keyed_elements(&self.lit).map(|kv| key_text(&kv.key)).collect()
    }

    pub fn has(&self, key: &str) -> bool {
        lookup(&self.lit, key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Expr> {
        lookup(&self.lit, key)
    }

    /// Rename `old` to `new`, keeping the value. Does nothing when `old` is
    /// not a key.
    pub fn rename_key(&mut self, file: &mut SourceFile, old: &str, new: &str) -> bool {
        if !self.has(old) {
            return false;
        }
        file.edit_captured(&mut self.lit, |lit| rename_key_in(lit, old, new))
            .unwrap_or(false)
    }

    /// Remove the entry for `key`. Does nothing when it is absent.
    pub fn remove_key(&mut self, file: &mut SourceFile, key: &str) -> bool {
        if !self.has(key) {
            return false;
        }
        file.edit_captured(&mut self.lit, |lit| remove_key_in(lit, key))
            .unwrap_or(false)
    }
}

impl SourceFile {
    /// Map literals whose type is `map_type` (`"map[string]string"`).
    /// Literals whose type is elided inside an outer literal are not matched.
    pub fn find_map_literals(
        &self,
        map_type: &str,
    ) -> CodemodResult<ScopedMatches<MapLiteral>> {
        let invalid = |reason: String| CodemodError::InvalidMapType {
            text: map_type.to_string(),
            reason,
        };
        let parsed = parse_expr(map_type).map_err(|e| invalid(e.to_string()))?;
        let Expr::MapType(wanted) = parsed else {
            return Err(invalid("not a map type".to_string()));
        };
        let key = normalize_string(&source_code(&wanted.key));
        let value = normalize_string(&source_code(&wanted.value));

        Ok(self.collect(|node, link, scope| {
            let NodeRef::CompositeLit(lit) = node else {
                return None;
            };
            let Some(Expr::MapType(ty)) = &lit.ty else {
                return None;
            };
            let same = normalize_string(&source_code(&ty.key)) == key
                && normalize_string(&source_code(&ty.value)) == value;
            same.then(|| MapLiteral {
                ancestry: Rc::clone(link),
                lit: lit.clone(),
                scope: scope.clone(),
            })
        }))
    }

    /// The first map literal of type `map_type`, with its scope.
    pub fn find_map_literal(&self, map_type: &str) -> CodemodResult<Option<MapLiteral>> {
        Ok(self.find_map_literals(map_type)?.into_values().flatten().next())
    }
}
