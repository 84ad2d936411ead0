//! Applying codemods to every file below a directory.
//!
//! A run has two phases. Project codemods run first, once, with the root
//! directory (to install a package or delete a folder, say). Then every file
//! below the root gets the configured text replacements, and every Go file
//! is parsed and handed to each source file codemod in order. A file is
//! written back only when its content changed.

use std::any::Any;
use std::fmt;
use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use regex::bytes::Regex;
use serde::Serialize;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

use gocodemod_engine::SourceFile;

use crate::config::ApplyConfig;
use crate::error::{ApplyError, ApplyResult};

// ============================================================================
// Codemods
// ============================================================================

/// The directory a run applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

enum Transform {
    Project(Box<dyn Fn(&Project)>),
    SourceFile(Box<dyn Fn(&mut SourceFile)>),
}

/// A described transformation of a project or of each Go file.
pub struct Codemod {
    description: String,
    transform: Transform,
}

impl Codemod {
    /// A codemod run once per project, before any file is visited.
    pub fn project(description: impl Into<String>, f: impl Fn(&Project) + 'static) -> Self {
        Codemod {
            description: description.into(),
            transform: Transform::Project(Box::new(f)),
        }
    }

    /// A codemod run on every Go file.
    pub fn source_file(
        description: impl Into<String>,
        f: impl Fn(&mut SourceFile) + 'static,
    ) -> Self {
        Codemod {
            description: description.into(),
            transform: Transform::SourceFile(Box::new(f)),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for Codemod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.transform {
            Transform::Project(_) => "project",
            Transform::SourceFile(_) => "source_file",
        };
        f.debug_struct("Codemod")
            .field("description", &self.description)
            .field("kind", &kind)
            .finish()
    }
}

/// Markdown-ish summary of what a set of codemods does, one entry per codemod.
pub fn describe(codemods: &[Codemod]) -> String {
    let entries: Vec<String> = codemods
        .iter()
        .map(|c| format!("λ {}", c.description))
        .collect();
    format!("Applied the following codemods:\n\n{}", entries.join("\n\n"))
}

// ============================================================================
// Report
// ============================================================================

/// What a run touched. Paths are relative to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Every file that was read, in walk order.
    pub visited: Vec<PathBuf>,
    /// Files whose content changed and were written back.
    pub rewritten: Vec<PathBuf>,
}

impl ApplyReport {
    pub fn is_unchanged(&self) -> bool {
        self.rewritten.is_empty()
    }
}

// ============================================================================
// Directory application
// ============================================================================

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run `f`, turning a panic into [`ApplyError::CodemodPanicked`].
fn guarded<T>(codemod: &Codemod, path: &Path, f: impl FnOnce() -> T) -> ApplyResult<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| ApplyError::CodemodPanicked {
        path: path.to_path_buf(),
        description: codemod.description.clone(),
        message: panic_message(payload.as_ref()),
    })
}

fn compile_replacements(config: &ApplyConfig) -> ApplyResult<Vec<(Regex, &str)>> {
    config
        .replacements
        .iter()
        .map(|(pattern, replacement)| {
            Regex::new(pattern)
                .map(|re| (re, replacement.as_str()))
                .map_err(|source| ApplyError::Regex {
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}

/// Apply `codemods` and the replacements of `config` to every file below
/// `config.root`.
///
/// Returns early without walking when there is nothing to apply. Stops at
/// the first error; files rewritten before it keep their new content.
pub fn apply_to_directory(config: &ApplyConfig, codemods: &[Codemod]) -> ApplyResult<ApplyReport> {
    let mut report = ApplyReport::default();
    if config.replacements.is_empty() && codemods.is_empty() {
        debug!(root = %config.root.display(), "nothing to apply");
        return Ok(report);
    }
    let replacements = compile_replacements(config)?;

    let project = Project {
        root: config.root.clone(),
    };
    for codemod in codemods {
        if let Transform::Project(f) = &codemod.transform {
            info!(codemod = %codemod.description, "running project codemod");
            guarded(codemod, &project.root, || f(&project))?;
        }
    }
    let file_codemods: Vec<(&Codemod, &dyn Fn(&mut SourceFile))> = codemods
        .iter()
        .filter_map(|c| match &c.transform {
            Transform::SourceFile(f) => Some((c, f.as_ref())),
            Transform::Project(_) => None,
        })
        .collect();
    if replacements.is_empty() && file_codemods.is_empty() {
        return Ok(report);
    }

    for entry in WalkDir::new(&config.root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_default();
            ApplyError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(&config.root).unwrap_or(path);
        if config.skips(relative) {
            trace!(path = %relative.display(), "skipped");
            continue;
        }

        let original = fs::read(path).map_err(|e| ApplyError::io(path, e))?;
        let mut content = original.clone();
        for (re, replacement) in &replacements {
            content = re.replace_all(&content, replacement.as_bytes()).into_owned();
        }

        if path.extension().is_some_and(|ext| ext == "go") {
            let text = String::from_utf8(content).map_err(|e| {
                ApplyError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;
            let mut file = SourceFile::parse(&text, relative, &config.root).map_err(|source| {
                ApplyError::Codemod {
                    path: relative.to_path_buf(),
                    source,
                }
            })?;
            file.set_match_mode(config.match_mode);
            for (codemod, f) in &file_codemods {
                guarded(codemod, relative, || f(&mut file))?;
            }
            content = file.print().into_bytes();
        }

        report.visited.push(relative.to_path_buf());
        if content != original {
            fs::write(path, content).map_err(|e| ApplyError::io(path, e))?;
            info!(path = %relative.display(), "rewritten");
            report.rewritten.push(relative.to_path_buf());
        }
    }
    info!(
        visited = report.visited.len(),
        rewritten = report.rewritten.len(),
        "codemods applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let codemods = [
            Codemod::project("a", |_| {}),
            Codemod::source_file("b", |_| {}),
            Codemod::source_file("c", |_| {}),
        ];
        assert_eq!(
            describe(&codemods),
            "Applied the following codemods:\n\nλ a\n\nλ b\n\nλ c"
        );
    }

    #[test]
    fn test_panic_message() {
        let codemod = Codemod::source_file("explodes", |_| {});
        let err = guarded(&codemod, Path::new("x.go"), || panic!("field {} missing", "Port"))
            .unwrap_err();
        match err {
            ApplyError::CodemodPanicked {
                description,
                message,
                ..
            } => {
                assert_eq!(description, "explodes");
                assert_eq!(message, "field Port missing");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(guarded(&codemod, Path::new("x.go"), || 7).unwrap(), 7);
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ApplyConfig::for_root("/nonexistent").with_replacement("(", "x");
        assert!(matches!(
            apply_to_directory(&config, &[]),
            Err(ApplyError::Regex { .. })
        ));
    }

    #[test]
    fn test_codemod_debug() {
        let codemod = Codemod::project("install", |_| {});
        assert_eq!(
            format!("{:?}", codemod),
            "Codemod { description: \"install\", kind: \"project\" }"
        );
    }
}
