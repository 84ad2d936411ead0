//! gocodemod: codemods for Go source trees.
//!
//! The [`engine`] crate finds function calls, literals, assignments and
//! declarations in a single Go file and edits them safely. This crate runs
//! such edits over a whole directory:
//!
//! ```no_run
//! use gocodemod::{apply_to_directory, ApplyConfig, Codemod};
//! use gocodemod::engine::cst::Expr;
//!
//! let config = ApplyConfig::for_root("./service").with_replacement("pkg/v1", "pkg/v2");
//! let codemods = [Codemod::source_file("errors.New -> fmt.Errorf", |file| {
//!     for mut call in file.function_calls().into_values().flatten() {
//!         if call.function_name() == "errors.New" {
//!             call.edit(file, |call| {
//!                 call.fun = Expr::selector(Expr::ident("fmt"), "Errorf");
//!             })
//!             .unwrap();
//!             file.imports().add("fmt");
//!         }
//!     }
//! })];
//! let report = apply_to_directory(&config, &codemods).unwrap();
//! println!("rewrote {} files", report.rewritten.len());
//! ```

pub mod apply;
pub mod config;
pub mod error;

pub use apply::{apply_to_directory, describe, ApplyReport, Codemod, Project};
pub use config::ApplyConfig;
pub use error::{ApplyError, ApplyResult};

pub use gocodemod_engine as engine;

/// Install a stderr subscriber filtered by `RUST_LOG`, falling back to `level`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Like [`init_tracing`], but one JSON object per event.
pub fn init_json_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
