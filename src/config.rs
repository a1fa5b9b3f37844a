//! Ambient compiler configuration (component K).
//!
//! Unlike a runtime-extensible host compiler, M++ has no builtins or link
//! steps to configure; this is just the handful of knobs the driver exposes
//! over the CLI, collected into one place so `lib.rs` takes a single struct
//! instead of four positional booleans and paths.

use std::path::PathBuf;

/// Default path the quadruple listing is written to when `-o`/`--output` is
/// not given.
pub const DEFAULT_OUTPUT: &str = "a.quad";

#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Enables warning diagnostics (unused declarations, etc). Errors are
    /// always reported regardless of this flag.
    pub warnings_enabled: bool,
    /// Where the emitted quadruple listing is written.
    pub output_path: PathBuf,
    /// Optional path to dump a rendering of the resolved symbol table to,
    /// for debugging; not produced when `None`.
    pub sym_table_path: Option<PathBuf>,
}

impl CompilerConfig {
    pub fn new() -> Self {
        CompilerConfig::default()
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            warnings_enabled: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            sym_table_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_is_a_dot_quad() {
        let config = CompilerConfig::default();
        assert_eq!(config.output_path, PathBuf::from("a.quad"));
        assert!(!config.warnings_enabled);
        assert!(config.sym_table_path.is_none());
    }
}
