//! Minimal SCSS Preprocessor
//!
//! Translates a small SCSS dialect into plain CSS by resolving `$variable`
//! declarations and validating `@import` references at the text level.
//!
//! # Features
//!
//! - `$name: value;` declarations, stripped from the output
//! - Usage substitution, with `/* Error: $name not defined. */` comments for
//!   undefined variables instead of hard failures
//! - Partials (`_name.scss`) are never emitted
//! - `@import 'name';` references are checked for existence
//!
//! Nesting, mixins, functions and arithmetic are not supported.
//!
//! # Basic Usage
//!
//! ```rust
//! use scssc::ScssCompiler;
//!
//! let css = ScssCompiler::new().compile("$c: hotpink;\na { color: $c; }");
//! assert_eq!(css, "a { color: hotpink; }");
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Bundler**: skip partials, check the entry file and its imports exist
//! 2. **Compiler**: collect declarations and usages, strip, substitute, diagnose
//! 3. **Output**: rename `.scss` to `.css` and write the result

pub mod bundler;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod fs;

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// Re-export commonly used types and functions
pub use bundler::{is_partial, output_name, scan_imports, BundleOutput, BundledFile, Bundler};
pub use cli::EnhancedCli;
pub use compiler::{is_variable_name, CompileResult, ScssCompiler, VARIABLE_SIGIL};
pub use error::{BundleError, CompilerError, Result};
pub use fs::{FileAccess, FileSystem, MemoryFileSystem, StdFileSystem};

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Compilation options and settings
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Enable debug logging of each pipeline step
    pub debug_mode: bool,

    /// Where to write output files (`None` = beside the input)
    pub output_directory: Option<PathBuf>,

    /// Variables declared ahead of every compiled file
    pub custom_variables: HashMap<String, String>,

    /// Treat undefined variables as a failure
    pub fail_on_undefined: bool,
}

impl CompilerOptions {
    /// Custom variables in a stable order, each name carrying the `$` sigil.
    ///
    /// Values must be non-empty and free of `;` and line breaks, otherwise
    /// they would not compile back as a single declaration.
    pub fn injected_variables(&self) -> Result<Vec<(String, String)>> {
        let mut variables = Vec::with_capacity(self.custom_variables.len());
        for (name, value) in &self.custom_variables {
            let name = if name.starts_with(VARIABLE_SIGIL) {
                name.clone()
            } else {
                format!("{}{}", VARIABLE_SIGIL, name)
            };
            if !is_variable_name(&name) {
                return Err(CompilerError::invalid_format(format!(
                    "Invalid custom variable name '{}'",
                    name
                )));
            }
            let value = value.trim();
            if value.is_empty() || value.contains(|c: char| c == ';' || c == '\n' || c == '\r') {
                return Err(CompilerError::invalid_format(format!(
                    "Invalid value for custom variable '{}': '{}'",
                    name, value
                )));
            }
            variables.push((name, value.to_string()));
        }
        variables.sort();
        Ok(variables)
    }
}

/// Compilation statistics for one input file
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompilationStats {
    /// Original source size in bytes
    pub source_size: u64,

    /// Compiled CSS size in bytes
    pub output_size: u64,

    /// Number of imports validated
    pub import_count: usize,

    /// Number of variables declared
    pub variable_count: usize,

    /// Undefined variable names reported in the output
    pub undefined_variables: Vec<String>,

    /// Files written (empty for partials)
    pub written_files: Vec<PathBuf>,

    /// Compilation time in milliseconds
    pub compile_time_ms: u64,
}

/// Main compiler entry point with default options
pub fn compile_file(input_path: &str) -> Result<CompilationStats> {
    compile_file_with_options(input_path, &CompilerOptions::default())
}

/// Bundle `input_path` from disk and write its output.
///
/// Imports are resolved relative to the input file's directory.
pub fn compile_file_with_options(input_path: &str, options: &CompilerOptions) -> Result<CompilationStats> {
    use std::time::Instant;

    let start_time = Instant::now();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Compiling '{}'...", input_path);
        log::debug!("Compiler options: {:?}", options);
    }

    let mut stats = CompilationStats::default();
    let bundled = match bundle_file(input_path, options)? {
        Some(bundled) => bundled,
        None => {
            log::info!("'{}' is a partial, nothing to emit", input_path);
            stats.compile_time_ms = start_time.elapsed().as_millis() as u64;
            return Ok(stats);
        }
    };

    stats.source_size = bundled.source_size as u64;
    stats.output_size = bundled.result.css.len() as u64;
    stats.import_count = bundled.imports.len();
    stats.variable_count = bundled.result.variables.len();
    stats.undefined_variables = bundled.result.undefined.clone();

    if options.fail_on_undefined && bundled.result.has_errors() {
        return Err(CompilerError::UndefinedVariables {
            file: input_path.to_string(),
            names: bundled.result.undefined.join(", "),
        });
    }

    let output_name = Path::new(&bundled.output_name);
    let output_path = match (&options.output_directory, output_name.file_name()) {
        (Some(dir), Some(file_name)) => dir.join(file_name),
        _ => output_name.to_path_buf(),
    };
    if output_path == Path::new(input_path) {
        return Err(CompilerError::invalid_format(format!(
            "Output for '{}' would overwrite the input; expected a {} file",
            input_path,
            bundler::SCSS_EXTENSION
        )));
    }
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output_path, &bundled.result.css)?;
    log::info!("Wrote {}", output_path.display());

    stats.written_files.push(output_path);
    stats.compile_time_ms = start_time.elapsed().as_millis() as u64;

    if options.debug_mode {
        log::info!("Source size: {} bytes", stats.source_size);
        log::info!("Output size: {} bytes", stats.output_size);
        log::info!("Compile time: {}ms", stats.compile_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}

/// Bundle `input_path` from disk without writing anything. `None` for partials.
///
/// The entry path is used as given; imports resolve against its directory.
pub fn bundle_file(input_path: &str, options: &CompilerOptions) -> Result<Option<BundledFile>> {
    let mut bundler = Bundler::new(StdFileSystem::new()).with_variables(options.injected_variables()?);
    if let Some(dir) = base_dir(input_path) {
        bundler = bundler.with_import_root(dir.to_string_lossy());
    }
    Ok(bundler.bundle(input_path)?)
}

fn base_dir(input_path: &str) -> Option<&Path> {
    Path::new(input_path).parent().filter(|p| !p.as_os_str().is_empty())
}

/// Compile SCSS source text with default options
pub fn compile_source(source: &str) -> String {
    ScssCompiler::new().compile(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_injected_variables_get_sigil() {
        let mut options = CompilerOptions::default();
        options.custom_variables.insert("primary".to_string(), " navy ".to_string());
        options.custom_variables.insert("$accent".to_string(), "teal".to_string());

        let vars = options.injected_variables().unwrap();
        assert_eq!(
            vars,
            vec![
                ("$accent".to_string(), "teal".to_string()),
                ("$primary".to_string(), "navy".to_string()),
            ]
        );
    }

    #[test]
    fn test_injected_variables_reject_bad_names() {
        let mut options = CompilerOptions::default();
        options.custom_variables.insert("bad name".to_string(), "x".to_string());

        let err = options.injected_variables().unwrap_err();
        assert!(matches!(err, CompilerError::InvalidFormat { .. }));
    }

    #[test]
    fn test_compile_file_writes_beside_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("site.scss");
        fs::write(&input, "$c: hotpink;\na { color: $c; }").unwrap();

        let stats = compile_file(input.to_str().unwrap()).unwrap();

        let output = temp_dir.path().join("site.css");
        assert_eq!(stats.written_files, vec![output.clone()]);
        assert_eq!(fs::read_to_string(output).unwrap(), "a { color: hotpink; }");
        assert_eq!(stats.variable_count, 1);
    }

    #[test]
    fn test_compile_file_partial_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("_vars.scss");
        fs::write(&input, "$c: red;").unwrap();

        let stats = compile_file(input.to_str().unwrap()).unwrap();
        assert!(stats.written_files.is_empty());
        assert!(!temp_dir.path().join("_vars.css").exists());
    }

    #[test]
    fn test_fail_on_undefined() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("main.scss");
        fs::write(&input, "a { color: $nope; }").unwrap();

        let options = CompilerOptions {
            fail_on_undefined: true,
            ..Default::default()
        };
        let err = compile_file_with_options(input.to_str().unwrap(), &options).unwrap_err();
        assert!(err.to_string().contains("$nope"));
        assert!(!temp_dir.path().join("main.css").exists());
    }

    #[test]
    fn test_bundle_file_resolves_imports_next_to_input() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("colors.scss"), "").unwrap();
        let input = temp_dir.path().join("main.scss");
        fs::write(&input, "@import 'colors';\n@import 'missing';").unwrap();

        let err = bundle_file(input.to_str().unwrap(), &CompilerOptions::default()).unwrap_err();
        match err {
            CompilerError::Bundle(BundleError::ImportedFileMissing { name, .. }) => assert_eq!(name, "missing"),
            other => panic!("Expected missing import error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_entry_file_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("missing.scss");

        let input = input.to_str().unwrap();

        let err = compile_file(input).unwrap_err();
        assert!(err.to_string().contains(&format!("'{}' not found.", input)));
    }

    #[test]
    fn test_injected_variables_reject_bad_values() {
        for value in ["a;b", "", "   ", "a\nb"] {
            let mut options = CompilerOptions::default();
            options.custom_variables.insert("v".to_string(), value.to_string());

            let err = options.injected_variables().unwrap_err();
            assert!(matches!(err, CompilerError::InvalidFormat { .. }), "value: {:?}", value);
        }
    }

    #[test]
    fn test_input_without_scss_extension_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("plain.css");
        fs::write(&input, "a { }").unwrap();

        let err = compile_file(input.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CompilerError::InvalidFormat { .. }));
        assert_eq!(fs::read_to_string(&input).unwrap(), "a { }");
    }

    #[test]
    fn test_compile_source() {
        assert_eq!(compile_source("a { }"), "a { }");
    }
}
