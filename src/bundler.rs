//! File-level bundling: partial detection, import validation and output naming

use crate::compiler::{CompileResult, ScssCompiler};
use crate::error::BundleError;
use crate::fs::FileSystem;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Leading character of a partial's file name
pub const PARTIAL_MARKER: char = '_';
pub const SCSS_EXTENSION: &str = ".scss";
pub const CSS_EXTENSION: &str = ".css";

static IMPORT_STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@import '(?P<name>[\w\-\.]+)';").unwrap());

/// Output file name -> compiled CSS. Empty for partials.
pub type BundleOutput = HashMap<String, String>;

/// One compiled, non-partial file
#[derive(Debug, Clone)]
pub struct BundledFile {
    pub source_path: String,
    pub source_size: usize,
    pub output_name: String,
    pub imports: Vec<String>,
    pub result: CompileResult,
}

pub struct Bundler<F: FileSystem> {
    fs: F,
    compiler: ScssCompiler,
    injected: Vec<(String, String)>,
    import_root: Option<String>,
}

impl<F: FileSystem> Bundler<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            compiler: ScssCompiler::new(),
            injected: Vec::new(),
            import_root: None,
        }
    }

    /// Declarations compiled ahead of every file's own text. The file's own
    /// declarations of the same name take precedence.
    pub fn with_variables(mut self, variables: Vec<(String, String)>) -> Self {
        self.injected = variables;
        self
    }

    /// Resolve `@import` names against `root` rather than as bare file names.
    /// The entry path itself is always used as given.
    pub fn with_import_root(mut self, root: impl Into<String>) -> Self {
        self.import_root = Some(root.into());
        self
    }

    /// Bundle and compile a single file.
    ///
    /// Partials produce an empty output without touching the file system.
    /// A missing entry file or a missing import aborts the whole bundle.
    pub fn bundle_and_compile(&self, path: &str) -> Result<BundleOutput, BundleError> {
        let mut output = BundleOutput::new();
        if let Some(file) = self.bundle(path)? {
            output.insert(file.output_name, file.result.css);
        }
        Ok(output)
    }

    /// Like [`Bundler::bundle_and_compile`], keeping the full compile result
    /// and the validated imports. `None` for partials.
    pub fn bundle(&self, path: &str) -> Result<Option<BundledFile>, BundleError> {
        if is_partial(path) {
            log::debug!("Skipping partial '{}'", path);
            return Ok(None);
        }

        if !self.fs.exists(path) {
            return Err(BundleError::entry_missing(path));
        }

        // The existence check just passed, so a failed read is reported the same way
        let contents = self.fs.read_all_text(path).map_err(|e| {
            log::warn!("Failed to read '{}': {}", path, e);
            BundleError::entry_missing(path)
        })?;

        let imports = self.validate_imports(&contents)?;

        let result = self.compiler.debug_compile(&self.with_injected(&contents));
        let output_name = output_name(path);
        log::debug!("Compiled '{}' -> '{}'", path, output_name);

        Ok(Some(BundledFile {
            source_path: path.to_string(),
            source_size: contents.len(),
            output_name,
            imports,
            result,
        }))
    }

    /// Every `@import` must name an existing `<name>.scss`. Contents are read
    /// but not merged into the output.
    fn validate_imports(&self, contents: &str) -> Result<Vec<String>, BundleError> {
        let imports = scan_imports(contents);
        for name in &imports {
            let file_name = self.import_path(name);
            log::debug!("Validating import '{}' ({})", name, file_name);
            self.fs
                .read_all_text(&file_name)
                .map_err(|e| BundleError::import_missing(name.as_str(), e))?;
        }
        Ok(imports)
    }

    fn import_path(&self, name: &str) -> String {
        let file_name = format!("{}{}", name, SCSS_EXTENSION);
        match &self.import_root {
            Some(root) => Path::new(root).join(file_name).to_string_lossy().into_owned(),
            None => file_name,
        }
    }

    fn with_injected(&self, contents: &str) -> String {
        if self.injected.is_empty() {
            return contents.to_string();
        }
        let mut source: String = self
            .injected
            .iter()
            .map(|(name, value)| format!("{}: {};\n", name, value))
            .collect();
        source.push_str(contents);
        source
    }
}

/// Imported identifiers in source order, duplicates kept
pub fn scan_imports(contents: &str) -> Vec<String> {
    IMPORT_STATEMENT
        .captures_iter(contents)
        .map(|caps| caps["name"].to_string())
        .collect()
}

/// A partial's base name starts with `_`
pub fn is_partial(path: &str) -> bool {
    let base_name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
    base_name.starts_with(PARTIAL_MARKER)
}

/// Replace the first `.scss` in `path` with `.css`.
///
/// This is not anchored to the end: `a.scss.d/x.scss` becomes `a.css.d/x.scss`.
pub fn output_name(path: &str) -> String {
    path.replacen(SCSS_EXTENSION, CSS_EXTENSION, 1)
}
