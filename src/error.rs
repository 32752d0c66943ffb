//! Error types for the SCSS preprocessor

use thiserror::Error;

/// Fatal bundling failures: a required input file is unavailable.
///
/// Undefined variables are never reported here; they end up as comments in
/// the compiled output instead.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("'{path}' not found.")]
    EntryFileMissing { path: String },

    #[error("File to import not found: '{name}'.")]
    ImportedFileMissing {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    pub fn entry_missing(path: impl Into<String>) -> Self {
        Self::EntryFileMissing { path: path.into() }
    }

    pub fn import_missing(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::ImportedFileMissing {
            name: name.into(),
            source,
        }
    }

    /// The path or import identifier that could not be found
    pub fn missing_name(&self) -> &str {
        match self {
            Self::EntryFileMissing { path } => path,
            Self::ImportedFileMissing { name, .. } => name,
        }
    }
}

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Watch error: {message}")]
    Watch { message: String },

    #[error("Undefined variables in {file}: {names}")]
    UndefinedVariables { file: String, names: String },
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl CompilerError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn watch(message: impl Into<String>) -> Self {
        Self::Watch {
            message: message.into(),
        }
    }
}
