//! File access used by the bundler
//!
//! The bundler only ever needs two things from a file system: an existence
//! check and a whole-file read. [`StdFileSystem`] backs those with the disk,
//! [`MemoryFileSystem`] with an in-memory map that also records every call.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem {
    /// Check whether `path` resolves to an existing file
    fn exists(&self, path: &str) -> bool;

    /// Read the whole file as UTF-8 text.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when the path does not resolve.
    fn read_all_text(&self, path: &str) -> io::Result<String>;
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn read_all_text(&self, path: &str) -> io::Result<String> {
        (**self).read_all_text(path)
    }
}

/// Disk-backed file access; relative paths resolve against `root`
#[derive(Debug, Clone, Default)]
pub struct StdFileSystem {
    root: Option<PathBuf>,
}

impl StdFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` instead of the working directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) if Path::new(path).is_relative() => root.join(path),
            _ => PathBuf::from(path),
        }
    }
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read_all_text(&self, path: &str) -> io::Result<String> {
        let full_path = self.resolve(path);
        log::trace!("Reading {}", full_path.display());
        fs::read_to_string(&full_path)
    }
}

/// A single recorded file-system call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAccess {
    Exists(String),
    Read(String),
}

/// In-memory file access that records every call made against it
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, String>,
    accesses: RefCell<Vec<FileAccess>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Every call made so far, in order
    pub fn accesses(&self) -> Vec<FileAccess> {
        self.accesses.borrow().clone()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.accesses.borrow_mut().push(FileAccess::Exists(path.to_string()));
        self.files.contains_key(path)
    }

    fn read_all_text(&self, path: &str) -> io::Result<String> {
        self.accesses.borrow_mut().push(FileAccess::Read(path.to_string()));
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Could not find file '{}'", path))
        })
    }
}
