//! scssc Binary

use scssc::{BundleError, CompilerError, EnhancedCli};
use std::error::Error;
use std::process;

fn main() {
    let mut cli = EnhancedCli::new();

    match cli.run() {
        Ok(()) => {}
        Err(CompilerError::Bundle(e @ BundleError::ImportedFileMissing { .. })) => {
            eprintln!("Bundling failed: {}", e);
            if let Some(cause) = e.source() {
                eprintln!("  caused by: {}", cause);
            }
            process::exit(1);
        }
        Err(CompilerError::Io(e)) => {
            eprintln!("IO Error: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Compilation failed: {}", e);
            process::exit(1);
        }
    }
}
