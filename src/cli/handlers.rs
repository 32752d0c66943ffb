// FILE: src/cli/handlers.rs
use crate::{
    bundle_file, compile_file_with_options, is_partial, CompilationStats, CompilerError,
    CompilerOptions, Result,
};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Instant;
use walkdir::WalkDir;

// --- BUILD ---
pub fn handle_build_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let inputs: Vec<String> = matches
        .get_many::<String>("input")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let options = cli.build_compiler_options(matches)?;

    if matches.get_flag("watch") {
        watch_and_build(&inputs, &options)
    } else {
        build_inputs(&inputs, &options, matches.get_flag("stats"))
    }
}

fn build_inputs(inputs: &[String], options: &CompilerOptions, show_stats: bool) -> Result<()> {
    let files = collect_scss_files(inputs, true);
    if files.is_empty() {
        println!("No .scss files found.");
        return Ok(());
    }

    let build_start = Instant::now();
    let mut written = 0;
    for file in &files {
        let stats = compile_file_with_options(file, options)?;
        for path in &stats.written_files {
            println!("🔨 {} -> {}", file, path.display());
        }
        for name in &stats.undefined_variables {
            println!("⚠️  {}: {} not defined", file, name);
        }
        if show_stats {
            print_stats(file, &stats);
        }
        written += stats.written_files.len();
    }

    println!(
        "✅ Built {} file(s) in {}ms",
        written,
        build_start.elapsed().as_millis()
    );
    Ok(())
}

fn watch_and_build(inputs: &[String], options: &CompilerOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", inputs.join(", "));

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| CompilerError::watch(format!("Failed to create file watcher: {}", e)))?;

    for input in inputs {
        let path = Path::new(input);
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(path, mode)
            .map_err(|e| CompilerError::watch(format!("Failed to watch {}: {}", input, e)))?;
    }

    if let Err(e) = build_inputs(inputs, options, false) {
        eprintln!("❌ Initial build failed: {}", e);
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                // Our own .css writes land in the watched directories too
                let touches_scss = event
                    .paths
                    .iter()
                    .any(|p| p.extension().map_or(false, |ext| ext == "scss"));
                if !touches_scss {
                    continue;
                }
                println!("🔄 File changed, rebuilding...");
                if let Err(e) = build_inputs(inputs, options, false) {
                    eprintln!("❌ Build failed: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(file: &str, stats: &CompilationStats) {
    println!("📊 {}", file);
    println!("   Source: {} bytes", stats.source_size);
    println!("   Output: {} bytes", stats.output_size);
    println!("   Imports: {}", stats.import_count);
    println!("   Variables: {}", stats.variable_count);
    println!("   Undefined: {}", stats.undefined_variables.len());
    println!("   Time: {}ms", stats.compile_time_ms);
}

// --- CHECK ---
pub fn handle_check_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input = required_input(matches)?;
    let options = cli.build_compiler_options(matches)?;
    let files = collect_scss_files(&[input.clone()], matches.get_flag("recursive"));

    let mut failures = 0;
    let mut undefined_total = 0;
    for file in &files {
        match bundle_file(file, &options) {
            Ok(Some(bundled)) if bundled.result.has_errors() => {
                undefined_total += bundled.result.undefined.len();
                println!("⚠️  {}: undefined {}", file, bundled.result.undefined.join(", "));
            }
            Ok(Some(_)) => println!("✅ {}", file),
            Ok(None) => log::debug!("Skipping partial {}", file),
            Err(e) => {
                failures += 1;
                eprintln!("❌ {}: {}", file, e);
            }
        }
    }

    if failures > 0 {
        return Err(CompilerError::invalid_format(format!(
            "{} of {} file(s) failed",
            failures,
            files.len()
        )));
    }
    if options.fail_on_undefined && undefined_total > 0 {
        return Err(CompilerError::UndefinedVariables {
            file: input,
            names: format!("{} undefined variable(s)", undefined_total),
        });
    }
    Ok(())
}

// --- DEBUG ---
pub fn handle_debug_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input = required_input(matches)?;
    let options = cli.build_compiler_options(matches)?;

    match bundle_file(&input, &options)? {
        Some(bundled) => {
            let json = serde_json::to_string_pretty(&bundled.result)
                .map_err(|e| CompilerError::invalid_format(format!("JSON serialization failed: {}", e)))?;
            println!("{}", json);
        }
        None => println!("'{}' is a partial and produces no output.", input),
    }
    Ok(())
}

fn required_input(matches: &clap::ArgMatches) -> Result<String> {
    matches
        .get_one::<String>("input")
        .cloned()
        .ok_or_else(|| CompilerError::invalid_format("Missing input path"))
}

/// Expand directories into the `.scss` files under them. Files are passed
/// through untouched; partials are kept and skipped later by the bundler.
fn collect_scss_files(inputs: &[String], recursive: bool) -> Vec<String> {
    let mut files = Vec::new();
    for input in inputs {
        let path = Path::new(input);
        if !path.is_dir() {
            files.push(input.clone());
            continue;
        }
        let walker = if recursive {
            WalkDir::new(path)
        } else {
            WalkDir::new(path).max_depth(1)
        };
        for entry in walker.sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let entry_path = entry.path();
            if entry_path.is_file() && entry_path.extension().map_or(false, |ext| ext == "scss") {
                let file = entry_path.to_string_lossy().into_owned();
                if is_partial(&file) {
                    log::trace!("Found partial {}", file);
                }
                files.push(file);
            }
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_scss_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("a.scss"), "").unwrap();
        fs::write(temp_dir.path().join("_b.scss"), "").unwrap();
        fs::write(temp_dir.path().join("c.css"), "").unwrap();
        fs::write(temp_dir.path().join("nested/d.scss"), "").unwrap();

        let dir = temp_dir.path().to_string_lossy().into_owned();

        let shallow = collect_scss_files(&[dir.clone()], false);
        assert_eq!(shallow.len(), 2);
        assert!(shallow.iter().all(|f| f.ends_with(".scss")));

        let deep = collect_scss_files(&[dir], true);
        assert_eq!(deep.len(), 3);
        assert!(deep.iter().any(|f| f.ends_with("d.scss")));
    }

    #[test]
    fn test_collect_passes_files_through() {
        let files = collect_scss_files(&["does-not-exist.scss".to_string()], true);
        assert_eq!(files, vec!["does-not-exist.scss".to_string()]);
    }

    #[test]
    fn test_build_inputs_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("_vars.scss"), "$c: red;").unwrap();
        fs::write(temp_dir.path().join("main.scss"), "@import '_vars';\n$c: blue;\np { color: $c; }").unwrap();

        let dir = temp_dir.path().to_string_lossy().into_owned();
        build_inputs(&[dir], &CompilerOptions::default(), false).unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("main.css")).unwrap(),
            "@import '_vars';\np { color: blue; }"
        );
        assert!(!temp_dir.path().join("_vars.css").exists());
    }
}
