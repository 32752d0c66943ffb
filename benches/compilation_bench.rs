//! Compilation performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scssc::*;
use std::fs;
use tempfile::TempDir;

fn bench_simple_compilation(c: &mut Criterion) {
    let compiler = ScssCompiler::new();
    let content = "$primary: hotpink;\n$font-stack: Comic Sans;\na { color: $primary; font: 100% $font-stack; }\n";

    c.bench_function("simple_compilation", |b| {
        b.iter(|| compiler.compile(black_box(content)))
    });
}

fn bench_large_source_compilation(c: &mut Criterion) {
    let compiler = ScssCompiler::new();

    // Generate large file
    let mut content = String::new();
    for i in 0..200 {
        content.push_str(&format!("$color-{}: #{:06x};\n", i, i * 997));
    }
    for i in 0..1000 {
        content.push_str(&format!(".item-{} {{ color: $color-{}; }}\n", i, i % 250));
    }

    c.bench_function("large_source_compilation", |b| {
        b.iter(|| compiler.debug_compile(black_box(&content)))
    });
}

fn bench_bundle_from_disk(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("colors.scss"), "$c: red;").unwrap();
    let input_path = temp_dir.path().join("main.scss");
    fs::write(&input_path, "@import 'colors';\n$c: blue;\np { color: $c; }\n").unwrap();

    c.bench_function("bundle_from_disk", |b| {
        b.iter(|| {
            bundle_file(black_box(input_path.to_str().unwrap()), &CompilerOptions::default()).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_simple_compilation,
    bench_large_source_compilation,
    bench_bundle_from_disk
);
criterion_main!(benches);
