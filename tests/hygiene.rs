//! Source hygiene checks for the canvas crate.
//!
//! Scans the production sources under `src/` for patterns that would crash the
//! page or swallow errors silently. Test files (`*_test.rs`) are exempt. Every
//! budget is zero; a failure lists the offending files.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`, excluding test files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Per-file count of lines containing `pattern`, skipping files named in `exempt`.
fn hits(files: &[SourceFile], pattern: &str, exempt: &[&str]) -> Vec<(String, usize)> {
    files
        .iter()
        .filter(|f| !exempt.iter().any(|e| f.path.ends_with(e)))
        .filter_map(|f| {
            let count = f.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (f.path.clone(), count))
        })
        .collect()
}

fn assert_absent(pattern: &str, exempt: &[&str], why: &str) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");
    let found = hits(&files, pattern, exempt);
    let listing = found.iter().map(|(p, c)| format!("  {p}: {c}")).collect::<Vec<_>>().join("\n");
    assert!(found.is_empty(), "`{pattern}` is not allowed in production code ({why}):\n{listing}");
}

// Panics crash the page.

#[test]
fn no_unwrap() {
    assert_absent(".unwrap()", &[], "propagate or log instead");
}

#[test]
fn no_expect() {
    assert_absent(".expect(", &[], "propagate or log instead");
}

#[test]
fn no_panic() {
    assert_absent("panic!(", &[], "commands degrade to no visual effect");
}

#[test]
fn no_unreachable() {
    assert_absent("unreachable!(", &[], "match exhaustively");
}

#[test]
fn no_todo_or_unimplemented() {
    assert_absent("todo!(", &[], "stubs crash at runtime");
    assert_absent("unimplemented!(", &[], "stubs crash at runtime");
}

// Silent loss hides failures.

#[test]
fn no_silent_discard() {
    assert_absent("let _ =", &[], "inspect the result");
}

#[test]
fn no_dot_ok() {
    assert_absent(".ok()", &[], "inspect the error");
}

#[test]
fn no_allow_dead_code() {
    assert_absent("#[allow(dead_code)]", &[], "delete unused code");
}

// Logging goes through the `log` facade; only the mount touches the console directly.

#[test]
fn console_only_in_mount() {
    assert_absent("web_sys::console", &["mount.rs"], "use log macros");
}
