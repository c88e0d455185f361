//! Binary to generate/update .expected.py and .expected.err files
//!
//! Usage:
//!   cargo run --bin accept_expected              # Update all
//!   cargo run --bin accept_expected -- nested    # Update only fixtures matching "nested"

use double_indent::Pipeline;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&test_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| is_fixture(e.path()))
    {
        let path = entry.path();
        let path_str = path.to_string_lossy();

        if let Some(ref f) = filter {
            if !path_str.contains(f) {
                skipped += 1;
                continue;
            }
        }

        process_file(path);
        updated += 1;
    }

    println!("Updated {} files, skipped {}", updated, skipped);
}

/// Fixture inputs are `.py` files under cases/ or errors/ that are not outputs themselves
fn is_fixture(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    path.extension().is_some_and(|ext| ext == "py")
        && !path_str.ends_with(".expected.py")
        && (path_str.contains("/cases/") || path_str.contains("/errors/"))
}

fn process_file(path: &Path) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {:?}: {}", path, e);
            return;
        }
    };

    let is_error_test = path.to_string_lossy().contains("/errors/");
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or("unknown");

    match Pipeline::default().run(&source) {
        Ok(result) if !is_error_test => {
            let expected_py = path.with_extension("expected.py");
            if let Err(e) = fs::write(&expected_py, &result.code) {
                eprintln!("Failed to write {:?}: {}", expected_py, e);
            } else {
                println!("  wrote {}", expected_py.display());
            }
        }
        Ok(_) => {
            eprintln!("ERROR: {:?} is in errors/ but was rewritten without error", path);
        }
        Err(e) if is_error_test => {
            let expected_err = path.with_extension("expected.err");
            if let Err(err) = fs::write(&expected_err, e.render(&source, filename)) {
                eprintln!("Failed to write {:?}: {}", expected_err, err);
            } else {
                println!("  wrote {}", expected_err.display());
            }
        }
        Err(e) => {
            eprintln!("ERROR: {:?} failed but is not in errors/: {}", path, e);
        }
    }
}
