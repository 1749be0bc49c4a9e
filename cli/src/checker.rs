use std::path::{Path, PathBuf};

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use nobook::parser::has_block_markers;
use nobook::{DecodeError, Encoder, Parser};

pub enum CheckOutcome {
    Pass { blocks: usize },
    Fail(Failure),
}

pub enum Failure {
    /// The file does not decode; shown as a source diagnostic.
    Decode(DecodeError),
    Other(String),
}

pub struct CheckResult {
    pub path: PathBuf,
    pub outcome: CheckOutcome,
}

/// Decode one file strictly and confirm that re-encoding it is stable.
fn check_source(source: &str, file_id: usize, encoder: &Encoder) -> CheckOutcome {
    let document = match Parser::new(source.to_string(), file_id).parse() {
        Ok(doc) => doc,
        Err(err) => return CheckOutcome::Fail(Failure::Decode(err)),
    };

    let encoded = encoder.encode_document(&document);
    let redecoded = match Parser::new(encoded.clone(), file_id).parse() {
        Ok(doc) => doc,
        Err(err) => {
            return CheckOutcome::Fail(Failure::Other(format!(
                "re-encoded text does not decode: {}",
                err
            )));
        }
    };

    if redecoded.block_names() != document.block_names() {
        return CheckOutcome::Fail(Failure::Other(format!(
            "block names changed on re-encode\n  before: {}\n  after:  {}",
            document.block_names().join(", "),
            redecoded.block_names().join(", ")
        )));
    }

    let reencoded = encoder.encode_document(&redecoded);
    if reencoded != encoded {
        return CheckOutcome::Fail(Failure::Other(
            "encoding is not stable: a second pass changed the text".into(),
        ));
    }

    CheckOutcome::Pass {
        blocks: document.blocks.len(),
    }
}

fn check_file(path: &Path, files: &mut SimpleFiles<String, String>, encoder: &Encoder) -> CheckResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            return CheckResult {
                path: path.to_path_buf(),
                outcome: CheckOutcome::Fail(Failure::Other(format!("cannot read file: {}", e))),
            };
        }
    };
    let file_id = files.add(path.display().to_string(), source.clone());
    CheckResult {
        path: path.to_path_buf(),
        outcome: check_source(&source, file_id, encoder),
    }
}

/// Find `.py` files under `root` that contain at least one marker, sorted.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_sources(root, &mut found);
    found.sort();
    found
}

fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "py") {
            match std::fs::read_to_string(&path) {
                Ok(text) if has_block_markers(&text) => out.push(path),
                Ok(_) => log::debug!("skipping {} (no block markers)", path.display()),
                Err(e) => log::warn!("skipping {}: {}", path.display(), e),
            }
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

/// Check a single file or every marked `.py` file under a directory.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_checks(path: &Path, no_color: bool, encoder: &Encoder) -> i32 {
    let targets = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover(path)
    };

    if targets.is_empty() {
        eprintln!("no .py files with block markers found in {}", path.display());
        return 1;
    }

    let mut files = SimpleFiles::new();
    let mut passed = 0usize;
    let mut failures: Vec<CheckResult> = Vec::new();

    for target in &targets {
        let result = check_file(target, &mut files, encoder);
        match &result.outcome {
            CheckOutcome::Pass { blocks } => {
                passed += 1;
                eprintln!("  {}  {} ({} blocks)", pass_label(no_color), target.display(), blocks);
            }
            CheckOutcome::Fail(_) => {
                eprintln!("  {}  {}", fail_label(no_color), target.display());
                failures.push(result);
            }
        }
    }

    if !failures.is_empty() {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        let writer = StandardStream::stderr(color_choice);
        let config = term::Config::default();

        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            match &failure.outcome {
                CheckOutcome::Fail(Failure::Decode(err)) => {
                    let _ = term::emit_to_write_style(
                        &mut writer.lock(),
                        &config,
                        &files,
                        &err.to_diagnostic(),
                    );
                }
                CheckOutcome::Fail(Failure::Other(reason)) => {
                    for line in reason.lines() {
                        eprintln!("  {}", line);
                    }
                }
                CheckOutcome::Pass { .. } => {}
            }
        }
    }

    let failed = failures.len();
    eprintln!();
    if failed == 0 {
        eprintln!("check result: ok. {} passed, 0 failed", passed);
        0
    } else {
        eprintln!(
            "check result: FAILED. {} passed, {} failed (of {})",
            passed,
            failed,
            passed + failed
        );
        1
    }
}
