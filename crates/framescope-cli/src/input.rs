//! Input and output path checks run before any capture bytes are read.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CliError;

const CAPTURE_HINT: &str = "pass the path to a pcap or pcapng capture";

/// Expand `input` when it contains glob metacharacters. The pattern must
/// name exactly one regular file.
pub fn resolve(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !pattern.contains(['*', '?', '[']) {
        return Ok(input.to_path_buf());
    }

    let entries = glob::glob(&pattern).map_err(|err| {
        CliError::new(format!("invalid input pattern '{pattern}': {}", err.msg))
            .hint("quote the pattern and check its brackets")
    })?;
    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| {
            CliError::new(format!("cannot expand '{pattern}': {err}"))
                .hint("check directory permissions")
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() > 1 {
        let shown: Vec<String> = matches
            .iter()
            .take(3)
            .map(|path| path.display().to_string())
            .collect();
        let ellipsis = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(format!(
            "multiple files match pattern '{pattern}' ({} matches): {}{ellipsis}",
            matches.len(),
            shown.join(", ")
        ))
        .hint("pass a single capture file, or run once per file"));
    }
    matches.pop().ok_or_else(|| {
        CliError::new(format!("no files match pattern '{pattern}'"))
            .hint("check the path or quote the pattern")
    })
}

/// The input must exist and be a regular file. The container format is
/// detected from content later, so the extension is not checked.
pub fn ensure_regular_file(input: &Path) -> Result<(), CliError> {
    match fs::metadata(input) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(
            CliError::new(format!("input is not a file: {}", input.display())).hint(CAPTURE_HINT),
        ),
        Err(_) => Err(
            CliError::new(format!("input file not found: {}", input.display())).hint(CAPTURE_HINT),
        ),
    }
}

/// Reject a report path that resolves to the input capture.
pub fn ensure_distinct_output(report: &Path, input_abs: &Path) -> Result<(), CliError> {
    let Some(file_name) = report.file_name() else {
        return Err(CliError::new(format!(
            "invalid report path: {}",
            report.display()
        )));
    };
    let dir = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A directory that does not exist yet cannot hold the input.
    let Ok(dir) = fs::canonicalize(dir) else {
        return Ok(());
    };
    if dir.join(file_name) == input_abs {
        return Err(CliError::new(format!(
            "report path must differ from input: {}",
            report.display()
        ))
        .hint("choose a different output path"));
    }
    Ok(())
}
