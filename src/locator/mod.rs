//! Declaration locator.
//!
//! Walks a package directory and returns the first `.go` file that declares
//! a top-level function named after the test. Matching is by name only.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::IoError;

mod declarations;

pub use declarations::{GoSource, GoSourceParser, FUNCTION_DECLARATION_KINDS};

pub const GO_SOURCE_EXTENSION: &str = "go";

const SUBTEST_SEPARATOR: char = '/';

#[derive(Debug)]
pub enum LocateOutcome {
    Found(PathBuf),
    NotFound,
    /// The walk root itself could not be read.
    IoError(IoError),
}

impl LocateOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LocateOutcome::Found(_))
    }

    /// The found file, or `fallback` for any other outcome.
    pub fn into_path_or(self, fallback: &Path) -> PathBuf {
        match self {
            LocateOutcome::Found(path) => path,
            LocateOutcome::NotFound | LocateOutcome::IoError(_) => fallback.to_path_buf(),
        }
    }
}

/// Strip subtest segments: `TestFoo/case_1` declares as `TestFoo`.
pub fn normalize_test_name(test_name: &str) -> &str {
    match test_name.split_once(SUBTEST_SEPARATOR) {
        Some((top_level, _)) => top_level,
        None => test_name,
    }
}

/// Path of the file declaring `test_name` under `package_dir`, or
/// `package_dir` itself when none can be found.
pub fn locate(package_dir: &Path, test_name: &str) -> PathBuf {
    find_declaration(package_dir, test_name).into_path_or(package_dir)
}

pub fn find_declaration(package_dir: &Path, test_name: &str) -> LocateOutcome {
    let name = normalize_test_name(test_name);

    if let Err(e) = check_root(package_dir) {
        debug!(package_dir = %package_dir.display(), error = %e, "cannot walk package directory");
        return LocateOutcome::IoError(e);
    }

    if name.is_empty() {
        return LocateOutcome::NotFound;
    }

    let mut parser = match GoSourceParser::new() {
        Ok(parser) => parser,
        Err(e) => {
            warn!(error = %e, "go parser unavailable");
            return LocateOutcome::NotFound;
        }
    };

    for entry in WalkDir::new(package_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let e = IoError::walk_error(package_dir, e);
                trace!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_dir() || !has_go_extension(entry.path()) {
            continue;
        }

        match parser.parse_file(entry.path()) {
            Ok(source) if source.declares_function(name) => {
                debug!(test = name, file = %entry.path().display(), "found declaration");
                return LocateOutcome::Found(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "skipping file"),
        }
    }

    trace!(test = name, package_dir = %package_dir.display(), "no declaration found");
    LocateOutcome::NotFound
}

fn check_root(root: &Path) -> Result<(), IoError> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IoError::path_not_found(root),
        _ => IoError::directory_unreadable(root, e),
    })?;

    if metadata.is_dir() {
        fs::read_dir(root).map_err(|e| IoError::directory_unreadable(root, e))?;
    }

    Ok(())
}

fn has_go_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == GO_SOURCE_EXTENSION)
        .unwrap_or(false)
}
