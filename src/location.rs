//! Ties module info, the declaration locator and the relativizer together
//! for reporters that start from a package import path.

use serde::Serialize;
use std::path::PathBuf;
use tracing::trace;

use crate::locator::find_declaration;
use crate::module_info::ModuleInfo;
use crate::paths::relativize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestLocation {
    pub file: PathBuf,
    /// `file` relative to the checkout root, slash separated.
    pub relative_file: String,
    pub found: bool,
}

/// Directory of `import_path` when it belongs to the module in `info`.
pub fn package_dir(info: &ModuleInfo, import_path: &str) -> Option<PathBuf> {
    if info.module_path.is_empty() || info.module_dir.is_empty() {
        return None;
    }

    let rest = import_path.strip_prefix(info.module_path.as_str())?;
    let mut dir = PathBuf::from(&info.module_dir);

    if rest.is_empty() {
        return Some(dir);
    }

    let rest = rest.strip_prefix('/')?;
    dir.extend(rest.split('/').filter(|segment| !segment.is_empty()));
    Some(dir)
}

pub struct TestLocator {
    info: ModuleInfo,
}

impl TestLocator {
    pub fn new(info: ModuleInfo) -> Self {
        Self { info }
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    /// Locate `test_name` in package `import_path`. Packages outside the
    /// module are searched as a directory named by the import path itself.
    pub fn locate(&self, import_path: &str, test_name: &str) -> TestLocation {
        let dir = package_dir(&self.info, import_path).unwrap_or_else(|| {
            trace!(import_path, "package is outside the module");
            PathBuf::from(import_path)
        });

        let outcome = find_declaration(&dir, test_name);
        let found = outcome.is_found();
        let file = outcome.into_path_or(&dir);
        let relative_file = relativize(&self.info.root_dir, &file.to_string_lossy());

        TestLocation {
            file,
            relative_file,
            found,
        }
    }
}
