use std::path::{Component, Path, PathBuf};

/// `path` relative to `base_path`, always with `/` separators.
///
/// Both paths are cleaned lexically first. An empty base, or a pair of paths
/// that cannot be related (one absolute and one relative, or a cleaned base
/// that climbs further with `..` than the target), returns `path` unchanged.
pub fn relativize(base_path: &str, path: &str) -> String {
    if base_path.is_empty() {
        return path.to_string();
    }

    let base = clean(Path::new(base_path));
    let target = clean(Path::new(path));

    if base.is_absolute() != target.is_absolute() {
        return path.to_string();
    }

    match pathdiff::diff_paths(without_cur_dir(&target), without_cur_dir(&base)) {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => to_slash(&relative),
        None => path.to_string(),
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` above the root is dropped; leading `..` in a relative path is kept.
/// An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

fn without_cur_dir(path: &Path) -> &Path {
    if path == Path::new(".") {
        Path::new("")
    } else {
        path
    }
}

/// Join the components of `path` with `/` regardless of the host separator.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => {
                if out.is_empty() {
                    out.push('/');
                }
                continue;
            }
            Component::Prefix(prefix) => {
                out.push_str(&prefix.as_os_str().to_string_lossy());
                continue;
            }
            _ => {}
        }

        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}
