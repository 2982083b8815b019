//! Path utilities for safe file system operations.
//!
//! Remote listings decide where files land on disk, so every relative path
//! is checked before it is joined onto a cache or assets root.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::error::{ImportmapError, ImportmapResult};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {},
            Utf8Component::ParentDir => {
                // Keep a leading .. so escaping stays visible
                if components.is_empty() {
                    components.push(component);
                } else {
                    components.pop();
                }
            },
            other => components.push(other),
        }
    }

    components.iter().collect()
}

/// Check if a path is safe (relative and never climbs above its base)
pub fn is_safe_path(path: &Utf8Path) -> bool {
    if path.is_absolute() {
        return false;
    }

    let mut depth = 0i32;

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {},
            Utf8Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            },
            Utf8Component::Normal(_) => depth += 1,
            _ => return false,
        }
    }

    true
}

/// Strip leading `/` so listing paths can be joined onto a root
pub fn trim_leading_slash(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Safely join a listing path onto `base`, preventing directory traversal
pub fn safe_join(base: &Utf8Path, relative: &str) -> ImportmapResult<Utf8PathBuf> {
    let relative = Utf8Path::new(trim_leading_slash(relative));
    if relative.as_str().is_empty() || !is_safe_path(relative) {
        return Err(ImportmapError::InvalidPath {
            path: relative.to_string(),
        });
    }

    Ok(base.join(normalize_path(relative)))
}

/// Turn a local path into something a browser can load.
///
/// Paths that already look like URLs (first byte `h`, as in `http`) are left
/// alone; everything else is made root-relative with a leading `/`.
pub fn to_url_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with('h') || path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Utf8Path::new("./dist/../lib/./file.js");
        assert_eq!(normalize_path(path), Utf8Path::new("lib/file.js"));
    }

    #[test]
    fn test_is_safe_path() {
        assert!(is_safe_path(Utf8Path::new("dist/htmx.min.js")));
        assert!(is_safe_path(Utf8Path::new("./dist/htmx.min.js")));
        assert!(!is_safe_path(Utf8Path::new("../../../etc/passwd")));
        assert!(!is_safe_path(Utf8Path::new("/absolute/path")));
    }

    #[test]
    fn test_safe_join() {
        let base = Utf8Path::new("/srv/assets/htmx");

        let joined = safe_join(base, "/ext/json-enc.js").unwrap();
        assert_eq!(joined, Utf8Path::new("/srv/assets/htmx/ext/json-enc.js"));

        assert!(safe_join(base, "../../../etc/passwd").is_err());
        assert!(safe_join(base, "/").is_err());
    }

    #[test]
    fn test_to_url_path() {
        assert_eq!(to_url_path("assets/htmx/htmx.min.js"), "/assets/htmx/htmx.min.js");
        assert_eq!(to_url_path("/assets/htmx/htmx.min.js"), "/assets/htmx/htmx.min.js");
        assert_eq!(
            to_url_path("https://cdn.example.com/htmx.min.js"),
            "https://cdn.example.com/htmx.min.js"
        );
    }
}
