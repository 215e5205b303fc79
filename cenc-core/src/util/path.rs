use std::path::{Path, is_separator};

use crate::error::{CencError, Result, Stage};

/// Separator used in stored paths, independent of the host platform.
pub const STORED_SEPARATOR: char = '/';

/// Strip a single trailing separator so `data/` and `data` compare equal.
/// A lone separator (filesystem root) is left intact.
pub fn normalize(path: &str) -> &str {
    match path.chars().next_back() {
        Some(c) if is_separator(c) && path.len() > c.len_utf8() => &path[..path.len() - c.len_utf8()],
        _ => path,
    }
}

/// Join a containing directory and a file name into the stored path.
pub fn join_stored(dir: &str, name: &str) -> String {
    let mut out = String::with_capacity(dir.len() + 1 + name.len());
    out.push_str(dir);
    if !dir.ends_with(is_separator) {
        out.push(STORED_SEPARATOR);
    }
    out.push_str(name);
    out
}

/// Borrow a path as UTF-8; stored paths are strings.
pub fn utf8(stage: Stage, path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        CencError::io(
            stage,
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_trailing_separator() {
        assert_eq!(normalize("data/"), "data");
        assert_eq!(normalize("data//"), "data/");
        assert_eq!(normalize("data"), "data");
        assert_eq!(normalize("a/b/c.txt"), "a/b/c.txt");
    }

    #[test]
    fn keeps_root_and_empty() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn join_uses_single_separator() {
        assert_eq!(join_stored("root", "a.txt"), "root/a.txt");
        assert_eq!(join_stored("root/sub", "b.txt"), "root/sub/b.txt");
        assert_eq!(join_stored("/", "etc"), "/etc");
    }
}
