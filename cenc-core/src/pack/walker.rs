//! Recursive input discovery.
//!
//! A root directory is walked depth-first: a regular file is yielded when its
//! entry is reached, a subdirectory is descended into before the walk moves on
//! to its siblings. `walkdir` keeps its own stack of open directories, so deep
//! trees do not grow the call stack.
//!
//! Sibling order is whatever the platform's directory listing returns unless
//! `sort` is set, in which case entries are sorted by file name at every
//! level. Symlinks are not followed below the root and are never packed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::DiscoveredFile;
use crate::error::{CencError, Result, Stage};
use crate::util::path::{join_stored, normalize, utf8};

/// Lazy, one-shot walk over a single root.
pub struct Discovery {
    root: PathBuf,
    inner: walkdir::IntoIter,
    found: u64,
    done: bool,
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("root", &self.root)
            .field("found", &self.found)
            .finish()
    }
}

/// Start discovering files under `root`, which may be a directory or a single
/// file. Fails with `NotFound` when it is neither.
pub fn discover(root: &Path, sort: bool) -> Result<Discovery> {
    let root = PathBuf::from(normalize(utf8(Stage::Discovery, root)?));
    match fs::metadata(&root) {
        Ok(md) if md.is_dir() || md.is_file() => {}
        Ok(_) => return Err(CencError::NotFound { path: root }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CencError::NotFound { path: root });
        }
        Err(e) => return Err(CencError::io(Stage::Discovery, root, e)),
    }

    let mut walk = WalkDir::new(&root).follow_links(false).follow_root_links(true);
    if sort {
        walk = walk.sort_by_file_name();
    }
    Ok(Discovery {
        root,
        inner: walk.into_iter(),
        found: 0,
        done: false,
    })
}

/// Discover every root in caller order, concatenating the results. Each root
/// is checked for existence only when the walk reaches it.
pub fn discover_all<I, P>(roots: I, sort: bool) -> impl Iterator<Item = Result<DiscoveredFile>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    roots
        .into_iter()
        .flat_map(move |root| -> Box<dyn Iterator<Item = Result<DiscoveredFile>>> {
            match discover(root.as_ref(), sort) {
                Ok(d) => Box::new(d),
                Err(e) => Box::new(std::iter::once(Err(e))),
            }
        })
}

impl Discovery {
    fn split(&self, path: &Path) -> Result<DiscoveredFile> {
        let name = path
            .file_name()
            .map(Path::new)
            .ok_or_else(|| CencError::NotFound {
                path: path.to_path_buf(),
            })?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => utf8(Stage::Discovery, p)?,
            _ => ".",
        };
        Ok(DiscoveredFile {
            dir: dir.to_string(),
            name: utf8(Stage::Discovery, name)?.to_string(),
        })
    }
}

impl Iterator for Discovery {
    type Item = Result<DiscoveredFile>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let entry = match self.inner.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    self.done = true;
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                    return Some(Err(CencError::io(Stage::Discovery, path, e.into())));
                }
                None => {
                    self.done = true;
                    if self.found == 0 {
                        warn!(root = %self.root.display(), "input contributed no files");
                    }
                    return None;
                }
            };
            // Directories are descended into by walkdir; links and special files
            // are skipped below the root. The root itself was resolved in `discover`.
            let is_file = if entry.depth() == 0 && entry.path_is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(md) => md.is_file(),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(CencError::io(Stage::Discovery, entry.path(), e)));
                    }
                }
            } else {
                entry.file_type().is_file()
            };
            if !is_file {
                continue;
            }
            let file = self.split(entry.path());
            if let Ok(f) = &file {
                self.found += 1;
                debug!(path = %join_stored(&f.dir, &f.name), "file found");
            } else {
                self.done = true;
            }
            return Some(file);
        }
    }
}
