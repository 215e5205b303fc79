use std::fs::File;
use std::io::Read;

use tracing::info;

use crate::domain::{DiscoveredFile, Pack, PackEntry};
use crate::error::{CencError, Result, Stage};
use crate::util::path::join_stored;

/// Accumulates file contents into one buffer, recording where each lands.
#[derive(Debug, Default)]
pub struct PackBuilder {
    buffer: Vec<u8>,
    entries: Vec<PackEntry>,
}

impl PackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one discovered file fully and append it. Room for the size reported
    /// by the file's metadata is reserved up front and a failed reservation is
    /// an `Allocation` error; bytes beyond that size (a file growing while it
    /// is read) are appended with ordinary, infallible `Vec` growth.
    pub fn push_file(&mut self, file: &DiscoveredFile) -> Result<&PackEntry> {
        let path = join_stored(&file.dir, &file.name);
        let mut f = File::open(&path).map_err(|e| CencError::io(Stage::Read, &path, e))?;
        let size = f
            .metadata()
            .map_err(|e| CencError::io(Stage::Read, &path, e))?
            .len();
        let hint = usize::try_from(size).map_err(|_| CencError::Allocation {
            stage: Stage::Read,
            requested: usize::MAX,
        })?;
        self.reserve(hint)?;

        let offset = self.buffer.len();
        f.read_to_end(&mut self.buffer)
            .map_err(|e| CencError::io(Stage::Read, &path, e))?;
        let length = self.buffer.len() - offset;
        self.record(path, offset, length)
    }

    pub fn finish(self) -> Pack {
        info!(
            files = self.entries.len(),
            bytes = self.buffer.len(),
            "pack built"
        );
        Pack {
            buffer: self.buffer,
            entries: self.entries,
        }
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buffer
            .try_reserve(additional)
            .map_err(|_| CencError::Allocation {
                stage: Stage::Read,
                requested: additional,
            })?;
        self.entries
            .try_reserve(1)
            .map_err(|_| CencError::Allocation {
                stage: Stage::Read,
                requested: std::mem::size_of::<PackEntry>(),
            })
    }

    fn record(&mut self, path: String, offset: usize, length: usize) -> Result<&PackEntry> {
        self.entries.push(PackEntry {
            path,
            offset: offset as u64,
            length: length as u64,
        });
        // just pushed
        Ok(&self.entries[self.entries.len() - 1])
    }
}

/// Build a pack from a discovered-file sequence, stopping at the first error.
pub fn build<I>(discovered: I) -> Result<Pack>
where
    I: IntoIterator<Item = Result<DiscoveredFile>>,
{
    let mut builder = PackBuilder::new();
    for file in discovered {
        builder.push_file(&file?)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn discovered(dir: &std::path::Path, name: &str) -> Result<DiscoveredFile> {
        Ok(DiscoveredFile {
            dir: dir.to_str().unwrap().to_string(),
            name: name.to_string(),
        })
    }

    #[test]
    fn offsets_follow_input_order() {
        let td = tempfile::tempdir().unwrap();
        fs::write(td.path().join("one"), b"abc").unwrap();
        fs::write(td.path().join("two"), b"").unwrap();
        fs::write(td.path().join("three"), b"xy").unwrap();

        let pack = build(vec![
            discovered(td.path(), "one"),
            discovered(td.path(), "two"),
            discovered(td.path(), "three"),
        ])
        .unwrap();

        assert_eq!(pack.buffer, b"abcxy");
        let layout: Vec<_> = pack.entries.iter().map(|e| (e.offset, e.length)).collect();
        assert_eq!(layout, [(0, 3), (3, 0), (3, 2)]);
        for pair in pack.entries.windows(2) {
            assert_eq!(pair[0].end(), pair[1].offset);
        }
    }

    #[test]
    fn binary_content_is_kept_verbatim() {
        let td = tempfile::tempdir().unwrap();
        let bytes: Vec<u8> = (0..=255u8).chain([b'\r', b'\n', 0]).collect();
        fs::write(td.path().join("blob"), &bytes).unwrap();

        let pack = build(vec![discovered(td.path(), "blob")]).unwrap();
        assert_eq!(pack.entries.len(), 1);
        assert_eq!(pack.slice(&pack.entries[0]).unwrap(), &bytes[..]);
    }

    #[test]
    fn unreadable_file_carries_path() {
        let td = tempfile::tempdir().unwrap();
        let err = build(vec![discovered(td.path(), "gone")]).unwrap_err();
        match err {
            CencError::Io { stage, path, .. } => {
                assert_eq!(stage, Stage::Read);
                assert!(path.ends_with("gone"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn upstream_error_stops_build() {
        let td = tempfile::tempdir().unwrap();
        fs::write(td.path().join("one"), b"abc").unwrap();
        let err = build(vec![
            discovered(td.path(), "one"),
            Err(CencError::NotFound {
                path: td.path().join("missing"),
            }),
        ])
        .unwrap_err();
        assert!(matches!(err, CencError::NotFound { .. }));
    }

    #[test]
    fn push_returns_recorded_entry() {
        let td = tempfile::tempdir().unwrap();
        fs::write(td.path().join("a"), b"12").unwrap();
        fs::write(td.path().join("b"), b"345").unwrap();
        let mut b = PackBuilder::new();
        b.push_file(&discovered(td.path(), "a").unwrap()).unwrap();
        let e = b.push_file(&discovered(td.path(), "b").unwrap()).unwrap().clone();
        assert_eq!((e.offset, e.length), (2, 3));
        let pack = b.finish();
        assert_eq!(pack.slice(&e).unwrap(), b"345");
    }

    #[test]
    fn failed_reservation_is_allocation_error() {
        let mut b = PackBuilder::new();
        match b.reserve(usize::MAX).unwrap_err() {
            CencError::Allocation { stage, requested } => {
                assert_eq!(stage, Stage::Read);
                assert_eq!(requested, usize::MAX);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(b.finish().entries.is_empty());
    }
}
