// cenc_core/src/domain.rs
use serde::Serialize;

/// One file found by discovery: containing directory and file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub dir: String,
    pub name: String,
}

/// Where one packed file lives inside the pack buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackEntry {
    pub path: String,
    pub offset: u64,
    pub length: u64,
}

impl PackEntry {
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Concatenated file contents plus the table describing them.
#[derive(Clone, Debug, Default)]
pub struct Pack {
    pub buffer: Vec<u8>,
    pub entries: Vec<PackEntry>,
}

impl Pack {
    /// Bytes of one entry; `None` if the entry lies outside the buffer.
    pub fn slice(&self, entry: &PackEntry) -> Option<&[u8]> {
        let start = usize::try_from(entry.offset).ok()?;
        let end = usize::try_from(entry.end()).ok()?;
        self.buffer.get(start..end)
    }
}
