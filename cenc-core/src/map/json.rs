use super::{MapEmitter, MapFormat};
use crate::domain::PackEntry;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct MapDocument<'a> {
    size: u64,
    entries: &'a [PackEntry],
}

pub struct JsonTable;

impl MapEmitter for JsonTable {
    fn format(&self) -> MapFormat {
        MapFormat::Json
    }

    fn emit(&self, entries: &[PackEntry], dst: &mut dyn Write) -> std::io::Result<()> {
        let doc = MapDocument {
            size: entries.last().map(PackEntry::end).unwrap_or(0),
            entries,
        };
        serde_json::to_writer_pretty(&mut *dst, &doc)?;
        writeln!(dst)
    }
}
