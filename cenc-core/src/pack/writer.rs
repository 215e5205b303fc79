use crate::crypto::ctr::{CipherVariant, Sealer};
use crate::crypto::key::KeyProvider;
use crate::domain::Pack;
use crate::error::{CencError, KeyError, Result, Stage};
use crate::map::{self, MapFormat};
use crate::pack::builder::build;
use crate::pack::walker::discover_all;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_MAP_SYMBOL: &str = "cenc_map";

#[derive(Clone, Debug)]
pub struct PackOptions {
    /// Sort directory entries by name during discovery. Off by default, which
    /// leaves pack layout in filesystem listing order.
    pub sort: bool,
    pub map_format: MapFormat,
    /// Identifier for source-level map formats.
    pub map_symbol: String,
    pub cipher: CipherVariant,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            sort: false,
            map_format: MapFormat::default(),
            map_symbol: DEFAULT_MAP_SYMBOL.to_string(),
            cipher: CipherVariant::default(),
        }
    }
}

/// Where each artifact of a run is written.
#[derive(Clone, Debug)]
pub struct PackOutputs {
    pub plain: PathBuf,
    pub map: PathBuf,
    /// `None` skips encryption.
    pub sealed: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackReport {
    pub files: usize,
    pub bytes: u64,
    pub sealed: bool,
}

/// Create or truncate `out` and write `buf` verbatim.
pub fn write_pack(buf: &[u8], out: &Path) -> Result<()> {
    let mut f = File::create(out).map_err(|e| CencError::io(Stage::Write, out, e))?;
    f.write_all(buf)
        .and_then(|()| f.flush())
        .map_err(|e| CencError::io(Stage::Write, out, e))?;
    info!(path = %out.display(), bytes = buf.len(), "wrote");
    Ok(())
}

/// Discover every input in order and build the pack in memory.
pub fn collect_inputs(inputs: &[&Path], sort: bool) -> Result<Pack> {
    if inputs.is_empty() {
        return Err(CencError::Config("no inputs given".into()));
    }
    let pack = build(discover_all(inputs.iter().copied(), sort))?;
    if pack.entries.is_empty() {
        warn!("no files found; pack is empty");
    }
    Ok(pack)
}

/// Run the whole pipeline. Nothing is written until discovery, reading and
/// key validation have all succeeded; a failure while writing leaves earlier
/// artifacts on disk.
pub fn pack(
    inputs: &[&Path],
    outputs: &PackOutputs,
    opts: Option<&PackOptions>,
    keys: Option<&dyn KeyProvider>,
) -> Result<PackReport> {
    let defaults = PackOptions::default();
    let opts = opts.unwrap_or(&defaults);
    let emitter = map::emitter(opts.map_format, &opts.map_symbol)?;

    let sealer = match (&outputs.sealed, keys) {
        (Some(_), Some(provider)) => Some(Sealer::fetch(opts.cipher, provider)?),
        (Some(_), None) => {
            return Err(KeyError::Missing("no key source configured".into()).into());
        }
        (None, _) => None,
    };

    let Pack {
        mut buffer,
        entries,
    } = collect_inputs(inputs, opts.sort)?;
    info!(files = entries.len(), bytes = buffer.len(), "total files");

    write_pack(&buffer, &outputs.plain)?;
    map::emit_to_file(emitter.as_ref(), &entries, &outputs.map)?;
    info!(path = %outputs.map.display(), format = ?emitter.format(), "wrote map");

    let sealed = match (sealer, &outputs.sealed) {
        (Some(sealer), Some(out)) => {
            sealer.apply(&mut buffer)?;
            write_pack(&buffer, out)?;
            true
        }
        _ => false,
    };

    Ok(PackReport {
        files: entries.len(),
        bytes: buffer.len() as u64,
        sealed,
    })
}
