//! Map emitters: serialize the entry table so a loader can slice the pack by
//! path. Each format writes entries in table order.

use crate::domain::PackEntry;
use crate::error::{CencError, Result, Stage};
use std::io::Write;
use std::path::Path;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapFormat {
    /// C source: a struct array terminated by a null sentinel.
    #[default]
    C,
    /// Lua chunk returning an array of `{ path, offset, length }` tables.
    Lua,
    /// JSON document with the entry array and total pack length.
    Json,
}

impl MapFormat {
    pub fn extension(self) -> &'static str {
        match self {
            MapFormat::C => "h",
            MapFormat::Lua => "lua",
            MapFormat::Json => "json",
        }
    }
}

pub trait MapEmitter {
    fn format(&self) -> MapFormat;
    /// Write the whole table to `dst`.
    fn emit(&self, entries: &[PackEntry], dst: &mut dyn Write) -> std::io::Result<()>;
}

pub fn emitter(format: MapFormat, symbol: &str) -> Result<Box<dyn MapEmitter>> {
    Ok(match format {
        MapFormat::C => Box::new(c::CTable::new(symbol)?),
        MapFormat::Lua => Box::new(lua::LuaTable::new(symbol)?),
        MapFormat::Json => Box::new(json::JsonTable),
    })
}

/// Serialize `entries` to memory.
pub fn emit(emitter: &dyn MapEmitter, entries: &[PackEntry]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    emitter
        .emit(entries, &mut out)
        .map_err(|e| CencError::io(Stage::Map, "<memory>", e))?;
    Ok(out)
}

/// Serialize `entries` into the file at `out`, replacing it.
pub fn emit_to_file(emitter: &dyn MapEmitter, entries: &[PackEntry], out: &Path) -> Result<()> {
    let bytes = emit(emitter, entries)?;
    std::fs::write(out, bytes).map_err(|e| CencError::io(Stage::Write, out, e))
}

/// Symbols shared by the C and Lua emitters must be plain identifiers.
pub fn validate_symbol(symbol: &str) -> Result<()> {
    let mut chars = symbol.chars();
    let ok = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(CencError::Config(format!(
            "map symbol {symbol:?} is not a valid identifier"
        )))
    }
}

pub mod c;
pub mod json;
pub mod lua;
