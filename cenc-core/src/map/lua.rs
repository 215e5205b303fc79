use super::{MapEmitter, MapFormat, validate_symbol};
use crate::domain::PackEntry;
use crate::error::{CencError, Result};
use std::fmt::Write as _;
use std::io::Write;

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Lua chunk: `local <symbol> = { ... } return <symbol>`.
pub struct LuaTable {
    symbol: String,
}

impl LuaTable {
    pub fn new(symbol: &str) -> Result<Self> {
        validate_symbol(symbol)?;
        if LUA_KEYWORDS.contains(&symbol) {
            return Err(CencError::Config(format!(
                "map symbol {symbol:?} is a Lua keyword"
            )));
        }
        Ok(Self {
            symbol: symbol.to_string(),
        })
    }
}

/// Quote `s` as a Lua string literal using three-digit decimal escapes.
pub fn lua_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{b:03}");
            }
        }
    }
    out.push('"');
    out
}

impl MapEmitter for LuaTable {
    fn format(&self) -> MapFormat {
        MapFormat::Lua
    }

    fn emit(&self, entries: &[PackEntry], dst: &mut dyn Write) -> std::io::Result<()> {
        let sym = &self.symbol;
        writeln!(dst, "-- generated by cenc: {} entries", entries.len())?;
        writeln!(dst, "local {sym} = {{")?;
        for e in entries {
            writeln!(
                dst,
                "  {{ path = {}, offset = {}, length = {} }},",
                lua_string(&e.path),
                e.offset,
                e.length
            )?;
        }
        writeln!(dst, "}}")?;
        writeln!(dst, "return {sym}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::emit;

    #[test]
    fn escapes_are_three_digit_decimal() {
        assert_eq!(lua_string("a\nb"), "\"a\\010b\"");
        assert_eq!(lua_string("q\"\\"), "\"q\\\"\\\\\"");
        assert_eq!(lua_string("ü1"), "\"\\195\\1881\"");
    }

    #[test]
    fn emits_ordered_rows() {
        let entries = vec![
            PackEntry {
                path: "data/z.png".into(),
                offset: 0,
                length: 10,
            },
            PackEntry {
                path: "data/a.png".into(),
                offset: 10,
                length: 4,
            },
        ];
        let out = String::from_utf8(emit(&LuaTable::new("files").unwrap(), &entries).unwrap()).unwrap();
        let expected = "-- generated by cenc: 2 entries\n\
                        local files = {\n  \
                        { path = \"data/z.png\", offset = 0, length = 10 },\n  \
                        { path = \"data/a.png\", offset = 10, length = 4 },\n\
                        }\n\
                        return files\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn keyword_symbol_is_rejected() {
        assert!(matches!(LuaTable::new("end"), Err(CencError::Config(_))));
    }
}
