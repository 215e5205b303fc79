use super::{MapEmitter, MapFormat, validate_symbol};
use crate::domain::PackEntry;
use crate::error::{CencError, Result};
use std::fmt::Write as _;
use std::io::Write;

// C11 keywords; a table named after one would not compile.
const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Atomic",
    "_Bool", "_Complex", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

/// Header declaring `static const struct <symbol>_entry <symbol>[]`.
pub struct CTable {
    symbol: String,
}

impl CTable {
    pub fn new(symbol: &str) -> Result<Self> {
        validate_symbol(symbol)?;
        if C_KEYWORDS.contains(&symbol) {
            return Err(CencError::Config(format!(
                "map symbol {symbol:?} is a C keyword"
            )));
        }
        Ok(Self {
            symbol: symbol.to_string(),
        })
    }
}

/// Quote `s` as a C string literal. Octal escapes are always three digits so
/// a following digit can never be absorbed into them.
pub fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            // `??x` would be read as a trigraph
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out.push('"');
    out
}

impl MapEmitter for CTable {
    fn format(&self) -> MapFormat {
        MapFormat::C
    }

    fn emit(&self, entries: &[PackEntry], dst: &mut dyn Write) -> std::io::Result<()> {
        let sym = &self.symbol;
        let guard = format!("{}_H", sym.to_ascii_uppercase());
        let total = entries.last().map(PackEntry::end).unwrap_or(0);

        writeln!(dst, "/* generated by cenc: {} entries, {total} bytes */", entries.len())?;
        writeln!(dst, "#ifndef {guard}")?;
        writeln!(dst, "#define {guard}")?;
        writeln!(dst)?;
        writeln!(dst, "#include <stddef.h>")?;
        writeln!(dst)?;
        writeln!(dst, "struct {sym}_entry {{")?;
        writeln!(dst, "\tconst char *path;")?;
        writeln!(dst, "\tsize_t offset;")?;
        writeln!(dst, "\tsize_t length;")?;
        writeln!(dst, "}};")?;
        writeln!(dst)?;
        writeln!(dst, "static const struct {sym}_entry {sym}[] = {{")?;
        for e in entries {
            writeln!(dst, "\t{{ {}, {}, {} }},", c_string(&e.path), e.offset, e.length)?;
        }
        writeln!(dst, "\t{{ NULL, 0, 0 }}")?;
        writeln!(dst, "}};")?;
        writeln!(dst)?;
        writeln!(dst, "static const size_t {sym}_count = {};", entries.len())?;
        writeln!(dst, "static const size_t {sym}_size = {total};")?;
        writeln!(dst)?;
        writeln!(dst, "#endif /* {guard} */")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::emit;

    #[test]
    fn escapes_special_bytes() {
        assert_eq!(c_string("root/a.txt"), "\"root/a.txt\"");
        assert_eq!(c_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(c_string("what??!"), "\"what\\?\\?!\"");
        assert_eq!(c_string("tab\there1"), "\"tab\\011here1\"");
        assert_eq!(c_string("é"), "\"\\303\\251\"");
    }

    #[test]
    fn table_rows_match_entries() {
        let entries = vec![
            PackEntry {
                path: "root/a.txt".into(),
                offset: 0,
                length: 3,
            },
            PackEntry {
                path: "root/sub/b.txt".into(),
                offset: 3,
                length: 2,
            },
        ];
        let out = String::from_utf8(emit(&CTable::new("assets").unwrap(), &entries).unwrap()).unwrap();
        assert!(out.contains("static const struct assets_entry assets[] = {"));
        let rows: Vec<_> = out.lines().filter(|l| l.starts_with("\t{ ")).collect();
        assert_eq!(
            rows,
            [
                "\t{ \"root/a.txt\", 0, 3 },",
                "\t{ \"root/sub/b.txt\", 3, 2 },",
                "\t{ NULL, 0, 0 }",
            ]
        );
        assert!(out.contains("static const size_t assets_count = 2;"));
        assert!(out.contains("static const size_t assets_size = 5;"));
        assert!(out.contains("#ifndef ASSETS_H"));
    }

    #[test]
    fn rejects_bad_symbol() {
        assert!(CTable::new("9lives").is_err());
        assert!(CTable::new("has-dash").is_err());
        assert!(CTable::new("").is_err());
    }

    #[test]
    fn keyword_symbol_is_rejected() {
        for kw in ["int", "static", "struct", "_Bool"] {
            assert!(matches!(CTable::new(kw), Err(CencError::Config(_))), "{kw}");
        }
        assert!(CTable::new("int_table").is_ok());
    }
}
