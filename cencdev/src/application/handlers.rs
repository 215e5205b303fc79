use std::io::Write;
use std::path::{Path, PathBuf};

use cenc_core::error::{CencError, KeyError, Result, Stage};
use cenc_core::map::{self, MapFormat};
use cenc_core::{
    CipherVariant, KeyFile, KeyProvider, PackOptions, PackOutputs, RootLayout, StaticKey,
    collect_inputs, encrypt, pack, write_pack,
};
use tracing::info;

use crate::presentation::cli::{CipherArg, InputArgs, KeyArgs, MapArgs};

/// A key file, from --key-file or CENC_KEY_FILE, takes precedence over hex flags.
fn key_provider(args: KeyArgs) -> Result<Option<Box<dyn KeyProvider>>> {
    match (args.key_file, args.key_hex, args.iv_hex) {
        (Some(path), _, _) => Ok(Some(Box::new(KeyFile::new(path)))),
        (None, Some(key), Some(iv)) => Ok(Some(Box::new(StaticKey::from_hex(&key, &iv)?))),
        _ => Ok(None),
    }
}

/// Explicit `--map`, or `out` with the format's extension.
fn map_path(out: &Path, map: Option<PathBuf>, format: MapFormat) -> Result<PathBuf> {
    let path = map.unwrap_or_else(|| out.with_extension(format.extension()));
    if path == out {
        return Err(CencError::Config(format!(
            "map output {} would overwrite the pack",
            path.display()
        )));
    }
    Ok(path)
}

/// Layout members under `--root` first, then explicit inputs.
fn resolve_inputs(args: &InputArgs) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    if let Some(root) = &args.root {
        let layout = match &args.layout {
            Some(p) => RootLayout::from_json_file(p)?,
            None => RootLayout::default(),
        };
        out.extend(layout.expand(root));
    }
    out.extend(args.inputs.iter().cloned());
    Ok(out)
}

pub fn handle_pack(
    inputs: InputArgs,
    out: PathBuf,
    map: Option<PathBuf>,
    map_args: MapArgs,
    sealed: Option<PathBuf>,
    key: KeyArgs,
    cipher: CipherArg,
) -> Result<()> {
    let paths = resolve_inputs(&inputs)?;
    let refs: Vec<_> = paths.iter().map(|p| p.as_path()).collect();
    let keys = key_provider(key)?;
    let map_format: MapFormat = map_args.format.into();
    let map = map_path(&out, map, map_format)?;
    let opts = PackOptions {
        sort: inputs.sort,
        map_format,
        map_symbol: map_args.symbol,
        cipher: cipher.into(),
    };
    let outputs = PackOutputs {
        plain: out,
        map,
        sealed,
    };
    let report = pack(&refs, &outputs, Some(&opts), keys.as_deref())?;
    info!(
        files = report.files,
        bytes = report.bytes,
        sealed = report.sealed,
        "pack: done"
    );
    Ok(())
}

pub fn handle_crypt(input: PathBuf, out: PathBuf, key: KeyArgs, cipher: CipherArg) -> Result<()> {
    let keys = key_provider(key)?
        .ok_or_else(|| KeyError::Missing("pass --key-file or --key-hex/--iv-hex".into()))?;
    let variant: CipherVariant = cipher.into();
    let mut buf = read_whole(&input)?;
    encrypt(&mut buf, variant, &*keys)?;
    write_pack(&buf, &out)
}

pub fn handle_map(inputs: InputArgs, map_args: MapArgs) -> Result<()> {
    let emitter = map::emitter(map_args.format.into(), &map_args.symbol)?;
    let paths = resolve_inputs(&inputs)?;
    let refs: Vec<_> = paths.iter().map(|p| p.as_path()).collect();
    let pack = collect_inputs(&refs, inputs.sort)?;
    let bytes = map::emit(emitter.as_ref(), &pack.entries)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .map_err(|e| CencError::io(Stage::Write, "<stdout>", e))
}

fn read_whole(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| CencError::io(Stage::Read, path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn root_members_come_before_inputs() {
        let args = InputArgs {
            inputs: vec![PathBuf::from("extra")],
            root: Some(PathBuf::from("client")),
            layout: None,
            sort: false,
        };
        let got = resolve_inputs(&args).unwrap();
        assert_eq!(got.len(), 4);
        assert_eq!(got[0], PathBuf::from("client/init.lua"));
        assert_eq!(got[3], PathBuf::from("extra"));
    }

    #[test]
    fn map_defaults_next_to_pack() {
        let out = Path::new("build/assets.pack");
        assert_eq!(
            map_path(out, None, MapFormat::C).unwrap(),
            PathBuf::from("build/assets.h")
        );
        assert_eq!(
            map_path(out, None, MapFormat::Json).unwrap(),
            PathBuf::from("build/assets.json")
        );
        assert_eq!(
            map_path(out, Some(PathBuf::from("m.lua")), MapFormat::Lua).unwrap(),
            PathBuf::from("m.lua")
        );
    }

    #[test]
    fn map_may_not_replace_pack() {
        let err = map_path(Path::new("assets.h"), None, MapFormat::C).unwrap_err();
        assert!(matches!(err, CencError::Config(_)));
    }

    #[test]
    fn key_file_wins_over_hex() {
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("cenc.key");
        fs::write(&p, format!("{}\n{}\n", "11".repeat(32), "22".repeat(16))).unwrap();
        let keys = key_provider(KeyArgs {
            key_file: Some(p),
            key_hex: Some("00".repeat(16)),
            iv_hex: Some("00".repeat(16)),
        })
        .unwrap()
        .unwrap();
        let km = keys.fetch().unwrap();
        assert_eq!(km.key(), vec![0x11u8; 32]);
    }

    #[test]
    fn crypt_round_trips_a_file() {
        let td = tempfile::tempdir().unwrap();
        let src = td.path().join("pack.bin");
        fs::write(&src, b"abcxy").unwrap();
        let key = || KeyArgs {
            key_file: None,
            key_hex: Some("00".repeat(16)),
            iv_hex: Some("ff".repeat(16)),
        };
        let enc = td.path().join("pack.enc");
        let dec = td.path().join("pack.dec");
        handle_crypt(src, enc.clone(), key(), CipherArg::Aes128Ctr).unwrap();
        handle_crypt(enc.clone(), dec.clone(), key(), CipherArg::Aes128Ctr).unwrap();
        assert_ne!(fs::read(&enc).unwrap(), b"abcxy");
        assert_eq!(fs::read(&dec).unwrap(), b"abcxy");
    }

    #[test]
    fn crypt_without_key_fails() {
        let td = tempfile::tempdir().unwrap();
        let src = td.path().join("pack.bin");
        fs::write(&src, b"abc").unwrap();
        let out = td.path().join("pack.enc");
        let err = handle_crypt(src, out.clone(), KeyArgs::default(), CipherArg::Aes128Ctr)
            .unwrap_err();
        assert!(matches!(err, CencError::Key(KeyError::Missing(_))));
        assert!(!out.exists());
    }
}
