use cenc_core::{CipherVariant, MapFormat};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "cenc asset packer", long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CipherArg {
    #[value(name = "aes128-ctr")]
    Aes128Ctr,
    #[value(name = "aes192-ctr")]
    Aes192Ctr,
    #[value(name = "aes256-ctr")]
    Aes256Ctr,
}

impl From<CipherArg> for CipherVariant {
    fn from(c: CipherArg) -> Self {
        match c {
            CipherArg::Aes128Ctr => CipherVariant::Aes128Ctr,
            CipherArg::Aes192Ctr => CipherVariant::Aes192Ctr,
            CipherArg::Aes256Ctr => CipherVariant::Aes256Ctr,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    C,
    Lua,
    Json,
}

impl From<FormatArg> for MapFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::C => MapFormat::C,
            FormatArg::Lua => MapFormat::Lua,
            FormatArg::Json => MapFormat::Json,
        }
    }
}

/// Where key material comes from.
#[derive(Args, Clone, Debug, Default)]
pub struct KeyArgs {
    /// Key file: key hex on the first line, iv hex on the second. Wins over
    /// --key-hex/--iv-hex when both are given, including via CENC_KEY_FILE
    #[arg(long = "key-file", env = "CENC_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Key as hex (16, 24 or 32 bytes depending on --cipher)
    #[arg(long = "key-hex", requires = "iv_hex")]
    pub key_hex: Option<String>,

    /// 16-byte iv as hex
    #[arg(long = "iv-hex", requires = "key_hex")]
    pub iv_hex: Option<String>,
}

/// Which files go into the pack.
#[derive(Args, Clone, Debug, Default)]
pub struct InputArgs {
    /// Files or directories to pack, in order
    pub inputs: Vec<PathBuf>,

    /// Application root; packs the members named by the layout before any INPUTS
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// JSON layout for --root ({"files": [...], "dirs": [...]})
    #[arg(long, requires = "root")]
    pub layout: Option<PathBuf>,

    /// Sort directory entries by name for a platform-independent layout
    #[arg(long)]
    pub sort: bool,
}

#[derive(Args, Clone, Debug)]
pub struct MapArgs {
    /// Map output format
    #[arg(long, value_enum, default_value_t = FormatArg::C)]
    pub format: FormatArg,

    /// Identifier for C/Lua maps
    #[arg(long, default_value = cenc_core::pack::writer::DEFAULT_MAP_SYMBOL)]
    pub symbol: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack inputs, write the plain pack and its map, optionally seal it
    Pack {
        #[command(flatten)]
        inputs: InputArgs,

        /// Plain pack output
        #[arg(long)]
        out: PathBuf,

        /// Map output; defaults to --out with the format's extension
        #[arg(long)]
        map: Option<PathBuf>,

        #[command(flatten)]
        map_args: MapArgs,

        /// Encrypted pack output; requires key material
        #[arg(long)]
        sealed: Option<PathBuf>,

        #[command(flatten)]
        key: KeyArgs,

        #[arg(long, value_enum, default_value_t = CipherArg::Aes128Ctr)]
        cipher: CipherArg,
    },

    /// Apply the cipher to an existing file (encrypts and decrypts)
    Crypt {
        input: PathBuf,
        out: PathBuf,

        #[command(flatten)]
        key: KeyArgs,

        #[arg(long, value_enum, default_value_t = CipherArg::Aes128Ctr)]
        cipher: CipherArg,
    },

    /// Print the map for a set of inputs without writing a pack
    Map {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        map_args: MapArgs,
    },
}
