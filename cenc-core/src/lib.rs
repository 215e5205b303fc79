#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod layout;
pub mod map;

pub mod util {
    pub mod path;
}

pub mod crypto {
    pub mod ctr;
    pub mod hex;
    pub mod key;
}

pub mod pack {
    pub mod builder;
    pub mod walker;
    pub mod writer;
}

// Re-exports: stable API surface
pub use crypto::ctr::{CipherVariant, encrypt};
pub use crypto::key::{KeyFile, KeyMaterial, KeyProvider, StaticKey};
pub use domain::{DiscoveredFile, Pack, PackEntry};
pub use error::{CencError, KeyError, Result, Stage};
pub use layout::RootLayout;
pub use map::MapFormat;
pub use pack::writer::{PackOptions, PackOutputs, PackReport, collect_inputs, pack, write_pack};
