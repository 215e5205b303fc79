pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use cenc_core::error::Result;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pack {
            inputs,
            out,
            map,
            map_args,
            sealed,
            key,
            cipher,
        } => handlers::handle_pack(inputs, out, map, map_args, sealed, key, cipher),
        Commands::Crypt {
            input,
            out,
            key,
            cipher,
        } => handlers::handle_crypt(input, out, key, cipher),
        Commands::Map { inputs, map_args } => handlers::handle_map(inputs, map_args),
    }
}
