//! Standalone maintenance utility: patch placeholder artist/album fields
//! in a stored track library using an ordered pattern table.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stem_extractor::library::{patch_library, MetadataTable};

#[derive(Parser)]
#[command(name = "retag")]
#[command(about = "Patch placeholder track metadata in a JSON library file", long_about = None)]
#[command(version)]
struct Cli {
    /// Library file: a JSON array of track records
    #[arg(long, value_name = "FILE")]
    library: PathBuf,

    /// Pattern table: a JSON array of {pattern, artist, album} entries,
    /// applied in order, first match wins
    #[arg(long, value_name = "FILE")]
    table: PathBuf,

    /// Report what would change without writing the library
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let table = match MetadataTable::load(&cli.table) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    match patch_library(&cli.library, &table, cli.dry_run) {
        Ok(updated) => {
            if cli.dry_run {
                println!("Would update {updated} tracks");
            } else {
                println!("Updated {updated} tracks");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
