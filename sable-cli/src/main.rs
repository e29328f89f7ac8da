use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sable_cli::{build_cmd, BuildConfig};

#[derive(Parser)]
#[command(name = "sable", version, about = "Sable template compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template into a PHP artifact.
    Build {
        /// Path to the template file
        input: PathBuf,
        /// Output directory (default: target/sable-gen)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Compile-cache directory; omit to compile without a cache
        #[arg(long)]
        cache_dir: Option<PathBuf>,
        /// Ignore the cache even when --cache-dir is set
        #[arg(long)]
        no_cache: bool,
        /// Parse as XML instead of HTML
        #[arg(long)]
        xml: bool,
        /// Pass comments through instead of dropping them
        #[arg(long)]
        keep_comments: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            input,
            out_dir,
            cache_dir,
            no_cache,
            xml,
            keep_comments,
        } => {
            build_cmd(
                &input,
                &BuildConfig {
                    out_dir,
                    cache_dir,
                    no_cache,
                    xml,
                    keep_comments,
                },
            )?;
        }
    }
    Ok(())
}
