use clap::{Parser, Subcommand};
use inline_assets::{AssetStore, StoreConfig, batch, config, json, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inline-assets")]
#[command(about = "Store inline data URI images as files and rewrite references to URLs")]
#[command(long_about = "\
Store inline data URI images as files and rewrite references to URLs

Every <img src=\"data:image/...;base64,...\"> is decoded, written to the upload
directory as <id>.<ext>, and its src replaced with <base_url><upload>/<id>.<ext>.
Other images are left as they are. If any image in a document fails, that
document is left unchanged.

Paths and URLs come from config.toml in the config directory:

  [paths]
  upload = \"uploads\"

  [urls]
  base_url = \"http://localhost:8080\"
  upload = \"/uploads\"

Run 'inline-assets gen-config' to print a documented config.toml.
Set RUST_LOG=debug to see every stored file.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite data URI images in HTML files (directories are searched for .html/.htm)
    Html {
        /// Files or directories to rewrite
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write results back to the files instead of printing them
        #[arg(long)]
        in_place: bool,
    },
    /// Store the data URI of a JSON image object and print the updated object
    Json {
        /// File holding {"data": "...", "name": "...", "size": N}
        file: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Html { paths, in_place } => {
            let (assets_config, store) = open_store(&cli.config_dir)?;
            init_thread_pool(&assets_config.processing);
            let files = batch::collect_html_files(&paths)?;
            let results = batch::rewrite_files(&files, &store, in_place);
            if in_place {
                output::print_batch_output(&results);
            } else {
                for err in results.iter().filter_map(|r| r.outcome.as_ref().err()) {
                    tracing::error!("{err}");
                }
                output::print_rewritten_documents(&results);
            }
            if results.iter().any(|r| r.outcome.is_err()) {
                return Err("some files could not be rewritten".into());
            }
        }
        Command::Json { file } => {
            let (_, store) = open_store(&cli.config_dir)?;
            let raw = std::fs::read(&file)?;
            let image = json::extract_image(&raw, &store)?;
            println!("{}", serde_json::to_string_pretty(&image)?);
        }
    }

    Ok(())
}

/// Load config and build a store, creating the upload directory if needed.
fn open_store(
    config_dir: &Path,
) -> Result<(config::AssetsConfig, AssetStore), Box<dyn std::error::Error>> {
    let assets_config = config::load_config(config_dir)?;
    let store_config = StoreConfig::from_environment(&assets_config.environment());
    std::fs::create_dir_all(&store_config.storage_dir)?;
    Ok((assets_config, AssetStore::new(store_config)))
}

/// Log to stderr, `info` unless `RUST_LOG` says otherwise.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Size the global rayon pool from `[processing]`.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = processing.thread_count();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
