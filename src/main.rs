use std::{path::PathBuf, process::exit, time::Duration};

use clap::{Parser, Subcommand};
use config::{GlobalConfig, VendorOptions};
use error::{ErrorKind, ImtError};
use import_map::{ImportMap, CANDIDATES};
use io::{report, StderrWriter};
use vendor::{Vendor, IMPORT_MAP_FILE};

mod config;
mod error;
mod fetch;
mod import_map;
mod imports;
mod io;
mod logger;
mod specifier;
mod vendor;
mod vendor_path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init();

    if let Err(e) = run(cli).await {
        report(&mut StderrWriter, &e);
        exit(match e.kind() {
            ErrorKind::Cancelled => 130,
            _ => 1,
        });
    }
}

async fn run(cli: Cli) -> Result<(), ImtError> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Vendor {
            out,
            concurrency,
            timeout,
            retries,
        } => {
            let config = match GlobalConfig::new() {
                Err(ImtError::NotFoundHomeDir) => GlobalConfig::default(),
                config => config?,
            };
            let mut options = VendorOptions::from_config(&config);
            if let Some(out) = out {
                options.vendor_root = out;
            }
            if let Some(n) = concurrency {
                options.concurrency = n;
            }
            if let Some(secs) = timeout {
                options.timeout = Duration::from_secs(secs);
            }
            if let Some(n) = retries {
                options.retries = n;
            }

            let map = ImportMap::load(&cwd)?;
            let root = options.vendor_root.clone();
            let vendor = Vendor::new(options)?;

            let token = vendor.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    token.cancel();
                }
            });

            vendor.vendor_all(&map).await?;
            log::info!("  - Import map written to {}", root.join(IMPORT_MAP_FILE).display());
        }
        Commands::Add { specifier, target } => {
            let (path, mut map) = match ImportMap::locate(&cwd) {
                Ok(found) => found,
                Err(e @ ImtError::NotFoundImportMap(_)) => {
                    let path = cwd.join(CANDIDATES[0]);
                    // never overwrite a file that failed to parse
                    if path.exists() {
                        return Err(e);
                    }
                    (path, ImportMap::new())
                }
                Err(e) => return Err(e),
            };
            map.add(&specifier, &target);
            map.save(&path)?;
        }
        Commands::Remove { specifier } => {
            let (path, mut map) = ImportMap::locate(&cwd)?;
            if !map.has(&specifier) {
                log::warn!("\"{}\" is not in {}", specifier, path.display());
            }
            map.remove(&specifier);
            map.save(&path)?;
        }
        Commands::Get { specifier } => {
            let map = ImportMap::load(&cwd)?;
            println!("{}", map.get(&specifier)?);
        }
        Commands::Config { key, value, unset } => {
            let mut config = GlobalConfig::new()?;
            match (unset, value) {
                (true, _) => config.unset(&key)?,
                (false, Some(value)) => config.set(&key, &value)?,
                (false, None) => {
                    return Err(ImtError::InvalidConfigValue {
                        key,
                        value: String::new(),
                    })
                }
            }
            config.save()?;
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every remote module of the import map into the vendor dir
    Vendor {
        /// Vendor directory [default: _vendor]
        #[arg(long)]
        out: Option<PathBuf>,
        /// Maximum number of concurrent downloads
        #[arg(long)]
        concurrency: Option<usize>,
        /// Per request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Retries for failed downloads
        #[arg(long)]
        retries: Option<u32>,
    },
    /// Add or replace an import map entry
    Add { specifier: String, target: String },
    /// Remove an import map entry
    Remove { specifier: String },
    /// Print the target of an import map entry
    Get { specifier: String },
    /// Set or unset a global config value
    Config {
        key: String,
        value: Option<String>,
        #[arg(long)]
        unset: bool,
    },
}
