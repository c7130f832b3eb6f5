// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use osc_forge::templates::ASSET_NAMES;
use osc_forge::{Actuator, DirAssets, HandleOutcome, OsConfig, TemplateStore};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "osc-forge")]
#[command(author, version, about = "Generate node OS provisioning and reconcile artifacts", long_about = None)]
struct Cli {
    /// Load script assets from a directory instead of the embedded set
    #[arg(long, global = true)]
    assets_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render artifacts for an OS configuration request
    Render {
        /// Path to the request document (JSON)
        request: PathBuf,

        /// Output directory; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the packaged script assets
    Assets,
}

fn load_store(assets_dir: Option<&PathBuf>) -> Result<TemplateStore> {
    match assets_dir {
        // A broken asset directory must stop the process before it serves
        // anything; bail here rather than falling back to the embedded set.
        Some(dir) => TemplateStore::load(&DirAssets::new(dir))
            .with_context(|| format!("loading script assets from {}", dir.display())),
        None => Ok(TemplateStore::embedded()),
    }
}

fn render(store: TemplateStore, request_path: &PathBuf, out: Option<&PathBuf>) -> Result<()> {
    let raw = fs::read_to_string(request_path)
        .with_context(|| format!("reading request {}", request_path.display()))?;
    let request: OsConfig = serde_json::from_str(&raw).context("decoding request document")?;

    info!(purpose = %request.purpose, os_type = %request.os_type, "handling request");

    let actuator = Actuator::new(store);
    match actuator.reconcile(&request)? {
        HandleOutcome::Provision(user_data) => match out {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                let path = dir.join("userdata");
                fs::write(&path, &user_data)?;
                println!("wrote provision user data to {}", path.display());
            }
            None => std::io::stdout().write_all(&user_data)?,
        },
        HandleOutcome::Reconcile(artifacts) => {
            let doc = serde_json::to_string_pretty(&artifacts)?;
            match out {
                Some(dir) => {
                    fs::create_dir_all(dir)?;
                    let path = dir.join("artifacts.json");
                    fs::write(&path, doc)?;
                    println!(
                        "wrote {} files, {} units to {}",
                        artifacts.files.len(),
                        artifacts.units.len(),
                        path.display()
                    );
                }
                None => println!("{doc}"),
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = load_store(cli.assets_dir.as_ref())?;

    match cli.command {
        Commands::Render { request, out } => render(store, &request, out.as_ref()),
        Commands::Assets => {
            for name in ASSET_NAMES {
                let content = store.get(name).unwrap_or_default();
                println!("{name}\t{} bytes", content.len());
            }
            Ok(())
        }
    }
}
