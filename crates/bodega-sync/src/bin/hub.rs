//! # Standalone Document Hub
//!
//! Runs the document hub as its own process, for development against a
//! local store instead of the hosted one.
//!
//! ## Usage
//! ```bash
//! # Empty store on the default port (8765)
//! cargo run -p bodega-sync --bin hub
//!
//! # Custom port, seeded from a JSON file
//! cargo run -p bodega-sync --bin hub -- --port 9000 --seed ./demo-data.json
//! ```
//!
//! ## Seed File Format
//! A JSON object mapping collection names to arrays of raw documents:
//! ```json
//! {
//!   "productos": [
//!     { "nombre_producto": "Arroz 1kg", "precio_unitario": 23.5, "stock_actual": 40 }
//!   ],
//!   "categorias": [
//!     { "nombre_categoria": "Abarrotes", "id_categoria": 1 }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use bodega_sync::{DocumentHub, HubConfig, MemoryStore, DEFAULT_HUB_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut port = DEFAULT_HUB_PORT;
    let mut bind_addr = String::from("0.0.0.0");
    let mut seed_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(DEFAULT_HUB_PORT);
                    i += 1;
                }
            }
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    bind_addr = args[i + 1].clone();
                    i += 1;
                }
            }
            "--seed" | "-s" => {
                if i + 1 < args.len() {
                    seed_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bodega Document Hub");
                println!();
                println!("Usage: hub [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --port <PORT>   Port to listen on (default: {})", DEFAULT_HUB_PORT);
                println!("  -b, --bind <ADDR>   Bind address (default: 0.0.0.0)");
                println!("  -s, --seed <FILE>   JSON file with initial collections");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let store = MemoryStore::new();

    if let Some(path) = seed_path {
        let contents = std::fs::read_to_string(&path)?;
        let collections: HashMap<String, Vec<serde_json::Map<String, serde_json::Value>>> =
            serde_json::from_str(&contents)?;

        for (collection, docs) in collections {
            let count = docs.len();
            for fields in docs {
                store.insert(&collection, fields).await;
            }
            info!(collection = %collection, count, "Seeded collection");
        }
    }

    let config = HubConfig { port, bind_addr };
    let handle = DocumentHub::new(config, store).start().await?;

    info!(url = %handle.url(), "Hub ready, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await?;

    Ok(())
}
