//! # Lounge Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        lounge (binary)                                  │
//! │                                                                         │
//! │  main.rs ────► parse arguments, start the runtime                      │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, database, menu, cart store             │
//! │                                                                         │
//! │  cli.rs ─────► dispatch to commands/, print the result                 │
//! │                                                                         │
//! │  commands/ ──► menu, cart, checkout, coupon, orders                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exits with status 1 and the error on stderr when a command fails.

use clap::Parser;
use std::process;

use lounge_storefront_lib::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(error) = lounge_storefront_lib::run(cli).await {
        match serde_json::to_string_pretty(&error) {
            Ok(rendered) if json => eprintln!("{}", rendered),
            _ => eprintln!("{}", error),
        }
        process::exit(1);
    }
}
