//! # Banner service - active promotional banners over HTTP
//!
//! ## Environment Variables
//!
//! - `MONGODB_URI`: MongoDB connection string (required, checked at startup)
//! - `MONGODB_DATABASE`: database name override
//! - `CRON_SECRET`: bearer token the scheduler must send to `/api/cleanup-banners`
//! - `RUST_LOG`: log filter, `info` by default

use tracing_subscriber::EnvFilter;

use crate::{config::AppConfig, errors::Error};

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod server;

#[rocket::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = cli::cli().get_matches();

    let config = AppConfig::from_env()
        .inspect_err(|e| tracing::error!("refusing to start: {}", e))?;

    cli::handle_cli(matches, config).await
}
