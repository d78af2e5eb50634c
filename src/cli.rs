use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::{
    config::AppConfig,
    db::{self, BannerStore},
    errors::{Error, StoreError},
    models::Banner,
    server,
};

pub fn cli() -> Command {
    Command::new("banner-service")
        .about("Serves active promotional banners and deactivates them on schedule")
        .subcommand(Command::new("serve").about("Start the HTTP server (default)"))
        .subcommand(
            Command::new("add-banner")
                .about("Insert a banner pointing at an externally hosted image")
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help("Image URL")
                        .value_name("URL")
                        .required(true),
                )
                .arg(
                    Arg::new("inactive")
                        .long("inactive")
                        .help("Store the banner already deactivated")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("cleanup").about("Deactivate every active banner"))
}

pub async fn handle_cli(matches: ArgMatches, config: AppConfig) -> Result<(), Error> {
    match matches.subcommand() {
        Some(("add-banner", sub_matches)) => {
            let url = sub_matches
                .get_one::<String>("url")
                .map(String::as_str)
                .unwrap_or_default();

            let mut banner = Banner::new(url).map_err(StoreError::from)?;
            if sub_matches.get_flag("inactive") {
                banner = banner.inactive();
            }

            let store = db::connect(&config).await?;
            let banner = store.insert(banner).await?;

            println!("Banner created successfully!");
            println!("URL: {}", banner.url);
            if let Some(oid) = banner.oid {
                println!("ID: {}", oid);
            }
            println!("Active: {}", banner.active);
        }
        Some(("cleanup", _)) => {
            let store = db::connect(&config).await?;
            let count = store.deactivate_all().await?;

            tracing::info!(count, "banner cleanup finished");
            println!("Banners deactivated: {}", count);
        }
        _ => {
            server::build(&config)?.launch().await?;
        }
    }

    Ok(())
}
