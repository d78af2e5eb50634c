//! Rocket composition root.

use rocket::{Build, Rocket, catchers, figment::Figment, http::Method};
use rocket_cors::{AllowedOrigins, Cors, CorsOptions};
use rocket_db_pools::Database;

use crate::{
    auth::CronSecret,
    config::AppConfig,
    db::{BannerDb, SharedStore, store_fairing},
    errors::Error,
    handlers,
};

pub fn cors() -> Result<Cors, rocket_cors::Error> {
    CorsOptions::default()
        .allowed_origins(AllowedOrigins::all())
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .to_cors()
}

fn base(figment: Figment, secret: CronSecret) -> Result<Rocket<Build>, Error> {
    Ok(rocket::custom(figment)
        .manage(secret)
        .attach(cors()?)
        .register(
            "/",
            catchers![handlers::catch401, handlers::catch404, handlers::catch500],
        )
        .mount("/api", handlers::banners::routes())
        .mount("/api", handlers::misc::routes()))
}

/// Builds the production server. The MongoDB pool is opened once at ignition.
pub fn build(config: &AppConfig) -> Result<Rocket<Build>, Error> {
    let figment =
        rocket::Config::figment().merge(("databases.banner_db.url", &config.mongodb_uri));

    let secret = CronSecret::new(config.cron_secret.as_deref());
    if !secret.is_enabled() {
        tracing::warn!("CRON_SECRET is not set, /api/cleanup-banners accepts any caller");
    }

    Ok(base(figment, secret)?
        .attach(BannerDb::init())
        .attach(store_fairing(config.clone())))
}

/// Builds a server around an already constructed store.
pub fn build_with_store(store: SharedStore, secret: CronSecret) -> Result<Rocket<Build>, Error> {
    Ok(base(rocket::Config::figment(), secret)?.manage(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MONGODB_URI;

    #[test]
    fn test_cors_builds() {
        assert!(cors().is_ok());
    }

    #[test]
    fn test_build_merges_database_url() {
        let config = AppConfig::from_lookup(|name| {
            (name == MONGODB_URI).then(|| "mongodb://db.internal:27017/promo".to_string())
        })
        .unwrap();

        let rocket = build(&config).unwrap();
        let url: String = rocket
            .figment()
            .extract_inner("databases.banner_db.url")
            .unwrap();

        assert_eq!(url, "mongodb://db.internal:27017/promo");
    }
}
