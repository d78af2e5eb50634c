//! # Database connection module
//!
//! This module owns the MongoDB connection pool and the banner store built on
//! top of it.
//!
//! The pool is a rocket_db_pools `Database`: it is opened once while Rocket
//! ignites and lives as long as the Rocket instance. [`store_fairing`] runs
//! right after it and places a [`SharedStore`] in managed state, so request
//! handlers never touch the driver directly.

use {
    crate::{
        config::AppConfig,
        errors::StoreError,
        models::{Banner, BannerUrl},
    },
    mongodb::bson::doc,
    rocket::{fairing::AdHoc, futures::TryStreamExt},
    rocket_db_pools::{
        Database,
        mongodb::{Client, Collection, Database as MongoDatabase, options::FindOptions},
    },
    std::sync::Arc,
};

pub const BANNERS_COLLECTION: &str = "banners";

/// MongoDB connection pool, configured under `databases.banner_db`.
#[derive(Database)]
#[database("banner_db")]
pub struct BannerDb(Client);

/// Storage operations the HTTP service and the CLI need.
#[rocket::async_trait]
pub trait BannerStore: Send + Sync {
    /// URLs of every active banner, in store order.
    async fn active_urls(&self) -> Result<Vec<String>, StoreError>;

    /// Flips every active banner to inactive and returns how many changed.
    async fn deactivate_all(&self) -> Result<u64, StoreError>;

    async fn insert(&self, banner: Banner) -> Result<Banner, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn BannerStore>;

pub struct MongoBannerStore {
    database: MongoDatabase,
    banners: Collection<Banner>,
}

impl MongoBannerStore {
    pub fn new(database: MongoDatabase) -> Self {
        let banners = database.collection::<Banner>(BANNERS_COLLECTION);
        Self { database, banners }
    }

    /// Resolves the database name from `config` and the client's URI.
    pub fn from_client(client: &Client, config: &AppConfig) -> Self {
        let default = client.default_database();
        let name = config.database_or(default.as_ref().map(|db| db.name()));

        tracing::debug!(database = %name, "using banner database");

        Self::new(client.database(&name))
    }
}

/// Drops stored banners whose url is blank.
fn usable_url(banner: BannerUrl) -> Option<String> {
    if banner.url.trim().is_empty() {
        tracing::warn!("skipping active banner with an empty url");
        return None;
    }

    Some(banner.url)
}

#[rocket::async_trait]
impl BannerStore for MongoBannerStore {
    async fn active_urls(&self) -> Result<Vec<String>, StoreError> {
        let options = FindOptions::builder()
            .projection(doc! { "url": 1, "_id": 0 })
            .build();

        let mut cursor = self
            .banners
            .clone_with_type::<BannerUrl>()
            .find(doc! { "active": true }, options)
            .await
            .map_err(StoreError::query)?;

        let mut urls = Vec::new();
        while let Some(banner) = cursor.try_next().await.map_err(StoreError::query)? {
            urls.extend(usable_url(banner));
        }

        Ok(urls)
    }

    async fn deactivate_all(&self) -> Result<u64, StoreError> {
        let result = self
            .banners
            .update_many(
                doc! { "active": true },
                doc! { "$set": { "active": false } },
                None,
            )
            .await
            .map_err(StoreError::write)?;

        Ok(result.modified_count)
    }

    async fn insert(&self, mut banner: Banner) -> Result<Banner, StoreError> {
        let result = self
            .banners
            .insert_one(&banner, None)
            .await
            .map_err(StoreError::write)?;

        banner.oid = result.inserted_id.as_object_id();

        Ok(banner)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(StoreError::query)?;

        Ok(())
    }
}

/// Manages a [`SharedStore`] backed by the [`BannerDb`] pool. Must be attached
/// after `BannerDb::init()`.
pub fn store_fairing(config: AppConfig) -> AdHoc {
    AdHoc::try_on_ignite("Banner store", |rocket| async move {
        let store = match BannerDb::fetch(&rocket) {
            Some(db) => MongoBannerStore::from_client(db, &config),
            None => {
                tracing::error!("banner database pool was not initialised");
                return Err(rocket);
            }
        };

        tracing::info!("banner store ready");

        Ok(rocket.manage(Arc::new(store) as SharedStore))
    })
}

/// Opens a standalone client, for use outside of Rocket.
pub async fn connect(config: &AppConfig) -> Result<MongoBannerStore, crate::errors::Error> {
    use rocket_db_pools::mongodb::options::ClientOptions;

    let options = ClientOptions::parse(&config.mongodb_uri).await?;
    let client = Client::with_options(options)?;

    Ok(MongoBannerStore::from_client(&client, config))
}

#[cfg(test)]
pub mod memory {
    //! In-process store used by the tests.

    use super::*;
    use rocket_db_pools::mongodb::error::Error as MongoError;
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    };

    #[derive(Default)]
    pub struct MemoryBannerStore {
        banners: Mutex<Vec<Banner>>,
        offline: AtomicBool,
    }

    impl MemoryBannerStore {
        pub fn with_banners(banners: Vec<Banner>) -> Self {
            Self {
                banners: Mutex::new(banners),
                offline: AtomicBool::new(false),
            }
        }

        /// Makes every following operation fail as if the server was gone.
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        pub fn snapshot(&self) -> Vec<Banner> {
            self.banners.lock().unwrap().clone()
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.offline.load(Ordering::SeqCst) {
                let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "offline");
                return Err(StoreError::Connection(MongoError::from(io)));
            }
            Ok(())
        }
    }

    #[rocket::async_trait]
    impl BannerStore for MemoryBannerStore {
        async fn active_urls(&self) -> Result<Vec<String>, StoreError> {
            self.check()?;
            Ok(self
                .banners
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.active && !b.url.trim().is_empty())
                .map(|b| b.url.clone())
                .collect())
        }

        async fn deactivate_all(&self) -> Result<u64, StoreError> {
            self.check()?;
            let mut count = 0;
            for banner in self.banners.lock().unwrap().iter_mut().filter(|b| b.active) {
                banner.active = false;
                count += 1;
            }
            Ok(count)
        }

        async fn insert(&self, mut banner: Banner) -> Result<Banner, StoreError> {
            self.check()?;
            banner.oid = Some(mongodb::bson::oid::ObjectId::new());
            self.banners.lock().unwrap().push(banner.clone());
            Ok(banner)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.check()
        }
    }
}
