//! # Banner handlers
//!
//! Read access to the active banners and the scheduled deactivation. Banners
//! are created outside of the HTTP API, so there is no write route besides
//! cleanup.

use {
    crate::{
        auth::CronCaller,
        db::SharedStore,
        errors::{ApiError, CronAuthError},
        models::CleanupReport,
    },
    rocket::{Route, State, get, routes, serde::json::Json},
};

/// Returns the URLs of every active banner as a JSON array.
#[get("/banners")]
pub async fn get_banners(store: &State<SharedStore>) -> Result<Json<Vec<String>>, ApiError> {
    let urls = store.active_urls().await.map_err(ApiError::LoadBanners)?;

    if urls.is_empty() {
        tracing::info!("no active banners found");
    }

    Ok(Json(urls))
}

/// Deactivates every active banner. Meant to be hit by a daily cron job.
#[get("/cleanup-banners")]
pub async fn cleanup_banners(
    caller: Result<CronCaller, CronAuthError>,
    store: &State<SharedStore>,
) -> Result<Json<CleanupReport>, ApiError> {
    caller?;

    let count = store.deactivate_all().await.map_err(ApiError::Cleanup)?;

    tracing::info!(count, "banner cleanup finished");

    Ok(Json(CleanupReport::new(count)))
}

pub fn routes() -> Vec<Route> {
    routes![get_banners, cleanup_banners]
}
