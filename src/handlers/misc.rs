//! Liveness check for the banner database.

use {
    crate::{db::SharedStore, models::HealthStatus},
    rocket::{
        State, get, http::Status, response::status, routes as rocket_routes, serde::json::Json,
    },
};

#[get("/health")]
pub async fn health(store: &State<SharedStore>) -> status::Custom<Json<HealthStatus>> {
    match store.ping().await {
        Ok(()) => status::Custom(
            Status::Ok,
            Json(HealthStatus {
                database: "online".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            status::Custom(
                Status::ServiceUnavailable,
                Json(HealthStatus {
                    database: "offline".to_string(),
                }),
            )
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    rocket_routes![health]
}

#[cfg(test)]
mod tests {
    use crate::{auth::CronSecret, db::memory::MemoryBannerStore, server};
    use rocket::{http::Status, local::asynchronous::Client};
    use std::sync::Arc;

    #[rocket::async_test]
    async fn test_health_reflects_store_state() {
        let store = Arc::new(MemoryBannerStore::default());
        let rocket = server::build_with_store(store.clone(), CronSecret::default()).unwrap();
        let client = Client::tracked(rocket).await.unwrap();

        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.into_string().await.unwrap(), r#"{"database":"online"}"#);

        store.set_offline(true);

        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::ServiceUnavailable);
        assert_eq!(response.into_string().await.unwrap(), r#"{"database":"offline"}"#);
    }
}
