use rocket::Request;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket_db_pools::mongodb::error::{Error as MongoError, ErrorKind};
use serde_json::json;
use thiserror::Error;

use crate::models::BannerError;

pub const LOAD_BANNERS_FAILED: &str = "Falha ao carregar banners.";
pub const CLEANUP_FAILED: &str = "Falha na rotina de limpeza.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    MissingVar(&'static str),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database unreachable: {0}")]
    Connection(MongoError),
    #[error("Query failed: {0}")]
    Query(MongoError),
    #[error("Write failed: {0}")]
    Write(MongoError),
    #[error("Invalid banner: {0}")]
    Invalid(#[from] BannerError),
}

impl StoreError {
    fn is_connection(err: &MongoError) -> bool {
        matches!(
            err.kind.as_ref(),
            ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::DnsResolve { .. }
        )
    }

    pub fn query(err: MongoError) -> Self {
        if Self::is_connection(&err) {
            StoreError::Connection(err)
        } else {
            StoreError::Query(err)
        }
    }

    pub fn write(err: MongoError) -> Self {
        if Self::is_connection(&err) {
            StoreError::Connection(err)
        } else {
            StoreError::Write(err)
        }
    }
}

/// Top-level failure that stops the process before or during launch.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to connect to MongoDB: {0}")]
    Connect(#[from] MongoError),
    #[error("Failed to build CORS options: {0}")]
    Cors(#[from] rocket_cors::Error),
    #[error("Rocket failed: {0}")]
    Launch(Box<rocket::Error>),
}

impl From<rocket::Error> for Error {
    fn from(value: rocket::Error) -> Self {
        Error::Launch(Box::new(value))
    }
}

fn json_error(status: Status, message: &str) -> response::Result<'static> {
    let body = json!({ "error": message }).to_string();

    Response::build()
        .status(status)
        .header(ContentType::JSON)
        .sized_body(body.len(), std::io::Cursor::new(body))
        .ok()
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CronAuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    InvalidFormat,
    #[error("Invalid cron secret")]
    InvalidSecret,
}

/// Handler-level failure. For store failures the client only ever sees the
/// generic message; the underlying error is logged.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", LOAD_BANNERS_FAILED)]
    LoadBanners(#[source] StoreError),
    #[error("{}", CLEANUP_FAILED)]
    Cleanup(#[source] StoreError),
    #[error(transparent)]
    Unauthorized(#[from] CronAuthError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::LoadBanners(_) | ApiError::Cleanup(_) => Status::InternalServerError,
            ApiError::Unauthorized(_) => Status::Unauthorized,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            ApiError::LoadBanners(e) => tracing::error!(error = %e, "failed to load banners"),
            ApiError::Cleanup(e) => tracing::error!(error = %e, "banner cleanup failed"),
            ApiError::Unauthorized(e) => tracing::warn!(reason = %e, "rejected cleanup request"),
        }

        json_error(self.status(), &self.to_string())
    }
}

/// Body for the framework-level catchers.
pub fn catcher_body(status: Status) -> String {
    let message = match status.code {
        401 => "Unauthorized",
        404 => "Not found",
        _ => "Internal server error",
    };

    json!({ "error": message }).to_string()
}
