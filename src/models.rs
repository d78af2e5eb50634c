use {
    mongodb::bson::{DateTime as BsonDateTime, oid::ObjectId},
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

pub const CLEANUP_MESSAGE: &str = "Rotina de limpeza de banners concluída com sucesso.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BannerError {
    #[error("Banner url must not be empty")]
    EmptyUrl,
}

fn default_active() -> bool {
    true
}

/// A promotional banner as stored in the `banners` collection.
///
/// The image itself lives on an external host; only its URL is kept here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct Banner {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub oid: Option<ObjectId>,
    pub url: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(rename = "createdAt", default = "BsonDateTime::now")]
    pub created_at: BsonDateTime,
}

impl Banner {
    /// Builds an active banner stamped with the current time.
    pub fn new(url: impl Into<String>) -> Result<Self, BannerError> {
        let url = url.into().trim().to_string();

        if url.is_empty() {
            return Err(BannerError::EmptyUrl);
        }

        Ok(Self {
            oid: None,
            url,
            active: true,
            created_at: BsonDateTime::now(),
        })
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Projection of a banner down to its `url` field.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(crate = "rocket::serde")]
pub struct BannerUrl {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct CleanupReport {
    pub message: String,
    pub count: u64,
}

impl CleanupReport {
    pub fn new(count: u64) -> Self {
        Self {
            message: CLEANUP_MESSAGE.to_string(),
            count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct HealthStatus {
    pub database: String,
}
