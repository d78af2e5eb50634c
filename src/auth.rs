use rocket::State;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::CronAuthError;

/// Shared secret the scheduler presents when calling the cleanup route.
///
/// Only the SHA-256 digest is kept in memory. With no secret configured the
/// route stays open.
#[derive(Debug, Clone, Default)]
pub struct CronSecret {
    secret_hash: Option<String>,
}

impl CronSecret {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret_hash: secret.map(Self::hash_secret),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret_hash.is_some()
    }

    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn extract_bearer_token(auth_header: &str) -> Result<&str, CronAuthError> {
        auth_header
            .strip_prefix("Bearer ")
            .ok_or(CronAuthError::InvalidFormat)
    }

    fn digest_matches(expected: &str, token: &str) -> bool {
        Self::hash_secret(token)
            .as_bytes()
            .ct_eq(expected.as_bytes())
            .into()
    }

    pub fn verify(&self, auth_header: Option<&str>) -> Result<(), CronAuthError> {
        let Some(expected) = &self.secret_hash else {
            return Ok(());
        };

        let token = Self::extract_bearer_token(auth_header.ok_or(CronAuthError::MissingHeader)?)?;

        if Self::digest_matches(expected, token.trim()) {
            Ok(())
        } else {
            Err(CronAuthError::InvalidSecret)
        }
    }
}

/// Request guard for the scheduled cleanup route.
pub struct CronCaller;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CronCaller {
    type Error = CronAuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let secret = match request.guard::<&State<CronSecret>>().await {
            Outcome::Success(secret) => secret,
            _ => return Outcome::Success(CronCaller),
        };

        match secret.verify(request.headers().get_one("Authorization")) {
            Ok(()) => Outcome::Success(CronCaller),
            Err(e) => Outcome::Error((Status::Unauthorized, e)),
        }
    }
}
