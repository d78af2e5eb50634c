use rocket::{Request, catch, http::Status, response::content::RawJson};

use crate::errors::catcher_body;

pub mod banners;
pub mod misc;

#[catch(401)]
pub fn catch401(_: &Request) -> RawJson<String> {
    RawJson(catcher_body(Status::Unauthorized))
}

#[catch(404)]
pub fn catch404(_: &Request) -> RawJson<String> {
    RawJson(catcher_body(Status::NotFound))
}

#[catch(500)]
pub fn catch500(_: &Request) -> RawJson<String> {
    RawJson(catcher_body(Status::InternalServerError))
}
