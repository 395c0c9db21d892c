use rocket::{
    http::Status,
    serde::json::{Error as JsonError, Json},
    Catcher, Request, Route,
};

use crate::error::{Error, ErrorBody, Result};

mod admin;
pub mod auth;
mod public;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(admin::routes());
    routes.extend(public::routes());
    routes.extend(auth::routes());
    routes.extend(voting::routes());
    routes
}

/// Unwrap a JSON request body, reporting a missing or mistyped field as
/// [`Error::InvalidInput`] instead of a bare status.
fn json_body<T>(body: std::result::Result<Json<T>, JsonError<'_>>) -> Result<T> {
    body.map(Json::into_inner)
        .map_err(|e| Error::InvalidInput(e.to_string()))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![unauthorized, default_catcher]
}

/// Reached when an admin-gated route is requested without a valid session.
#[catch(401)]
fn unauthorized() -> (Status, Json<ErrorBody>) {
    (
        Status::Unauthorized,
        Json(ErrorBody {
            error: "Unauthorized: admin session missing or expired, please log in".to_string(),
        }),
    )
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: status.reason().unwrap_or("Unknown error").to_string(),
        }),
    )
}
