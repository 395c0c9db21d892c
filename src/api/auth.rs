use log::info;
use rocket::{
    http::{Cookie, CookieJar, Status},
    serde::json::{Error as JsonError, Json},
    Route, State,
};

use super::json_body;
use crate::{
    config::Config,
    error::Result,
    model::{
        admin::AdminCredentials,
        session::{AdminSession, AUTH_TOKEN_COOKIE},
    },
};

pub fn routes() -> Vec<Route> {
    routes![authenticate, logout]
}

#[post("/auth/admin", data = "<credentials>", format = "json")]
pub async fn authenticate(
    cookies: &CookieJar<'_>,
    credentials: std::result::Result<Json<AdminCredentials>, JsonError<'_>>,
    config: &State<Config>,
) -> Result<()> {
    let credentials = json_body(credentials)?;
    let admin = config.admin();
    admin.authenticate(&credentials)?;

    let session = AdminSession::start(&admin, config.auth_ttl());
    info!(
        "Admin {} logged in, session expires at {}",
        session.username, session.expire_at
    );
    cookies.add(session.into_cookie(config));

    Ok(())
}

#[delete("/auth")]
pub fn logout(cookies: &CookieJar<'_>) -> Status {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
    Status::Ok
}
