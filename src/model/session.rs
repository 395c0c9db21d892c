use chrono::{serde::ts_seconds, DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use log::debug;
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{FromRequest, Outcome},
    time::Duration as CookieDuration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::admin::AdminCore;

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// A time-boxed admin session. The expiry is fixed at login and is checked on
/// every admin-gated call; using a session never extends it.
///
/// Over HTTP this travels as the claims of a signed JWT in [`AUTH_TOKEN_COOKIE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    #[serde(rename = "sub")]
    pub username: String,
    #[serde(rename = "iat", with = "ts_seconds")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "exp", with = "ts_seconds")]
    pub expire_at: DateTime<Utc>,
}

impl AdminSession {
    /// Start a session for the given admin, valid for `ttl` from now.
    pub fn start(admin: &AdminCore, ttl: Duration) -> Self {
        Self::issued_at(admin.username.clone(), Utc::now(), ttl)
    }

    /// A session issued at an arbitrary instant.
    pub fn issued_at(username: String, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            username,
            issued_at,
            expire_at: issued_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expire_at
    }

    /// Fail with [`Error::Unauthorized`] if the session has expired by `now`.
    pub fn check(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_expired_at(now) {
            return Err(Error::Unauthorized(format!(
                "admin session for {} expired at {}, please log in again",
                self.username, self.expire_at
            )));
        }
        Ok(())
    }

    /// Serialize this session into a cookie. The cookie lives no longer than the session.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let remaining = (self.expire_at - Utc::now()).num_seconds().max(0);
        let token = jsonwebtoken::encode(
            &Header::default(),
            &self,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings");

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(CookieDuration::seconds(remaining))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize and validate a session from a cookie.
    pub fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Result<Self> {
        let mut validation = Validation::default();
        // The expiry is exact; no grace period.
        validation.leeway = 0;
        let session = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &validation,
        )
        .map(|data: TokenData<Self>| data.claims)?;
        session.check(Utc::now())?;
        Ok(session)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = Error;

    /// Get an [`AdminSession`] from the auth cookie, failing with 401 if it is
    /// missing, forged, or expired.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match req.guard::<&State<Config>>().await {
            Outcome::Success(config) => config,
            _ => {
                return Outcome::Failure((
                    Status::InternalServerError,
                    Error::Unavailable("configuration is not loaded".to_string()),
                ))
            }
        };

        let cookie = match req.cookies().get(AUTH_TOKEN_COOKIE) {
            Some(cookie) => cookie,
            None => {
                return Outcome::Failure((
                    Status::Unauthorized,
                    Error::Unauthorized("no admin session".to_string()),
                ))
            }
        };

        match Self::from_cookie(cookie, config) {
            Ok(session) => Outcome::Success(session),
            Err(e) => {
                debug!("Rejected admin session cookie: {e}");
                Outcome::Failure((Status::Unauthorized, e))
            }
        }
    }
}
