use argon2::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Core admin user data: a username and an argon2-encoded password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCore {
    pub username: String,
    pub password_hash: String,
}

impl AdminCore {
    /// Check whether the given password is correct.
    /// A malformed stored hash never verifies.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or(false)
    }

    /// Check the given credentials against this admin.
    pub fn authenticate(&self, credentials: &AdminCredentials) -> Result<()> {
        if credentials.username == self.username && self.verify_password(&credentials.password) {
            Ok(())
        } else {
            Err(Error::Unauthorized(
                "No admin found with the provided username and password combination.".to_string(),
            ))
        }
    }
}

/// Raw admin credentials, received from a user. These are never stored directly,
/// since the password is in plaintext.
#[derive(Clone, Deserialize, Serialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl TryFrom<AdminCredentials> for AdminCore {
    type Error = Error;

    /// Convert [`AdminCredentials`] to an [`AdminCore`] by hashing the password.
    /// This enforces that the username is non-empty, and the password meets minimum length.
    fn try_from(cred: AdminCredentials) -> Result<Self> {
        if cred.username.is_empty() || cred.password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::InvalidInput("Illegal admin credentials".to_string()));
        }

        // 16 bytes is recommended for password hashing:
        //  https://en.wikipedia.org/wiki/Argon2
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill(&mut salt);
        let password_hash =
            argon2::hash_encoded(cred.password.as_bytes(), &salt, &Config::default())
                .map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(Self {
            username: cred.username,
            password_hash,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let admin = AdminCore::try_from(AdminCredentials::example()).unwrap();
        assert_ne!(admin.password_hash, AdminCredentials::example().password);
        assert!(admin.verify_password(AdminCredentials::example().password));
        assert!(!admin.verify_password("admin123"));
        assert!(admin.authenticate(&AdminCredentials::example()).is_ok());
    }

    #[test]
    fn wrong_username_rejected() {
        let admin = AdminCore::try_from(AdminCredentials::example()).unwrap();
        let creds = AdminCredentials {
            username: "someone-else".into(),
            password: AdminCredentials::example().password,
        };
        assert!(matches!(
            admin.authenticate(&creds),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn illegal_credentials() {
        assert!(AdminCore::try_from(AdminCredentials::empty()).is_err());
        let short = AdminCredentials {
            username: "rotaract".into(),
            password: "short".into(),
        };
        assert!(AdminCore::try_from(short).is_err());
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let admin = AdminCore {
            username: "rotaract".into(),
            password_hash: "not a hash".into(),
        };
        assert!(!admin.verify_password("anything"));
    }
}
