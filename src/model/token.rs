use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use data_encoding::HEXLOWER;
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::error::{Error, Result};

/// Length of a token digest in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// SHA-256 digest of a voter token. This is the only form in which a token is
/// ever stored, so the algorithm must never change: doing so would orphan every
/// token already issued.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenDigest([u8; DIGEST_LENGTH]);

impl TokenDigest {
    /// Digest the given raw token. Surrounding whitespace is not significant.
    pub fn of(raw_token: &str) -> Self {
        Self(Sha256::digest(raw_token.trim().as_bytes()).into())
    }
}

impl Display for TokenDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", HEXLOWER.encode(&self.0))
    }
}

impl Debug for TokenDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenDigest({self})")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestParseError {
    #[error("digest is not valid lowercase hex")]
    NotHex,
    #[error("digest must be {DIGEST_LENGTH} bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for TokenDigest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = HEXLOWER
            .decode(s.as_bytes())
            .map_err(|_| DigestParseError::NotHex)?;
        let len = bytes.len();
        let bytes: [u8; DIGEST_LENGTH] = bytes
            .try_into()
            .map_err(|_| DigestParseError::InvalidLength(len))?;
        Ok(Self(bytes))
    }
}

impl Serialize for TokenDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A registered voter token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub token_hash: TokenDigest,
    pub voter_id: String,
    pub used: bool,
}

impl TokenRecord {
    pub fn new(token_hash: TokenDigest, voter_id: String) -> Self {
        Self {
            token_hash,
            voter_id,
            used: false,
        }
    }
}

/// A raw token to be issued to a voter, as submitted by an admin.
/// The plaintext is digested on registration and then dropped.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSpec {
    pub token: String,
    pub voter_id: String,
}

impl TokenSpec {
    pub fn new(token: impl Into<String>, voter_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            voter_id: voter_id.into(),
        }
    }

    /// Digest the token and trim the voter ID, rejecting blank fields.
    pub fn into_record(self) -> Result<TokenRecord> {
        let voter_id = self.voter_id.trim();
        if self.token.trim().is_empty() || voter_id.is_empty() {
            return Err(Error::InvalidInput(
                "token and voter ID must both be non-empty".to_string(),
            ));
        }
        Ok(TokenRecord::new(
            TokenDigest::of(&self.token),
            voter_id.to_string(),
        ))
    }
}

#[cfg(test)]
mod examples {
    use super::*;

    impl TokenSpec {
        pub fn example() -> Self {
            Self::new("tok-1", "V1")
        }

        pub fn example2() -> Self {
            Self::new("tok-2", "V2")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_sha256_of_trimmed_token() {
        // sha256("abc")
        let expected = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert_eq!(TokenDigest::of("abc").to_string(), expected);
        assert_eq!(TokenDigest::of("  abc\n").to_string(), expected);
        assert_ne!(TokenDigest::of("abd"), TokenDigest::of("abc"));
    }

    #[test]
    fn digest_parse() {
        let digest = TokenDigest::of("tok-1");
        assert_eq!(digest.to_string().parse::<TokenDigest>(), Ok(digest));
        assert_eq!(
            "zz".parse::<TokenDigest>(),
            Err(DigestParseError::NotHex)
        );
        assert_eq!(
            "abcd".parse::<TokenDigest>(),
            Err(DigestParseError::InvalidLength(2))
        );
    }

    #[test]
    fn blank_spec_rejected() {
        assert!(matches!(
            TokenSpec::new("   ", "V1").into_record(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            TokenSpec::new("tok-1", "").into_record(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn spec_into_record() {
        let record = TokenSpec::new(" tok-1 ", " V1 ").into_record().unwrap();
        assert_eq!(record.token_hash, TokenDigest::of("tok-1"));
        assert_eq!(record.voter_id, "V1");
        assert!(!record.used);
    }
}
