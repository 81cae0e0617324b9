//! ES256 token signing

use crate::auth::Credentials;
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

/// JWT audience required by App Store Connect
pub const TOKEN_AUDIENCE: &str = "appstoreconnect-v1";

/// Token lifetime; the API rejects tokens valid for more than 20 minutes
pub const TOKEN_LIFETIME_SECS: i64 = 19 * 60;

/// JWT claims for App Store Connect
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer ID
    pub iss: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Audience
    pub aud: String,
}

/// Signs request tokens with the API private key
///
/// The key is read and parsed once; a fresh token is produced on every call
/// to [`TokenSigner::sign`].
pub struct TokenSigner {
    key_id: String,
    issuer_id: String,
    key: EncodingKey,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key_id", &self.key_id)
            .field("issuer_id", &self.issuer_id)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Load the `.p8` key named by the credentials
    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let path = &credentials.key_path;
        if !path.is_file() {
            return Err(Error::KeyFileNotFound(path.clone()));
        }

        let pem = fs::read(path)?;
        let key = EncodingKey::from_ec_pem(&pem).map_err(|e| Error::InvalidKey {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            key_id: credentials.key_id.clone(),
            issuer_id: credentials.issuer_id.clone(),
            key,
        })
    }

    /// Sign a token valid from now
    pub fn sign(&self) -> Result<String> {
        self.sign_at(Utc::now().timestamp())
    }

    /// Sign a token issued at `issued_at` (unix seconds)
    pub fn sign_at(&self, issued_at: i64) -> Result<String> {
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());

        let claims = Claims {
            iss: self.issuer_id.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
            aud: TOKEN_AUDIENCE.to_string(),
        };

        Ok(encode(&header, &claims, &self.key)?)
    }
}
