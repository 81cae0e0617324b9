//! API key credentials from the environment

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Environment variable holding the API key ID
pub const ENV_KEY_ID: &str = "APP_STORE_API_KEY_ID";
/// Environment variable holding the issuer ID
pub const ENV_ISSUER_ID: &str = "APP_STORE_ISSUER_ID";
/// Environment variable overriding the `.p8` key location
pub const ENV_KEY_PATH: &str = "APP_STORE_P8_KEY_PATH";

/// App Store Connect API key credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key ID (JWT `kid`)
    pub key_id: String,
    /// Issuer ID (JWT `iss`)
    pub issuer_id: String,
    /// Path to the `.p8` private key
    pub key_path: PathBuf,
}

impl Credentials {
    /// Load credentials through a variable lookup function
    ///
    /// All missing required variables are reported together. Empty values
    /// count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let key_id = get(ENV_KEY_ID);
        let issuer_id = get(ENV_ISSUER_ID);

        let (Some(key_id), Some(issuer_id)) = (key_id.as_ref(), issuer_id.as_ref()) else {
            let missing = [(ENV_KEY_ID, key_id.is_none()), (ENV_ISSUER_ID, issuer_id.is_none())]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(Error::MissingCredentials(missing));
        };
        let (key_id, issuer_id) = (key_id.clone(), issuer_id.clone());

        let key_path = get(ENV_KEY_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_key_path(&key_id));

        Ok(Self {
            key_id,
            issuer_id,
            key_path,
        })
    }
}

/// Default key location: `~/.appstoreconnect/private_keys/AuthKey_<KEY_ID>.p8`
pub fn default_key_path(key_id: &str) -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".appstoreconnect")
        .join("private_keys")
        .join(format!("AuthKey_{key_id}.p8"))
}
