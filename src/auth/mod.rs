//! App Store Connect authentication
//!
//! Credentials come from environment variables; every request is signed
//! with a short-lived ES256 token.

mod credentials;
mod token;

pub use credentials::{
    default_key_path, Credentials, ENV_ISSUER_ID, ENV_KEY_ID, ENV_KEY_PATH,
};
pub use token::{Claims, TokenSigner, TOKEN_AUDIENCE, TOKEN_LIFETIME_SECS};
