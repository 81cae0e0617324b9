//! Credential setup instructions and error hints

use crate::cli::style::{arrow, Stylize};
use anstream::eprintln;
use asc_submit::auth::{ENV_ISSUER_ID, ENV_KEY_ID, ENV_KEY_PATH};
use asc_submit::config::ENV_BASE_URL;
use asc_submit::error::Error;

/// Print how to set up App Store Connect API credentials
pub fn print_auth_setup() {
    eprintln!();
    eprintln!("{}", "App Store Connect API Setup".emphasis().for_stderr());
    eprintln!("{}", "===========================".emphasis().for_stderr());
    eprintln!();
    eprintln!("1. Create an API key in App Store Connect");
    eprintln!("   Users and Access > Integrations > App Store Connect API");
    eprintln!("   The key needs the App Manager role.");
    eprintln!();
    eprintln!("2. Download the .p8 key file (it can only be downloaded once)");
    eprintln!("   Default location: ~/.appstoreconnect/private_keys/AuthKey_<KEY_ID>.p8");
    eprintln!();
    eprintln!("3. Export the credentials:");
    eprintln!("   export {ENV_KEY_ID}=<key id>");
    eprintln!("   export {ENV_ISSUER_ID}=<issuer id>");
    eprintln!("   export {ENV_KEY_PATH}=<path to .p8>   {}", "(optional)".muted());
    eprintln!();
    eprintln!(
        "{}",
        format!("{ENV_BASE_URL} overrides the API endpoint.").muted()
    );
}

/// Print an error and any follow-up hint that applies to it
pub fn report_error(err: &Error) {
    eprintln!();
    eprintln!("{}: {}", "error".error(), err);

    match err {
        Error::MissingCredentials(_) => print_auth_setup(),
        Error::KeyFileNotFound(_) => {
            eprintln!(
                "  {} Set {ENV_KEY_PATH} or place the key at the default location",
                arrow()
            );
        }
        Error::ProjectNotFound(_) | Error::BundleIdNotFound(_) => {
            eprintln!("  {} Use --bundle-id to specify it manually", arrow());
        }
        Error::BuildNeverAppeared { .. } => {
            eprintln!(
                "  {} Check that the upload finished, or raise --max-wait-minutes",
                arrow()
            );
        }
        Error::BuildStillProcessing { .. } => {
            eprintln!("  {} Run the same command again once processing ends", arrow());
        }
        _ => {}
    }

    if err.is_configuration() {
        eprintln!("{}", "Nothing was sent to App Store Connect.".muted().for_stderr());
    }
}
