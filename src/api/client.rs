//! App Store Connect client using reqwest

use crate::api::models::{
    attach_build_body, confirm_submission_body, create_review_submission_body,
    create_version_body, legacy_submission_body, release_notes_body, review_item_body, AppAttributes,
    BuildAttributes, Document, Empty, ErrorDocument, LocalizationAttributes, Resource,
    VersionAttributes,
};
use crate::api::{AppStoreApi, RetryPolicy};
use crate::auth::TokenSigner;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{App, AppStoreVersion, Build, Localization, Platform, ReviewSubmission};
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Page size used when listing localizations (API maximum)
const LOCALIZATION_PAGE_SIZE: &str = "200";

/// Outcome of a single HTTP attempt
enum Attempt {
    Success(Value),
    RateLimited(Option<String>),
    Failed(Error),
}

/// App Store Connect service using reqwest
pub struct AppStoreConnectClient {
    client: Client,
    base_url: String,
    signer: TokenSigner,
    retry: RetryPolicy,
}

impl AppStoreConnectClient {
    /// Create a client, loading the signing key named in the config
    pub fn new(config: &Config) -> Result<Self> {
        let signer = TokenSigner::from_credentials(&config.credentials)?;
        Self::with_signer(config, signer)
    }

    /// Create a client with an already loaded signer
    pub fn with_signer(config: &Config, signer: TokenSigner) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            signer,
            retry: config.retry,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make an authenticated request, retrying per the retry policy
    ///
    /// A fresh token is signed for every attempt. Returns the decoded JSON
    /// body (`null` for empty bodies).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut attempt = 1;
        let mut rate_limit_waits = 0;

        loop {
            let failure = match self.send_once(&method, path, query, body).await? {
                Attempt::Success(value) => return Ok(value),
                Attempt::RateLimited(retry_after) => {
                    if rate_limit_waits >= self.retry.max_rate_limit_waits {
                        return Err(Error::RateLimited(rate_limit_waits));
                    }
                    rate_limit_waits += 1;
                    let wait = self.retry.rate_limit_wait(retry_after.as_deref());
                    warn!("Rate limited. Waiting {}s...", wait.as_secs());
                    sleep(wait).await;
                    continue;
                }
                Attempt::Failed(err) => err,
            };

            let Some(delay) = self.retry.next_delay(attempt) else {
                return Err(Error::RetriesExhausted {
                    method: method.to_string(),
                    path: path.to_string(),
                    attempts: attempt,
                    last: Box::new(failure),
                });
            };

            warn!(
                "{method} {path}: {failure}. Retrying... (attempt {}/{})",
                attempt + 1,
                self.retry.max_attempts
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Attempt> {
        let token = self.signer.sign()?;
        let url = self.api_url(path);
        debug!("{method} {url}");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    warn!("Request timed out: {method} {path}");
                }
                return Ok(Attempt::Failed(Error::Http(e)));
            }
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);
            return Ok(Attempt::RateLimited(retry_after));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(Attempt::Failed(Error::Http(e))),
        };

        if status.is_client_error() || status.is_server_error() {
            let detail = serde_json::from_str::<ErrorDocument>(&text)
                .ok()
                .and_then(|doc| doc.first_detail())
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("API Error ({}): {detail}", status.as_u16());
            return Ok(Attempt::Failed(Error::Api {
                status: status.as_u16(),
                detail,
            }));
        }

        if text.trim().is_empty() {
            return Ok(Attempt::Success(Value::Null));
        }
        Ok(Attempt::Success(serde_json::from_str(&text)?))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let value = self.request(Method::GET, path, query, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let value = self.request(Method::POST, path, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn post_ignoring_response(&self, path: &str, body: &Value) -> Result<()> {
        self.request(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<()> {
        self.request(Method::PATCH, path, &[], Some(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl AppStoreApi for AppStoreConnectClient {
    async fn find_app(&self, bundle_id: &str) -> Result<Option<App>> {
        let apps: Document<Vec<Resource<AppAttributes>>> = self
            .get("/apps", &[("filter[bundleId]", bundle_id)])
            .await?;

        Ok(apps.data.into_iter().next().map(|r| r.into_app(bundle_id)))
    }

    async fn recent_builds(&self, app_id: &str, limit: u32) -> Result<Vec<Build>> {
        let limit = limit.to_string();
        let builds: Document<Vec<Resource<BuildAttributes>>> = self
            .get(
                "/builds",
                &[
                    ("filter[app]", app_id),
                    ("sort", "-uploadedDate"),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        Ok(builds.data.into_iter().map(Build::from).collect())
    }

    async fn find_version(
        &self,
        app_id: &str,
        version_string: &str,
        platform: Platform,
    ) -> Result<Option<AppStoreVersion>> {
        let versions: Document<Vec<Resource<VersionAttributes>>> = self
            .get(
                &format!("/apps/{app_id}/appStoreVersions"),
                &[
                    ("filter[platform]", platform.as_api_str()),
                    ("filter[versionString]", version_string),
                ],
            )
            .await?;

        Ok(versions
            .data
            .into_iter()
            .next()
            .map(|r| r.into_version(version_string)))
    }

    async fn create_version(
        &self,
        app_id: &str,
        version_string: &str,
        platform: Platform,
    ) -> Result<AppStoreVersion> {
        let created: Document<Resource<VersionAttributes>> = self
            .post(
                "/appStoreVersions",
                &create_version_body(app_id, version_string, platform),
            )
            .await?;

        Ok(created.data.into_version(version_string))
    }

    async fn attach_build(&self, version_id: &str, build_id: &str) -> Result<()> {
        self.patch(
            &format!("/appStoreVersions/{version_id}"),
            &attach_build_body(version_id, build_id),
        )
        .await
    }

    async fn list_localizations(&self, version_id: &str) -> Result<Vec<Localization>> {
        let localizations: Document<Vec<Resource<LocalizationAttributes>>> = self
            .get(
                &format!("/appStoreVersions/{version_id}/appStoreVersionLocalizations"),
                &[("limit", LOCALIZATION_PAGE_SIZE)],
            )
            .await?;

        Ok(localizations.data.into_iter().map(Localization::from).collect())
    }

    async fn update_release_notes(&self, localization_id: &str, notes: &str) -> Result<()> {
        self.patch(
            &format!("/appStoreVersionLocalizations/{localization_id}"),
            &release_notes_body(localization_id, notes),
        )
        .await
    }

    async fn create_review_submission(
        &self,
        app_id: &str,
        platform: Platform,
    ) -> Result<ReviewSubmission> {
        let created: Document<Resource<Empty>> = self
            .post(
                "/reviewSubmissions",
                &create_review_submission_body(app_id, platform),
            )
            .await?;

        Ok(created.data.into())
    }

    async fn add_review_item(&self, submission_id: &str, version_id: &str) -> Result<()> {
        self.post_ignoring_response(
            "/reviewSubmissionItems",
            &review_item_body(submission_id, version_id),
        )
        .await
    }

    async fn confirm_review_submission(&self, submission_id: &str) -> Result<()> {
        self.patch(
            &format!("/reviewSubmissions/{submission_id}"),
            &confirm_submission_body(submission_id),
        )
        .await
    }

    async fn submit_legacy(&self, version_id: &str) -> Result<()> {
        self.post_ignoring_response(
            "/appStoreVersionSubmissions",
            &legacy_submission_body(version_id),
        )
        .await
    }
}
