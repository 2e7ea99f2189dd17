use async_trait::async_trait;
use pcc_policy::CompliancePolicy;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

pub const AUTHENTICATE_PATH: &str = "/api/v1/authenticate";
pub const COMPLIANCE_CONTAINER_PATH: &str = "/api/v1/policies/compliance/container";

/// Whole-policy access to the container compliance policy.
///
/// There is no per-rule verb: callers always read or replace the full rule
/// set.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn get_compliance_container(&self) -> Result<CompliancePolicy>;

    async fn update_compliance_container(&self, policy: &CompliancePolicy) -> Result<()>;
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
}

/// Console client authenticated with a bearer token.
pub struct HttpPolicyClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpPolicyClient {
    /// Build the HTTP client and exchange credentials for a token.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.skip_cert_verification)
            .build()?;

        let base_url = config.base_url().to_string();
        let token = authenticate(&http, &base_url, config).await?;
        tracing::info!("Authenticated to console at {}", base_url);

        Ok(HttpPolicyClient {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }
}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn get_compliance_container(&self) -> Result<CompliancePolicy> {
        tracing::debug!("GET {}", COMPLIANCE_CONTAINER_PATH);
        let resp = self
            .request(Method::GET, COMPLIANCE_CONTAINER_PATH)
            .send()
            .await?;
        let resp = check_status("GET", COMPLIANCE_CONTAINER_PATH, resp).await?;

        let body = resp.text().await?;
        let policy = CompliancePolicy::from_json(&body)?;
        tracing::debug!("Fetched {} rules", policy.rules.len());
        Ok(policy)
    }

    async fn update_compliance_container(&self, policy: &CompliancePolicy) -> Result<()> {
        tracing::debug!(
            "PUT {} ({} rules)",
            COMPLIANCE_CONTAINER_PATH,
            policy.rules.len()
        );
        let resp = self
            .request(Method::PUT, COMPLIANCE_CONTAINER_PATH)
            .header(CONTENT_TYPE, "application/json")
            .body(policy.to_json()?)
            .send()
            .await?;
        check_status("PUT", COMPLIANCE_CONTAINER_PATH, resp).await?;
        Ok(())
    }
}

async fn authenticate(
    http: &reqwest::Client,
    base_url: &str,
    config: &ClientConfig,
) -> Result<String> {
    let resp = http
        .post(format!("{}{}", base_url, AUTHENTICATE_PATH))
        .json(&AuthRequest {
            username: &config.username,
            password: &config.password,
        })
        .send()
        .await?;

    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ClientError::Authentication(format!(
            "console rejected credentials for user '{}' ({})",
            config.username, status
        )));
    }
    let resp = check_status("POST", AUTHENTICATE_PATH, resp).await?;

    let auth: AuthResponse = serde_json::from_str(&resp.text().await?)?;
    if auth.token.is_empty() {
        return Err(ClientError::Authentication(
            "console returned an empty token".to_string(),
        ));
    }
    Ok(auth.token)
}

async fn check_status(
    method: &'static str,
    path: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::warn!("{} {} failed with status {}", method, path, status);
    Err(ClientError::Status {
        method,
        path: path.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}
