//! Client for the monitoring backend's HTTP JSON API.
//!
//! The console does not compute anything itself: it builds requests from
//! the current filters, checks the `{ success, ... }` envelope and hands the
//! payload on. [`DashboardApi`] is the seam the rest of the crate depends on;
//! [`HttpDashboardApi`] is the reqwest implementation.

mod error;
pub mod types;

pub use error::{ApiError, CONNECTIVITY_MESSAGE};
pub use types::*;

use crate::config::ApiConfig;
use crate::filter::FilterCriteria;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Message used when a rejected envelope carries no text of its own.
const GENERIC_FAILURE: &str = "Request failed";

/// Queries the console issues against the backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// POST `/login`
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// GET `/options`
    async fn options(&self) -> Result<FilterOptions, ApiError>;

    /// GET `/data` with every filter parameter
    async fn data(&self, criteria: &FilterCriteria) -> Result<TelemetryResponse, ApiError>;

    /// GET `/analytics?window=`
    async fn analytics(&self, window: u32) -> Result<AnalyticsPayload, ApiError>;

    /// GET `/insights?window=`
    async fn insights(&self, window: u32) -> Result<Insights, ApiError>;

    /// GET `/login-history?limit=`
    async fn login_history(&self, limit: u32) -> Result<LoginHistory, ApiError>;

    /// GET `/login-stats`
    async fn login_stats(&self) -> Result<BTreeMap<String, UserLoginStats>, ApiError>;

    /// GET `/health`
    async fn health(&self) -> Result<BackendHealth, ApiError>;
}

/// reqwest-backed [`DashboardApi`].
pub struct HttpDashboardApi {
    base_url: String,
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpDashboardApi {
    /// Create a client with its own connection pool.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Connectivity(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    /// Create with a caller-supplied HTTP client (for testing).
    pub fn with_client(config: &ApiConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout_seconds: config.timeout_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;
        self.read_envelope(path, response).await
    }

    /// Read a response body and validate its `success` flag.
    ///
    /// The backend reports failures as an envelope with a 4xx/5xx status, so
    /// the body is parsed before the status code is considered.
    async fn read_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify_error(e))?;

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) if status.is_success() => {
                return Err(ApiError::InvalidResponse(e.to_string()));
            }
            Err(_) => {
                return Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message: format!("HTTP {}", status),
                });
            }
        };

        if !envelope_succeeded(&value) {
            let message = envelope_message(&value).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            tracing::warn!(path, status = status.as_u16(), %message, "Backend rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(path, error = %e, "Backend payload did not match expected shape");
            ApiError::InvalidResponse(e.to_string())
        })
    }

    /// Classify reqwest error into ApiError.
    fn classify_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_seconds)
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Connectivity(e.to_string())
        }
    }
}

fn envelope_succeeded(value: &Value) -> bool {
    value.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Server-supplied failure text: `message` first, then `error`.
fn envelope_message(value: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;
        self.read_envelope("/login", response).await
    }

    async fn options(&self) -> Result<FilterOptions, ApiError> {
        self.get("/options", &[]).await
    }

    async fn data(&self, criteria: &FilterCriteria) -> Result<TelemetryResponse, ApiError> {
        self.get("/data", &criteria.query_pairs()).await
    }

    async fn analytics(&self, window: u32) -> Result<AnalyticsPayload, ApiError> {
        self.get("/analytics", &[("window", window.to_string())]).await
    }

    async fn insights(&self, window: u32) -> Result<Insights, ApiError> {
        let envelope: InsightsEnvelope = self
            .get("/insights", &[("window", window.to_string())])
            .await?;
        Ok(envelope.insights)
    }

    async fn login_history(&self, limit: u32) -> Result<LoginHistory, ApiError> {
        self.get("/login-history", &[("limit", limit.to_string())])
            .await
    }

    async fn login_stats(&self) -> Result<BTreeMap<String, UserLoginStats>, ApiError> {
        let envelope: LoginStatsEnvelope = self.get("/login-stats", &[]).await?;
        Ok(envelope.stats)
    }

    async fn health(&self) -> Result<BackendHealth, ApiError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: format!("HTTP {}", status),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
