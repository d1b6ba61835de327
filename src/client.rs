//! HTTP client for the audit backend.
//!
//! Every call makes exactly one attempt bounded by the configured deadline.
//! What happens on failure is decided in one place: with fallback allowed the
//! [`SampleProvider`] answers instead, otherwise the failure surfaces as
//! [`ZakatError::Network`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::advisory::Advisory;
use crate::audit::{AuditResult, ServerHealth, ShariahStandard};
use crate::balance_sheet::{BalanceSheet, CalculationRequest};
use crate::config::ClientConfig;
use crate::result::ZakatResult;
use crate::samples::{Sample, SampleKind, StaticSampleProvider};
use crate::traits::{AdvisoryProvider, SampleProvider};
use crate::types::{FetchFailure, ZakatError};

/// Result of a single deadline-bound request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(FetchFailure),
}

impl<T> FetchOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<T, FetchFailure> {
        match self {
            FetchOutcome::Success(value) => Ok(value),
            FetchOutcome::Failure(failure) => Err(failure),
        }
    }
}

#[derive(Serialize)]
struct AuditRequest<'a> {
    product_text: &'a str,
    use_search: bool,
}

#[derive(Deserialize)]
struct StandardsResponse {
    #[serde(default)]
    standards: Vec<ShariahStandard>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ShariahStandard>,
}

#[derive(Serialize)]
struct AdvisoryRequest<'a> {
    #[serde(flatten)]
    request: CalculationRequest,
    calculation: &'a ZakatResult,
}

pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    samples: Arc<dyn SampleProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client serving the built-in samples on fallback.
    pub fn new(config: ClientConfig) -> Result<Self, ZakatError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ZakatError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            samples: Arc::new(StaticSampleProvider),
        })
    }

    pub fn with_samples(mut self, samples: Arc<dyn SampleProvider>) -> Self {
        self.samples = samples;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `request` once and decodes the JSON body, giving up after `budget`.
    pub async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, budget: Duration) -> FetchOutcome<T> {
        match tokio::time::timeout(budget, send_and_decode(request)).await {
            Ok(Ok(value)) => FetchOutcome::Success(value),
            Ok(Err(failure)) => FetchOutcome::Failure(failure),
            Err(_) => FetchOutcome::Failure(FetchFailure::Timeout {
                budget_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn fetch_default<T: DeserializeOwned>(&self, request: RequestBuilder) -> FetchOutcome<T> {
        self.fetch(request, self.config.request_timeout()).await
    }

    fn resolve<T>(
        &self,
        outcome: FetchOutcome<T>,
        kind: SampleKind,
        convert: impl FnOnce(Sample) -> Result<T, ZakatError>,
    ) -> Result<T, ZakatError> {
        match outcome {
            FetchOutcome::Success(value) => Ok(value),
            FetchOutcome::Failure(failure) if self.config.allow_fallback => {
                tracing::warn!(error = %failure, ?kind, "Backend request failed; serving sample data");
                convert(self.samples.provide_sample(&kind)?)
            }
            FetchOutcome::Failure(failure) => {
                tracing::error!(error = %failure, ?kind, "Backend request failed");
                Err(ZakatError::Network(failure))
            }
        }
    }

    /// Submits a contract text for a compliance audit.
    pub async fn audit_product(&self, product_text: &str, use_search: bool) -> Result<AuditResult, ZakatError> {
        if product_text.trim().is_empty() {
            return Err(ZakatError::invalid_input("product_text", "contract text must not be empty"));
        }

        let request = self
            .http
            .post(self.config.endpoint("audit"))
            .json(&AuditRequest { product_text, use_search });
        let outcome = self.fetch_default(request).await;
        self.resolve(outcome, SampleKind::AuditReport, Sample::into_audit_report)
    }

    pub async fn fetch_applicable_standards(&self, product_type: &str) -> Result<Vec<ShariahStandard>, ZakatError> {
        let request = self
            .http
            .get(self.config.endpoint("applicable-standards"))
            .query(&[("product_type", product_type)]);
        let outcome = match self.fetch_default::<StandardsResponse>(request).await {
            FetchOutcome::Success(body) => FetchOutcome::Success(body.standards),
            FetchOutcome::Failure(failure) => FetchOutcome::Failure(failure),
        };
        let kind = SampleKind::ApplicableStandards {
            product_type: product_type.to_string(),
        };
        self.resolve(outcome, kind, Sample::into_standards)
    }

    pub async fn search_standards(&self, query: &str) -> Result<Vec<ShariahStandard>, ZakatError> {
        let request = self
            .http
            .get(self.config.endpoint("search-standards"))
            .query(&[("query", query)]);
        let outcome = match self.fetch_default::<SearchResponse>(request).await {
            FetchOutcome::Success(body) => FetchOutcome::Success(body.results),
            FetchOutcome::Failure(failure) => FetchOutcome::Failure(failure),
        };
        let kind = SampleKind::StandardsSearch { query: query.to_string() };
        self.resolve(outcome, kind, Sample::into_standards)
    }

    /// Never fails: an unreachable backend reports `demo` when fallback is
    /// allowed and `unavailable` otherwise.
    pub async fn check_server_health(&self) -> ServerHealth {
        let request = self.http.get(self.config.health_url());
        match self.fetch_default::<ServerHealth>(request).await {
            FetchOutcome::Success(mut health) => {
                health.is_demo_mode = false;
                health
            }
            FetchOutcome::Failure(failure) if self.config.allow_fallback => {
                tracing::warn!(error = %failure, "Health check failed; running in demo mode");
                self.samples
                    .provide_sample(&SampleKind::Health)
                    .and_then(Sample::into_health)
                    .unwrap_or_else(|_| ServerHealth::demo())
            }
            FetchOutcome::Failure(failure) => {
                tracing::error!(error = %failure, "Health check failed");
                ServerHealth::unavailable()
            }
        }
    }

    /// Asks the backend for commentary on a finished calculation.
    ///
    /// Unlike the other calls this one ignores `allow_fallback`; the caller
    /// substitutes placeholder text on any error.
    pub async fn request_advisory(&self, sheet: &BalanceSheet, result: &ZakatResult) -> Result<Advisory, ZakatError> {
        let body = AdvisoryRequest {
            request: CalculationRequest::new(sheet.clone(), result.entity_info.clone()),
            calculation: result,
        };
        let request = self.http.post(self.config.endpoint("zakat-calculate")).json(&body);
        Ok(self.fetch_default::<Advisory>(request).await.into_result()?)
    }
}

#[async_trait::async_trait]
impl AdvisoryProvider for ApiClient {
    async fn advise(&self, sheet: &BalanceSheet, result: &ZakatResult) -> Result<Advisory, ZakatError> {
        self.request_advisory(sheet, result).await
    }
}

async fn send_and_decode<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchFailure> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchFailure::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchFailure::Status(status.as_u16()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchFailure::Transport(format!("undecodable response body: {}", e)))
}
