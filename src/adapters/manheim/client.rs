//! Manheim Valuations API client.
//!
//! Implements the ValuationClient port against the Manheim wholesale
//! valuation service: OAuth2 client-credentials authentication with a
//! cached access token, environment-specific base URLs, and retry with
//! exponential backoff on transient failures.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::domain::foundation::{Grade, Mileage};
use crate::domain::vehicle::{
    LookupKey, MarketStatistics, PriceBand, TransactionRecord, ValuationReport,
    VehicleDescription, VehicleQuery, WholesaleAverages,
};
use crate::ports::{ValuationClient, ValuationError};

/// Refresh the cached token this many seconds before it actually expires.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 300;

/// Configuration for the Manheim API client.
#[derive(Debug, Clone)]
pub struct ManheimClientConfig {
    /// OAuth2 client ID (kept secret).
    client_id: Secret<String>,

    /// OAuth2 client secret (kept secret).
    client_secret: Secret<String>,

    /// API base URL.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum number of retries for transient failures.
    pub max_retries: u32,
}

impl ManheimClientConfig {
    /// Creates a new configuration targeting the production environment.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Secret::new(client_id.into()),
            client_secret: Secret::new(client_secret.into()),
            base_url: "https://api.manheim.com".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }

    /// Sets a custom base URL (e.g. the UAT environment).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get the client ID (for internal use)
    fn client_id(&self) -> &str {
        self.client_id.expose_secret()
    }

    /// Get the client secret (for internal use)
    fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

/// A cached OAuth2 access token and its refresh deadline.
#[derive(Debug)]
struct CachedToken {
    access_token: Secret<String>,
    expires_at: Instant,
}

/// Manheim Valuations API client.
pub struct ManheimClient {
    config: ManheimClientConfig,
    client: Client,
    token: Mutex<Option<CachedToken>>,
}

impl ManheimClient {
    /// Creates a new Manheim client.
    pub fn new(config: ManheimClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            client,
            token: Mutex::new(None),
        }
    }

    /// Build the OAuth2 token endpoint URL
    fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.config.base_url)
    }

    /// Build the valuation URL for a lookup key.
    ///
    /// VIN qualifiers ride as path segments; a transmission segment is
    /// only ever emitted after a subseries segment.
    fn valuation_url(&self, key: &LookupKey) -> String {
        match key {
            LookupKey::Vin {
                vin,
                subseries,
                transmission,
            } => {
                let mut url = format!("{}/valuations/vin/{}", self.config.base_url, vin);
                if let Some(subseries) = subseries {
                    url.push('/');
                    url.push_str(subseries);
                    if let Some(transmission) = transmission {
                        url.push('/');
                        url.push_str(transmission);
                    }
                }
                url
            }
            LookupKey::YearMakeModel {
                year, make, model, ..
            } => {
                format!(
                    "{}/valuations/years/{}/makes/{}/models/{}",
                    self.config.base_url, year, make, model
                )
            }
        }
    }

    /// Query-string pairs for a valuation request. The YMM trim rides
    /// as a query parameter, ahead of the refinement parameters.
    fn request_query_pairs(query: &VehicleQuery) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let LookupKey::YearMakeModel {
            trim: Some(trim), ..
        } = query.key()
        {
            pairs.push(("trim", trim.clone()));
        }
        pairs.extend(query.params().to_query_pairs());
        pairs
    }

    /// Returns a valid access token, requesting a fresh one when the
    /// cache is empty or past its refresh deadline.
    async fn access_token(&self) -> Result<String, ValuationError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.expose_secret().clone());
            }
        }

        debug!("Requesting new Manheim access token");
        let fresh = self.request_token().await?;
        let access = fresh.access_token.expose_secret().clone();
        *cached = Some(fresh);
        Ok(access)
    }

    async fn request_token(&self) -> Result<CachedToken, ValuationError> {
        let response = self
            .client
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id()),
                ("client_secret", self.config.client_secret()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                400 | 401 | 403 => ValuationError::Authentication,
                429 => ValuationError::RateLimited,
                _ => ValuationError::network(format!("Token endpoint returned {}", status)),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ValuationError::parse(format!("Invalid token response: {}", e)))?;

        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        Ok(CachedToken {
            access_token: Secret::new(token.access_token),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }

    async fn request_valuation(
        &self,
        query: &VehicleQuery,
    ) -> Result<ValuationReport, ValuationError> {
        let token = self.access_token().await?;
        let url = self.valuation_url(query.key());

        debug!(query = %query, "Fetching Manheim valuation");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header("Accept", "application/json")
            .query(&Self::request_query_pairs(query))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            if matches!(status.as_u16(), 401 | 403) {
                // Token no longer valid; force a refresh on the next call.
                self.token.lock().await.take();
            }
            let body = response.text().await.unwrap_or_default();
            return Err(handle_response_status(status, &body, query));
        }

        let payload: ValuationResponse = response
            .json()
            .await
            .map_err(|e| ValuationError::parse(format!("Invalid valuation response: {}", e)))?;

        Ok(payload.into_report())
    }
}

/// Map reqwest transport failures onto the port error type
fn map_transport_error(e: reqwest::Error) -> ValuationError {
    if e.is_timeout() {
        ValuationError::network("Request timed out")
    } else if e.is_connect() {
        ValuationError::network(format!("Connection failed: {}", e))
    } else {
        ValuationError::network(format!("Request failed: {}", e))
    }
}

/// Map a non-success HTTP status onto the port error type
fn handle_response_status(status: StatusCode, body: &str, query: &VehicleQuery) -> ValuationError {
    match status.as_u16() {
        401 | 403 => ValuationError::Authentication,
        404 => ValuationError::not_found(query.to_string()),
        429 => ValuationError::RateLimited,
        500..=599 => ValuationError::network(format!("Manheim service unavailable ({})", status)),
        _ => ValuationError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

#[async_trait]
impl ValuationClient for ManheimClient {
    async fn fetch(&self, query: &VehicleQuery) -> Result<ValuationReport, ValuationError> {
        let mut last_error = ValuationError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.request_valuation(query).await {
                Ok(report) => return Ok(report),
                Err(err) => {
                    if !err.is_transient() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }
}

// ----- Manheim API Types -----

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_lifetime")]
    expires_in: u64,
}

fn default_token_lifetime() -> u64 {
    3600
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ValuationResponse {
    vehicle: Option<VehicleDto>,
    #[serde(rename = "wholesaleAverages")]
    wholesale_averages: Option<WholesaleAveragesDto>,
    #[serde(rename = "marketSummary")]
    market_summary: Option<MarketSummaryDto>,
}

impl ValuationResponse {
    /// Converts the wire payload into the domain report.
    ///
    /// Transactions without a price are dropped. Malformed optional
    /// attributes (out-of-range grades, unknown region codes, garbage
    /// dates) are treated as absent rather than failing the report.
    fn into_report(self) -> ValuationReport {
        let description = self
            .vehicle
            .map(VehicleDto::into_description)
            .unwrap_or_default();
        let wholesale = self.wholesale_averages.map(WholesaleAveragesDto::into_domain);
        let (transactions, statistics) = match self.market_summary {
            Some(summary) => (
                summary
                    .transactions
                    .into_iter()
                    .filter_map(TransactionDto::into_record)
                    .collect(),
                summary.statistics.map(StatisticsDto::into_domain),
            ),
            None => (Vec::new(), None),
        };

        ValuationReport {
            description,
            wholesale,
            statistics,
            transactions,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VehicleDto {
    year: Option<u16>,
    make: Option<String>,
    model: Option<String>,
    trim: Option<String>,
    vin: Option<String>,
    style: Option<String>,
    #[serde(rename = "engineSize")]
    engine_size: Option<String>,
    transmission: Option<String>,
    drivetrain: Option<String>,
}

impl VehicleDto {
    fn into_description(self) -> VehicleDescription {
        VehicleDescription {
            year: self.year,
            make: self.make,
            model: self.model,
            trim: self.trim,
            vin: self.vin,
            style: self.style,
            engine_size: self.engine_size,
            transmission: self.transmission,
            drivetrain: self.drivetrain,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WholesaleAveragesDto {
    #[serde(rename = "aggregateAverage")]
    aggregate_average: Option<PriceBandDto>,
    #[serde(rename = "adjustedMMR")]
    adjusted_mmr: Option<PriceBandDto>,
    #[serde(rename = "baseMMR")]
    base_mmr: Option<PriceBandDto>,
}

impl WholesaleAveragesDto {
    fn into_domain(self) -> WholesaleAverages {
        WholesaleAverages {
            aggregate: self.aggregate_average.map(PriceBandDto::into_domain),
            adjusted_mmr: self.adjusted_mmr.map(PriceBandDto::into_domain),
            base_mmr: self.base_mmr.map(PriceBandDto::into_domain),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceBandDto {
    average: Option<f64>,
    rough: Option<f64>,
    clean: Option<f64>,
}

impl PriceBandDto {
    fn into_domain(self) -> PriceBand {
        PriceBand {
            average: self.average,
            rough: self.rough,
            clean: self.clean,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketSummaryDto {
    transactions: Vec<TransactionDto>,
    statistics: Option<StatisticsDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatisticsDto {
    #[serde(rename = "averagePrice")]
    average_price: Option<f64>,
    #[serde(rename = "averageOdometer")]
    average_odometer: Option<f64>,
    #[serde(rename = "averageConditionGrade")]
    average_condition_grade: Option<f64>,
    #[serde(rename = "transactionCount")]
    transaction_count: Option<u32>,
}

impl StatisticsDto {
    fn into_domain(self) -> MarketStatistics {
        MarketStatistics {
            average_price: self.average_price,
            average_odometer: self.average_odometer.map(|v| v.round() as u32),
            average_condition_grade: self.average_condition_grade,
            transaction_count: self.transaction_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TransactionDto {
    price: Option<f64>,
    #[serde(rename = "saleDate")]
    sale_date: Option<String>,
    odometer: Option<u32>,
    #[serde(rename = "conditionGrade")]
    condition_grade: Option<f64>,
    region: Option<String>,
    color: Option<String>,
    location: Option<String>,
    lane: Option<String>,
    #[serde(rename = "sellerName")]
    seller_name: Option<String>,
}

impl TransactionDto {
    /// A record without a price carries no valuation signal, so it is
    /// dropped entirely.
    fn into_record(self) -> Option<TransactionRecord> {
        let price = self.price?;
        Some(TransactionRecord {
            price,
            sale_date: self.sale_date.as_deref().and_then(parse_sale_date),
            odometer: self.odometer.map(Mileage::new),
            condition_grade: self.condition_grade.and_then(|g| Grade::try_new(g).ok()),
            region: self.region.as_deref().and_then(|r| r.parse().ok()),
            color: self.color,
            location: self.location,
            lane: self.lane,
            seller_name: self.seller_name,
        })
    }
}

/// Parses the date portion of a provider timestamp, which arrives
/// either as a bare date or as a full ISO-8601 datetime.
fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
