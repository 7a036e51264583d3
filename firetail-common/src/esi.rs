//! ESI (EVE Swagger Interface) client with connection pooling and rate limiting
//!
//! This module provides an HTTP client for the public, unauthenticated parts of
//! the EVE Online ESI API, including rate limiting, retry logic for transient
//! failures, and typed response models.

use crate::error::{FiretailError, Result};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, error, instrument, warn};

/// Configuration for the ESI API client
#[derive(Debug, Clone)]
pub struct EsiClientConfig {
    /// Base URL of the ESI API (e.g., "https://esi.evetech.net/latest")
    pub base_url: String,
    /// Datasource to query (e.g., "tranquility")
    pub datasource: String,
    /// User-Agent header sent with every request; ESI asks callers to identify themselves
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts for transient failures (default: 3)
    pub max_retries: usize,
}

impl Default for EsiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://esi.evetech.net/latest".to_string(),
            datasource: "tranquility".to_string(),
            user_agent: "firetail-bot".to_string(),
            timeout_secs: 30,
            max_idle_per_host: 10,
            rate_limit_per_sec: 10,
            max_retries: 3,
        }
    }
}

impl EsiClientConfig {
    /// Create a new configuration for the given base URL and datasource
    pub fn new(base_url: impl Into<String>, datasource: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            datasource: datasource.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// ESI API client with connection pooling and rate limiting
#[derive(Debug, Clone)]
pub struct EsiClient {
    client: Client,
    config: EsiClientConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl EsiClient {
    /// Create a new ESI client with the given configuration
    pub fn new(config: EsiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FiretailError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| FiretailError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a new client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(EsiClientConfig::default())
    }

    /// Build a request URL for an API path
    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Whether an error is worth retrying (transient network failures and 5xx)
    fn is_transient(error: &FiretailError) -> bool {
        match error {
            FiretailError::Network { .. } => true,
            FiretailError::Esi { status_code, .. } => {
                matches!(status_code, Some(status) if *status >= 500)
            }
            _ => false,
        }
    }

    /// Make a request to the ESI API with rate limiting and retry logic
    #[instrument(skip(self, body), fields(path = %path))]
    async fn make_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let url = self.build_url(path);
        debug!("Making {} request to: {}", method, url);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = RetryIf::spawn(
            retry_strategy,
            || async {
                let mut request = self
                    .client
                    .request(method.clone(), &url)
                    .query(&[("datasource", self.config.datasource.as_str())]);

                if let Some(body) = body {
                    request = request.json(body);
                }

                match request.send().await {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_success() {
                            debug!("Request successful: {}", status);
                            Ok(response)
                        } else if status.is_client_error() {
                            error!("Client error: {}", status);
                            Err(FiretailError::esi_with_status(
                                format!("ESI returned client error: {}", status),
                                status.as_u16(),
                            ))
                        } else {
                            warn!("Server error, will retry: {}", status);
                            Err(FiretailError::esi_with_status(
                                format!("ESI returned server error: {}", status),
                                status.as_u16(),
                            ))
                        }
                    }
                    Err(e) if e.is_timeout() => {
                        warn!("Request timeout, will retry: {}", e);
                        Err(FiretailError::network_with_source("Request timeout", e))
                    }
                    Err(e) if e.is_connect() => {
                        warn!("Connection error, will retry: {}", e);
                        Err(FiretailError::network_with_source("Connection error", e))
                    }
                    Err(e) => {
                        error!("Request failed: {}", e);
                        Err(FiretailError::network_with_source("Request failed", e))
                    }
                }
            },
            Self::is_transient,
        )
        .await?;

        debug!("Completed request to {}", path);
        Ok(response)
    }

    /// Parse a JSON response into the specified type
    async fn parse_response<T>(&self, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let text = response
            .text()
            .await
            .map_err(|e| FiretailError::network_with_source("Failed to read response body", e))?;

        debug!("Response body: {}", text);

        serde_json::from_str(&text).map_err(FiretailError::from)
    }

    /// Make a GET request and parse the JSON response
    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.make_request(Method::GET, path, None).await?;
        self.parse_response(response).await
    }

    /// Make a POST request with a JSON body and parse the JSON response
    async fn post_json<T>(&self, path: &str, body: &serde_json::Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.make_request(Method::POST, path, Some(body)).await?;
        self.parse_response(response).await
    }

    // ============================================================================
    // Public API Methods
    // ============================================================================

    /// Get the Tranquility server status (player count, version, start time)
    #[instrument(skip(self))]
    pub async fn server_status(&self) -> Result<ServerStatus> {
        debug!("Fetching server status");
        self.get_json("/status/").await
    }

    /// Resolve a set of names to IDs across entity categories
    ///
    /// Only exact matches are returned by ESI; names that resolve to nothing
    /// are simply absent from the response.
    #[instrument(skip(self), fields(count = names.len()))]
    pub async fn resolve_names(&self, names: &[String]) -> Result<ResolvedIds> {
        debug!("Resolving {} name(s)", names.len());
        let body = serde_json::to_value(names)?;
        self.post_json("/universe/ids/", &body).await
    }

    /// Get public information about a character
    #[instrument(skip(self))]
    pub async fn character(&self, character_id: i64) -> Result<CharacterInfo> {
        debug!("Fetching character {}", character_id);
        self.get_json(&format!("/characters/{}/", character_id))
            .await
    }

    /// Get public information about a corporation
    #[instrument(skip(self))]
    pub async fn corporation(&self, corporation_id: i64) -> Result<CorporationInfo> {
        debug!("Fetching corporation {}", corporation_id);
        self.get_json(&format!("/corporations/{}/", corporation_id))
            .await
    }

    /// Get public information about an alliance
    #[instrument(skip(self))]
    pub async fn alliance(&self, alliance_id: i64) -> Result<AllianceInfo> {
        debug!("Fetching alliance {}", alliance_id);
        self.get_json(&format!("/alliances/{}/", alliance_id)).await
    }

    /// Get information about a solar system
    #[instrument(skip(self))]
    pub async fn solar_system(&self, system_id: i64) -> Result<SolarSystem> {
        debug!("Fetching solar system {}", system_id);
        self.get_json(&format!("/universe/systems/{}/", system_id))
            .await
    }

    /// Test the connection to ESI
    ///
    /// Simple health check against the status endpoint. Returns true if the
    /// API answered, false otherwise.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> bool {
        match self.server_status().await {
            Ok(_) => true,
            Err(e) => {
                warn!("ESI connection test failed: {}", e);
                false
            }
        }
    }

    /// Get metrics about the client configuration and state
    pub fn client_metrics(&self) -> ClientMetrics {
        ClientMetrics {
            base_url: self.config.base_url.clone(),
            datasource: self.config.datasource.clone(),
            timeout_secs: self.config.timeout_secs,
            rate_limit_per_sec: self.config.rate_limit_per_sec,
            max_retries: self.config.max_retries,
            has_rate_limit_capacity: self.rate_limiter.check().is_ok(),
        }
    }
}

/// Client metrics for monitoring and debugging
#[derive(Debug, Clone, Serialize)]
pub struct ClientMetrics {
    /// Base URL being used
    pub base_url: String,
    /// Datasource being queried
    pub datasource: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Rate limit requests per second
    pub rate_limit_per_sec: u32,
    /// Maximum retry attempts
    pub max_retries: usize,
    /// Whether we currently have rate limit capacity
    pub has_rate_limit_capacity: bool,
}

// ============================================================================
// API Response Models
// ============================================================================

/// Response model for the /status/ endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerStatus {
    /// Players currently online
    pub players: i64,
    /// Server version string
    pub server_version: String,
    /// When the server last started
    pub start_time: crate::Timestamp,
    /// Whether the server is in VIP (restricted login) mode
    #[serde(default)]
    pub vip: Option<bool>,
}

/// A resolved id/name pair from /universe/ids/
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NamedId {
    pub id: i64,
    pub name: String,
}

/// Response model for the /universe/ids/ endpoint
///
/// ESI omits categories with no matches entirely, hence the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResolvedIds {
    #[serde(default)]
    pub characters: Vec<NamedId>,
    #[serde(default)]
    pub corporations: Vec<NamedId>,
    #[serde(default)]
    pub alliances: Vec<NamedId>,
    #[serde(default)]
    pub systems: Vec<NamedId>,
    #[serde(default)]
    pub regions: Vec<NamedId>,
    #[serde(default)]
    pub inventory_types: Vec<NamedId>,
}

impl ResolvedIds {
    /// First character match, if any
    pub fn first_character(&self) -> Option<&NamedId> {
        self.characters.first()
    }
}

/// Response model for the /characters/{id}/ endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CharacterInfo {
    /// Character name
    pub name: String,
    /// Corporation the character belongs to
    pub corporation_id: i64,
    /// Alliance, when the corporation is in one
    #[serde(default)]
    pub alliance_id: Option<i64>,
    /// Character creation date
    pub birthday: crate::Timestamp,
    /// CONCORD security status
    #[serde(default)]
    pub security_status: Option<f64>,
    /// Character gender
    #[serde(default)]
    pub gender: Option<String>,
}

/// Response model for the /corporations/{id}/ endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorporationInfo {
    /// Corporation name
    pub name: String,
    /// Corporation ticker
    pub ticker: String,
    /// Number of member characters
    pub member_count: i64,
    /// Alliance, when in one
    #[serde(default)]
    pub alliance_id: Option<i64>,
}

/// Response model for the /alliances/{id}/ endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllianceInfo {
    /// Alliance name
    pub name: String,
    /// Alliance ticker
    pub ticker: String,
}

/// Response model for the /universe/systems/{id}/ endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolarSystem {
    /// System name
    pub name: String,
    /// True security status
    pub security_status: f64,
    /// Constellation the system belongs to
    pub constellation_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = EsiClientConfig::new("https://esi.example.com", "tranquility");
        assert_eq!(config.base_url, "https://esi.example.com");
        assert_eq!(config.datasource, "tranquility");
        assert_eq!(config.timeout_secs, 30); // default
    }

    #[test]
    fn test_config_builder() {
        let config = EsiClientConfig::default()
            .with_timeout(60)
            .with_user_agent("firetail-test")
            .with_rate_limit(5)
            .with_max_retries(5);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, "firetail-test");
        assert_eq!(config.rate_limit_per_sec, 5);
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_url_building() {
        let config = EsiClientConfig::new("https://esi.evetech.net/latest/", "tranquility");
        let client = EsiClient::new(config).unwrap();
        assert_eq!(
            client.build_url("/status/"),
            "https://esi.evetech.net/latest/status/"
        );
        assert_eq!(
            client.build_url("characters/12345/"),
            "https://esi.evetech.net/latest/characters/12345/"
        );
    }

    #[test]
    fn test_rate_limit_validation() {
        let config = EsiClientConfig::default().with_rate_limit(0);
        let result = EsiClient::new(config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Rate limit must be greater than 0"));
        }
    }

    #[tokio::test]
    async fn test_client_creation() {
        let result = EsiClient::with_defaults();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_integration() {
        let config = EsiClientConfig::default().with_rate_limit(10);
        let client = EsiClient::new(config).unwrap();

        // First calls should pass through without blocking noticeably
        client.rate_limiter.until_ready().await;
        client.rate_limiter.until_ready().await;
    }

    #[test]
    fn test_transient_classification() {
        assert!(EsiClient::is_transient(&FiretailError::network("timeout")));
        assert!(EsiClient::is_transient(&FiretailError::esi_with_status(
            "bad gateway",
            502
        )));
        assert!(!EsiClient::is_transient(&FiretailError::esi_with_status(
            "not found",
            404
        )));
        assert!(!EsiClient::is_transient(&FiretailError::config("nope")));
    }

    // ============================================================================
    // Response Model Tests
    // ============================================================================

    #[test]
    fn test_server_status_deserialization() {
        let json = r#"{
            "players": 24512,
            "server_version": "2696528",
            "start_time": "2026-08-07T11:02:31Z"
        }"#;

        let status: ServerStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.players, 24512);
        assert_eq!(status.server_version, "2696528");
        assert_eq!(status.vip, None);
    }

    #[test]
    fn test_server_status_vip_deserialization() {
        let json = r#"{
            "players": 12,
            "server_version": "2696528",
            "start_time": "2026-08-07T11:02:31Z",
            "vip": true
        }"#;

        let status: ServerStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.vip, Some(true));
    }

    #[test]
    fn test_resolved_ids_deserialization() {
        let json = r#"{
            "characters": [
                {"id": 95465499, "name": "CCP Bartender"}
            ],
            "systems": [
                {"id": 30000142, "name": "Jita"}
            ]
        }"#;

        let resolved: ResolvedIds = serde_json::from_str(json).unwrap();
        assert_eq!(resolved.characters.len(), 1);
        assert_eq!(resolved.characters[0].name, "CCP Bartender");
        assert_eq!(resolved.systems[0].id, 30000142);
        assert!(resolved.corporations.is_empty());
        assert_eq!(
            resolved.first_character(),
            Some(&NamedId {
                id: 95465499,
                name: "CCP Bartender".to_string()
            })
        );
    }

    #[test]
    fn test_character_info_deserialization() {
        let json = r#"{
            "name": "CCP Bartender",
            "corporation_id": 109299958,
            "alliance_id": 434243723,
            "birthday": "2015-03-24T11:37:00Z",
            "security_status": -1.92345,
            "gender": "male",
            "race_id": 2,
            "bloodline_id": 3
        }"#;

        let character: CharacterInfo = serde_json::from_str(json).unwrap();
        assert_eq!(character.name, "CCP Bartender");
        assert_eq!(character.corporation_id, 109299958);
        assert_eq!(character.alliance_id, Some(434243723));
        assert_eq!(character.security_status, Some(-1.92345));
    }

    #[test]
    fn test_character_info_without_optional_fields() {
        let json = r#"{
            "name": "Fresh Capsuleer",
            "corporation_id": 1000169,
            "birthday": "2026-01-01T00:00:00Z"
        }"#;

        let character: CharacterInfo = serde_json::from_str(json).unwrap();
        assert_eq!(character.alliance_id, None);
        assert_eq!(character.security_status, None);
    }

    #[test]
    fn test_corporation_info_deserialization() {
        let json = r#"{
            "name": "C C P",
            "ticker": "CCP",
            "member_count": 300,
            "alliance_id": 434243723,
            "ceo_id": 180548812
        }"#;

        let corporation: CorporationInfo = serde_json::from_str(json).unwrap();
        assert_eq!(corporation.name, "C C P");
        assert_eq!(corporation.ticker, "CCP");
        assert_eq!(corporation.member_count, 300);
    }

    #[test]
    fn test_solar_system_deserialization() {
        let json = r#"{
            "name": "Jita",
            "security_status": 0.9459,
            "constellation_id": 20000020,
            "star_id": 40009076
        }"#;

        let system: SolarSystem = serde_json::from_str(json).unwrap();
        assert_eq!(system.name, "Jita");
        assert!(system.security_status > 0.9);
    }

    #[test]
    fn test_client_metrics_has_no_secrets() {
        let client = EsiClient::with_defaults().unwrap();
        let metrics = client.client_metrics();

        let serialized = serde_json::to_string(&metrics).unwrap();
        assert!(serialized.contains("esi.evetech.net"));
        assert!(serialized.contains("rate_limit_per_sec"));
        assert!(metrics.has_rate_limit_capacity);
    }
}
