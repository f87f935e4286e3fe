/// Synchronous HTTP client for the analytics backend, built on `ureq`.
///
/// All endpoints are plain GETs below a configurable base URL (default
/// `http://127.0.0.1:5000/api`). A non-2xx status is a failure even when the
/// server also sends a JSON body.
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::{
    ApiInfo, HourlyPattern, InsightsSummary, PassengerDistribution, TripPage, TripQuery,
};
use super::{AnalyticsSource, FetchError};
use crate::config::schema::BackendConfig;

const STATS_PATH: &str = "/insights/stats";
const TRIPS_PATH: &str = "/trips/";
const HOURLY_PATH: &str = "/insights/hourly-pattern";
const PASSENGERS_PATH: &str = "/insights/passenger-distribution";

/// Blocking backend client.
///
/// Cheap to share by reference: `ureq::Agent` pools connections internally
/// and is `Send + Sync`.
#[derive(Debug)]
pub struct BackendClient {
    base_url: String,
    agent: ureq::Agent,
}

impl BackendClient {
    /// Build a client for `base_url`. `timeout` of `None` waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
        }
    }

    /// Build a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Self {
        let timeout = (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms));
        Self::new(&config.base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the API root (`{message, endpoints}`).
    pub fn api_info(&self) -> Result<ApiInfo, FetchError> {
        self.get_json("", &[])
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint(path);

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status { url, status });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport {
                    url,
                    message: transport.to_string(),
                });
            }
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status { url, status });
        }

        let body = response.into_string().map_err(|e| FetchError::Transport {
            url: url.clone(),
            message: format!("failed to read response body: {e}"),
        })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
            url,
            message: e.to_string(),
        })
    }
}

impl AnalyticsSource for BackendClient {
    fn insights_stats(&self) -> Result<InsightsSummary, FetchError> {
        self.get_json(STATS_PATH, &[])
    }

    fn trips(&self, query: &TripQuery) -> Result<TripPage, FetchError> {
        self.get_json(TRIPS_PATH, &query.query_pairs())
    }

    fn hourly_pattern(&self) -> Result<HourlyPattern, FetchError> {
        let pattern: HourlyPattern = self.get_json(HOURLY_PATH, &[])?;
        pattern.validate().map_err(|message| FetchError::Malformed {
            url: self.endpoint(HOURLY_PATH),
            message,
        })?;
        Ok(pattern)
    }

    fn passenger_distribution(&self) -> Result<PassengerDistribution, FetchError> {
        let dist: PassengerDistribution = self.get_json(PASSENGERS_PATH, &[])?;
        dist.validate().map_err(|message| FetchError::Malformed {
            url: self.endpoint(PASSENGERS_PATH),
            message,
        })?;
        Ok(dist)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let config = BackendConfig::default();
        let client = BackendClient::from_config(&config);
        assert_eq!(client.base_url(), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = BackendClient::new("http://127.0.0.1:5000/api/", None);
        assert_eq!(client.base_url(), "http://127.0.0.1:5000/api");
        assert_eq!(
            client.endpoint(TRIPS_PATH),
            "http://127.0.0.1:5000/api/trips/"
        );
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback.
        let client = BackendClient::new("http://127.0.0.1:9/api", Some(Duration::from_secs(2)));
        let err = client.insights_stats().unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
