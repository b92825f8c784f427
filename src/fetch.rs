//! HTTP transport seam and fetch error taxonomy.
//!
//! The core never talks to a network stack directly. Every page fetch goes
//! through the [`HttpClient`] trait; the target hardware binds it to its WiFi
//! stack, while the simulator and the tests bind [`ScriptedHttp`] with canned
//! bodies. Fetches are synchronous and bounded by a timeout the caller
//! supplies, so one tick performs at most one blocking request.
//!
//! # Error Policy
//!
//! A failed fetch never destroys cached data. The scheduler records the
//! outcome, keeps the last-known-good cache marked stale, and retries no
//! sooner than the page's refresh interval.

use thiserror::Error;

/// Why a page fetch produced no fresh data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure (timeout, connection refused, non-2xx).
    /// Retryable on the next refresh window.
    #[error("transient fetch failure: {0}")]
    Transient(String),

    /// The response arrived but a required field could not be extracted.
    #[error("response missing required field `{0}`")]
    MissingField(&'static str),

    /// The page cannot fetch until the named setting is configured.
    /// Not retried until settings change.
    #[error("setting `{0}` is not configured")]
    ConfigMissing(&'static str),
}

/// Blocking HTTP GET transport bound by the platform.
pub trait HttpClient {
    /// Fetch `url`, returning the response body as text.
    ///
    /// Implementations must give up after `timeout_ms` and report the
    /// failure as [`FetchError::Transient`].
    fn get(&mut self, url: &str, timeout_ms: u32) -> Result<String, FetchError>;
}

// =============================================================================
// Scripted Transport (simulator + tests)
// =============================================================================

/// Canned-response transport for the simulator binary and tests.
///
/// Routes are matched by substring against the requested URL, first match
/// wins. URLs with no matching route fail as transient, which is also how the
/// failure-resilience tests force a fetch error.
#[derive(Default)]
pub struct ScriptedHttp {
    routes: Vec<(String, String)>,
    /// When set, every request fails regardless of routes.
    offline: bool,
    requests: Vec<String>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned body for any URL containing `url_part`.
    pub fn route(mut self, url_part: &str, body: &str) -> Self {
        self.routes.push((url_part.to_string(), body.to_string()));
        self
    }

    /// Replace the body of an existing route (or add it).
    #[allow(dead_code)]
    pub fn set_route(&mut self, url_part: &str, body: &str) {
        if let Some(slot) = self.routes.iter_mut().find(|(part, _)| part == url_part) {
            slot.1 = body.to_string();
        } else {
            self.routes.push((url_part.to_string(), body.to_string()));
        }
    }

    /// Make every subsequent request fail, simulating a network outage.
    #[allow(dead_code)]
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }
}

impl HttpClient for ScriptedHttp {
    fn get(&mut self, url: &str, _timeout_ms: u32) -> Result<String, FetchError> {
        self.requests.push(url.to_string());
        if self.offline {
            return Err(FetchError::Transient("offline".to_string()));
        }
        self.routes
            .iter()
            .find(|(part, _)| url.contains(part.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FetchError::Transient(format!("no route for {url}")))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_routes_by_substring() {
        let mut http = ScriptedHttp::new().route("wttr.in", "{\"temp_C\":\"18\"}");
        let body = http.get("https://wttr.in/Lugano?format=j1", 1000).expect("routed");
        assert!(body.contains("18"));
    }

    #[test]
    fn test_scripted_unrouted_is_transient() {
        let mut http = ScriptedHttp::new();
        let err = http.get("https://nowhere.invalid/", 1000).unwrap_err();
        assert!(matches!(err, FetchError::Transient(_)));
    }

    #[test]
    fn test_scripted_offline_overrides_routes() {
        let mut http = ScriptedHttp::new().route("api", "ok");
        http.set_offline(true);
        assert!(http.get("https://api.example/", 1000).is_err());
        http.set_offline(false);
        assert_eq!(http.get("https://api.example/", 1000).unwrap(), "ok");
    }

    #[test]
    fn test_scripted_records_requests() {
        let mut http = ScriptedHttp::new().route("a", "1");
        let _ = http.get("https://a/", 1000);
        let _ = http.get("https://b/", 1000);
        assert_eq!(http.requests().len(), 2);
        assert!(http.requests()[1].contains("b"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::MissingField("temp_C").to_string(),
            "response missing required field `temp_C`"
        );
        assert_eq!(
            FetchError::ConfigMissing("rss_url").to_string(),
            "setting `rss_url` is not configured"
        );
    }
}
