//! HTTP client abstraction for testability.
//!
//! Both the catalog client and the download cache talk to the network
//! through the [`HttpClient`] trait, so tests can substitute a mock that
//! records requests instead of performing I/O.

use std::time::Duration;

use thiserror::Error;

/// Default timeout for HTTP requests in seconds.
///
/// Catalog responses are small, but product downloads can be multi-hundred
/// megabyte geodatabase archives.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Errors raised by the HTTP transport.
///
/// No retry logic lives in this crate; a failed request surfaces
/// immediately and retry policy belongs to the caller.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

/// Trait for blocking HTTP GET operations.
///
/// # Arguments
///
/// * `url` - The URL to request, without query parameters
/// * `query` - Query parameters as key/value pairs; the implementation is
///   responsible for encoding them
///
/// # Returns
///
/// The response body as bytes, or a [`TransportError`].
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<Vec<u8>, TransportError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                url: String::new(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: format!("failed to read response: {}", e),
            })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A request recorded by [`MockHttpClient`].
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub query: Vec<(String, String)>,
    }

    impl RecordedRequest {
        /// Look up a query parameter by key.
        pub fn param(&self, key: &str) -> Option<&str> {
            self.query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Mock HTTP client that replays canned responses and records every
    /// request it receives.
    pub struct MockHttpClient {
        responses: Mutex<Vec<Result<Vec<u8>, TransportError>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockHttpClient {
        /// A mock that returns the given responses in order. Once the
        /// queue is exhausted, further requests fail.
        pub fn with_responses(responses: Vec<Result<Vec<u8>, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A mock that returns the same body for every request.
        pub fn with_body(body: Vec<u8>) -> Self {
            Self {
                responses: Mutex::new(vec![Ok(body)]),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Number of requests performed so far.
        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// All requests performed so far.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str, query: &[(String, String)]) -> Result<Vec<u8>, TransportError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                query: query.to_vec(),
            });

            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(TransportError::Request {
                    url: url.to_string(),
                    reason: "mock response queue exhausted".to_string(),
                });
            }
            // A single configured response is replayed indefinitely;
            // longer queues are consumed in order.
            if responses.len() == 1 {
                return responses[0].clone();
            }
            responses.remove(0)
        }
    }

    #[test]
    fn test_mock_client_replays_body() {
        let mock = MockHttpClient::with_body(vec![1, 2, 3]);
        let result = mock.get("http://example.com", &[]);
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_mock_client_records_query() {
        let mock = MockHttpClient::with_body(vec![]);
        let query = vec![("offset".to_string(), "100".to_string())];
        mock.get("http://example.com", &query).unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].param("offset"), Some("100"));
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::with_responses(vec![Err(TransportError::Request {
            url: "http://example.com".to_string(),
            reason: "connection refused".to_string(),
        })]);

        let result = mock.get("http://example.com", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Status {
            url: "http://example.com/a".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "HTTP 503 from http://example.com/a");
    }
}
