//! Classification of unsuccessful HTTP responses into readable errors.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// Header GitHub uses to report the remaining request quota.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// An HTTP request that reached the server but did not succeed.
#[derive(Debug, PartialEq)]
pub enum HttpError {
    /// Rate limit exceeded (HTTP 403 with an exhausted quota, or 429)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Any other 4xx response
    ClientError(String),
    /// Any 5xx response
    ServerError(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::RateLimitExceeded(url) => {
                write!(f, "Rate limit exceeded for {}. Try again later.", url)
            }
            HttpError::AuthenticationFailed(url) => {
                write!(f, "Authentication failed for {}", url)
            }
            HttpError::NotFound(url) => write!(f, "Not found: {}", url),
            HttpError::Forbidden(url) => write!(f, "Access forbidden: {}", url),
            HttpError::ClientError(msg) => write!(f, "Request error: {}", msg),
            HttpError::ServerError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Builds the error for a non-success status. Returns `None` for 1xx-3xx.
    pub fn from_status(status: StatusCode, headers: &HeaderMap, url: &str) -> Option<Self> {
        let quota_exhausted = headers
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");

        let error = match status {
            StatusCode::UNAUTHORIZED => HttpError::AuthenticationFailed(url.to_string()),
            StatusCode::FORBIDDEN if quota_exhausted => {
                HttpError::RateLimitExceeded(url.to_string())
            }
            StatusCode::FORBIDDEN => HttpError::Forbidden(url.to_string()),
            StatusCode::TOO_MANY_REQUESTS => HttpError::RateLimitExceeded(url.to_string()),
            StatusCode::NOT_FOUND => HttpError::NotFound(url.to_string()),
            s if s.is_client_error() => {
                HttpError::ClientError(format!("HTTP {} from {}", s.as_u16(), url))
            }
            s if s.is_server_error() => {
                HttpError::ServerError(format!("HTTP {} from {}", s.as_u16(), url))
            }
            _ => return None,
        };
        Some(error)
    }
}

/// Turns an unsuccessful response into an [`HttpError`], passing successful ones through.
pub fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    let url = response.url().to_string();
    match HttpError::from_status(response.status(), response.headers(), &url) {
        Some(err) => Err(err.into()),
        None => Ok(response),
    }
}
