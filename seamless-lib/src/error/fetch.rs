//! Page fetch error types

/// Errors that can occur while fetching a pagination page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-success HTTP status.
    #[error("HTTP {status} for {url}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Network error during the request or while reading the body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    pub fn http(status: u16, url: impl Into<String>) -> Self {
        Self::Http {
            status,
            url: url.into(),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error() {
        let error = FetchError::http(503, "https://example.com/?page=2");
        assert_eq!(error.status_code(), Some(503));
        assert_eq!(error.to_string(), "HTTP 503 for https://example.com/?page=2");
        assert_eq!(FetchError::http(404, "x").status_code(), Some(404));
    }
}
