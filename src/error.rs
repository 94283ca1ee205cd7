/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FigureEightError {
    /// Client could not be constructed, e.g. the API key is empty.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Status code outside the accepted range for the endpoint.
    #[error("got status code {status} to {path}: {reason}")]
    Request {
        status: u16,
        /// API path relative to the endpoint template, without the key.
        path: String,
        reason: String,
    },
    /// Response body did not decode as expected.
    #[error("decode error: {0}")]
    Decode(String),
    /// Result export body is not a readable ZIP archive.
    #[error("archive error: {0}")]
    Archive(zip::result::ZipError),
    /// Result export archive holds no files.
    #[error("no result file found in zip report")]
    EmptyArchive,
    /// Every attempt of a retried operation failed.
    #[error("max retries ({retry_limit}) exceeded: {source}")]
    RetryLimitExceeded {
        retry_limit: usize,
        /// Error of the final attempt.
        #[source]
        source: Box<FigureEightError>,
    },
}

impl FigureEightError {
    /// Returns the HTTP status code carried by a [`FigureEightError::Request`],
    /// looking through [`FigureEightError::RetryLimitExceeded`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::RetryLimitExceeded { source, .. } => source.status(),
            _ => None,
        }
    }

    pub(crate) fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Configuration(_) | Self::RetryLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::FigureEightError;

    #[test]
    fn request_error_message_names_status_and_path() {
        let err = FigureEightError::Request {
            status: 404,
            path: "jobs/1.json".to_owned(),
            reason: "Not Found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "got status code 404 to jobs/1.json: Not Found"
        );
    }

    #[test]
    fn status_looks_through_retry_wrapper() {
        let err = FigureEightError::RetryLimitExceeded {
            retry_limit: 2,
            source: Box::new(FigureEightError::Request {
                status: 503,
                path: "jobs/1/orders.json".to_owned(),
                reason: "Service Unavailable".to_owned(),
            }),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().starts_with("max retries (2) exceeded"));
    }

    #[test]
    fn configuration_errors_are_not_retryable() {
        assert!(!FigureEightError::Configuration("x".to_owned()).is_retryable());
        assert!(FigureEightError::EmptyArchive.is_retryable());
        assert!(FigureEightError::Decode("bad".to_owned()).is_retryable());
    }
}
