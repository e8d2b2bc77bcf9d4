use thiserror::Error;

const CONNECTION_REFUSED_MESSAGE: &str = "Ollama is not running or not installed. \
    Please make sure Ollama is installed and running before proceeding.";
const GENERIC_MESSAGE: &str = "An error occurred while communicating with Ollama.";

/// Shown in place of a result when the generate call fails.
pub const ANONYMIZE_FALLBACK: &str = "Error: Could not anonymize text. \
    Please make sure Ollama is running and the model is installed.";

/// The entire error taxonomy surfaced to the wizard: either the endpoint was
/// unreachable, or something else went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{}", CONNECTION_REFUSED_MESSAGE)]
    ConnectionRefused,
    #[error("{}", GENERIC_MESSAGE)]
    Generic,
}

impl ApiError {
    /// Collapse a transport failure into the two-variant taxonomy.
    ///
    /// `reqwest` reports refused connections as connect errors, but on some
    /// platforms the refusal only shows up as an io error further down the
    /// source chain, so both are checked.
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_connect() {
            return ApiError::ConnectionRefused;
        }

        let mut source = std::error::Error::source(error);
        while let Some(inner) = source {
            if let Some(io) = inner.downcast_ref::<std::io::Error>() {
                if io.kind() == std::io::ErrorKind::ConnectionRefused {
                    return ApiError::ConnectionRefused;
                }
            }
            source = inner.source();
        }

        ApiError::Generic
    }

    pub fn user_message(self) -> &'static str {
        match self {
            ApiError::ConnectionRefused => CONNECTION_REFUSED_MESSAGE,
            ApiError::Generic => GENERIC_MESSAGE,
        }
    }

    pub fn is_connection_refused(self) -> bool {
        matches!(self, ApiError::ConnectionRefused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_user_message() {
        assert_eq!(
            ApiError::ConnectionRefused.to_string(),
            ApiError::ConnectionRefused.user_message()
        );
        assert_eq!(
            ApiError::Generic.to_string(),
            ApiError::Generic.user_message()
        );
    }

    #[test]
    fn connection_refused_message_names_the_cause() {
        assert!(
            ApiError::ConnectionRefused
                .user_message()
                .contains("not running or not installed")
        );
    }

    #[test]
    fn only_connection_refused_reports_as_such() {
        assert!(ApiError::ConnectionRefused.is_connection_refused());
        assert!(!ApiError::Generic.is_connection_refused());
    }
}
