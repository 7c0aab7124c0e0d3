use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("Unauthorized - email or password rejected")]
    Unauthorized,

    #[error("Challenge required - captcha or two-step verification pending")]
    ChallengeRequired,

    #[error("Rate limited - too many logins, wait before retrying")]
    RateLimited,

    #[error("Login failed with status {0}")]
    Unknown(u16),

    #[error("Protocol violation: response carried no session id header")]
    ProtocolViolation,

    #[error("No account email configured")]
    MissingEmail,

    #[error("No password available for {0}")]
    MissingPassword(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in log output
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl LoginError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Map a non-success status from the session endpoint to its error kind.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => LoginError::Unauthorized,
            409 => LoginError::ChallengeRequired,
            429 => LoginError::RateLimited,
            other => LoginError::Unknown(other),
        }
    }

    /// Whether retrying later with the same credentials could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LoginError::RateLimited | LoginError::Network(_) | LoginError::Unknown(500..=599)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            LoginError::from_status(StatusCode::UNAUTHORIZED),
            LoginError::Unauthorized
        ));
        assert!(matches!(
            LoginError::from_status(StatusCode::CONFLICT),
            LoginError::ChallengeRequired
        ));
        assert!(matches!(
            LoginError::from_status(StatusCode::TOO_MANY_REQUESTS),
            LoginError::RateLimited
        ));
        assert!(matches!(
            LoginError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            LoginError::Unknown(500)
        ));
        assert!(matches!(
            LoginError::from_status(StatusCode::FORBIDDEN),
            LoginError::Unknown(403)
        ));
    }

    #[test]
    fn test_is_transient() {
        assert!(LoginError::RateLimited.is_transient());
        assert!(LoginError::Unknown(503).is_transient());
        assert!(!LoginError::Unknown(400).is_transient());
        assert!(!LoginError::Unauthorized.is_transient());
        assert!(!LoginError::ProtocolViolation.is_transient());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(LoginError::truncate_body("short"), "short");

        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = LoginError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 510 total bytes)"));
    }
}
