//! Login-flow error types.

use thiserror::Error;

/// Errors raised by the guest-token and login flows.
///
/// Most variants indicate that the vendor changed its page structure; the
/// flow is documented as subject to breakage without notice.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The login page did not contain the expected configuration blob.
    #[error("login page did not contain a session configuration blob: {reason}")]
    MissingSessionConfig {
        /// What exactly failed while extracting the blob.
        reason: String,
    },

    /// The credential response did not contain the hidden form fields.
    #[error("credential response did not contain the expected '{field}' hidden form field")]
    MissingHiddenField {
        /// The missing field name (`wctx` or `wresult`).
        field: &'static str,
    },

    /// The callback redirect did not carry an authorization code.
    #[error("callback redirect did not carry an authorization code")]
    MissingAuthorizationCode,

    /// The token response did not contain an access token.
    #[error("token response did not contain an access token")]
    MalformedTokenResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let error = AuthError::MissingHiddenField { field: "wctx" };
        assert!(error.to_string().contains("wctx"));

        let error = AuthError::MissingSessionConfig {
            reason: "no element matched".to_string(),
        };
        assert!(error.to_string().contains("no element matched"));
    }
}
