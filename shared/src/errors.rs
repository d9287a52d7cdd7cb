//! Error types shared across the MicroLab services

use thiserror::Error;

/// Authentication error types
///
/// `TokenExpired` and `InvalidToken` are kept distinct so the token layer
/// can report which check failed; both surface to callers as a generic 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_never_name_a_credential_field() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::TokenExpired,
            AuthError::InvalidToken,
            AuthError::MissingToken,
        ] {
            let msg = err.to_string();
            assert!(!msg.contains("email"));
            assert!(!msg.contains("password"));
        }
    }
}
