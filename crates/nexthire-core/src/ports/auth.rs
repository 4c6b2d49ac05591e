//! Authentication ports.

/// Claims carried by the `token` cookie.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub email: String,
}

/// Token service trait for signing and verifying session tokens.
pub trait TokenService: Send + Sync {
    /// Sign a token for the given email.
    fn generate_token(&self, email: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing token cookie")]
    MissingAuth,

    #[error("Token signing failed: {0}")]
    Signing(String),
}
