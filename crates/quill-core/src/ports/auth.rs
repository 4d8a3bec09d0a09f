//! Authentication ports.

use chrono::{DateTime, Utc};

/// Claims carried by a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub username: String,
    pub issued_at: i64,
    pub exp: i64,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token service trait for signed, self-contained bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for a user, valid from now.
    fn generate_token(&self, user_id: i64, username: &str) -> Result<IssuedToken, AuthError> {
        self.generate_token_at(user_id, username, Utc::now())
    }

    /// Issue a token whose validity window starts at `issued_at`.
    fn generate_token_at(
        &self,
        user_id: i64,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError>;

    /// Validate signature, expiry and claims, then decode.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of a newly issued token.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Malformed authorization header, expected \"Bearer <token>\"")]
    MalformedHeader,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Token creation failed: {0}")]
    TokenCreation(String),
}
