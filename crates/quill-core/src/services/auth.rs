//! Registration, login and bearer-token authentication.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::{NewUser, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    AuthError, IssuedToken, PasswordService, TokenClaims, TokenService, UserRepository,
};

use super::validate;

const MAX_USERNAME_CHARS: usize = 64;
const MIN_PASSWORD_CHARS: usize = 8;

/// Input of [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Extract the token from an `Authorization` header value.
///
/// The header must be literally `Bearer <token>`: one space, then a
/// non-empty token with no whitespace in it.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() && !token.contains(char::is_whitespace) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        &self.tokens
    }

    #[instrument(name = "auth.register", skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: Registration) -> Result<User, DomainError> {
        let username = validate::required("username", &input.username)?;
        validate::max_chars("username", username, MAX_USERNAME_CHARS)?;
        let email = validate::required("email", &input.email)?;
        validate::email(email)?;
        if input.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(DomainError::validation(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        let password_hash = self.passwords.hash(&input.password)?;

        // Uniqueness is left to the store's constraint.
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepoError::Constraint(_) => {
                    DomainError::Conflict("username or email already registered".to_string())
                }
                other => other.into(),
            })?;

        tracing::info!(
            target: "audit",
            action = "user.register",
            user_id = user.id,
            actor = user.id,
            at = %user.created_at.to_rfc3339(),
            fields = "username,email,password",
            "user registered"
        );

        Ok(user)
    }

    /// Unknown usernames and wrong passwords fail identically.
    #[instrument(name = "auth.login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let username = validate::required("username", username)?;
        if password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::debug!("login for unknown username");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.generate_token(user.id, &user.username)?;
        tracing::info!(user_id = user.id, expires_at = %token.expires_at, "user logged in");

        Ok(LoginOutcome { user, token })
    }

    /// Validate an `Authorization` header value.
    pub fn authenticate(&self, header: Option<&str>) -> Result<TokenClaims, AuthError> {
        let header = header.ok_or(AuthError::MissingAuth)?;
        let token = bearer_token(header)?;
        self.tokens.validate_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert_eq!(bearer_token("bearer abc"), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token("Bearer "), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token("Token abc"), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token("Bearerabc"), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_bearer_token_rejects_stray_whitespace() {
        assert_eq!(bearer_token("Bearer  abc"), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token("Bearer abc "), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token("Bearer ab c"), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token("Bearer \tabc"), Err(AuthError::MalformedHeader));
    }
}
