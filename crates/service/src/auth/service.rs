use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: String,
    pub role: String,
    pub inst: Option<String>,
    pub exp: usize,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new user with a hashed password.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self
            .repo
            .create_user(&input.email, &input.name, &input.role, input.institution_id)
            .await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();

        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a bearer token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours))
            .timestamp() as usize;
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id.to_string(),
            role: user.role.clone(),
            inst: user.institution_id.map(|i| i.to_string()),
            exp,
        };
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Decode and validate a bearer token.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::Unauthorized)?;
        Ok(data.claims)
    }

    /// Resolve the user behind a verified token.
    pub async fn current_user(&self, claims: &Claims) -> Result<AuthUser, AuthError> {
        let uid = Uuid::parse_str(&claims.uid).map_err(|_| AuthError::Unauthorized)?;
        self.repo.find_user_by_id(uid).await?.ok_or(AuthError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn service() -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig {
                jwt_secret: "test-secret".into(),
                token_ttl_hours: 12,
                password_algorithm: "argon2".into(),
            },
        )
    }

    fn registration(email: &str) -> RegisterInput {
        RegisterInput {
            email: email.into(),
            name: "Test User".into(),
            password: "Secret123".into(),
            role: "clerk".into(),
            institution_id: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let svc = service();
        let user = svc.register(registration("user@example.com")).await.unwrap();
        assert_eq!(user.email, "user@example.com");

        let session = svc
            .login(LoginInput { email: "user@example.com".into(), password: "Secret123".into() })
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);

        let claims = svc.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.role, "clerk");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = service();
        svc.register(registration("dup@example.com")).await.unwrap();
        let err = svc.register(registration("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service();
        svc.register(registration("who@example.com")).await.unwrap();
        let err = svc
            .login(LoginInput { email: "who@example.com".into(), password: "nope-nope".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn short_passwords_are_rejected() {
        let svc = service();
        let mut input = registration("short@example.com");
        input.password = "tiny".into();
        let err = svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn garbage_tokens_are_unauthorized() {
        let svc = service();
        assert!(matches!(svc.verify_token("not-a-jwt"), Err(AuthError::Unauthorized)));
    }
}
