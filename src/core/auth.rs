use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UserRepository;
use crate::utils::error::{PortfolioError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: String,
}

/// Payload of the admin token: `{ "user": { "id": ... }, "iat": ..., "exp": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: i64,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PortfolioError::PasswordHashError {
            message: e.to_string(),
        })
}

/// Whether the stored hash is an Argon2 PHC string this service can verify.
/// Hashes left by older deployments (bcrypt `$2a$...`) are not.
pub fn is_supported_hash(password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| parsed.algorithm.as_str().starts_with("argon2"))
        .unwrap_or(false)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| PortfolioError::PasswordHashError {
        message: e.to_string(),
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Longest accepted token lifetime (one week); larger values are clamped.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 3600;

/// Issues and checks HS256-signed admin tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_seconds.min(MAX_TOKEN_TTL_SECONDS) as i64),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            user: TokenUser {
                id: user_id.to_string(),
            },
            iat: issued_at.timestamp(),
            exp: issued_at
                .checked_add_signed(self.ttl)
                .ok_or_else(|| PortfolioError::ConfigError {
                    message: "token expiry is out of range".to_string(),
                })?
                .timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                PortfolioError::InvalidToken
            })
    }
}

/// Checks the admin credentials and returns a fresh token. Unknown email and
/// wrong password are indistinguishable to the caller.
pub async fn authenticate(
    users: &dyn UserRepository,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<String> {
    let Some(user) = users.find_by_email(email.trim()).await? else {
        tracing::warn!("Login attempt for unknown account");
        return Err(PortfolioError::InvalidCredentials);
    };

    if !is_supported_hash(&user.password_hash) {
        tracing::warn!(
            "Stored password hash for {} cannot be verified; run `seed-admin` to reset it",
            user.id
        );
        return Err(PortfolioError::InvalidCredentials);
    }

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!("Login attempt with wrong password");
        return Err(PortfolioError::InvalidCredentials);
    }

    tracing::info!("Admin {} logged in", user.id);
    tokens.issue(&user.id)
}
