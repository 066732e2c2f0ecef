use crate::core::auth::{hash_password, is_supported_hash};
use crate::domain::model::NewUser;
use crate::domain::ports::UserRepository;
use crate::utils::error::Result;
use crate::utils::validation::{require_text, validate_email_address};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    /// The account existed with a hash this service cannot verify; it now
    /// carries an Argon2 hash of the configured password.
    Rehashed,
    Unchanged,
}

/// Creates the admin account if it does not exist yet, and resets a stored
/// password hash that cannot be verified.
pub async fn seed_admin(
    users: &dyn UserRepository,
    email: &str,
    password: &str,
) -> Result<SeedOutcome> {
    let email = email.trim();
    validate_email_address(email)?;
    require_text("password", password)?;

    if let Some(existing) = users.find_by_email(email).await? {
        if is_supported_hash(&existing.password_hash) {
            tracing::info!("Admin user already exists");
            return Ok(SeedOutcome::Unchanged);
        }

        users
            .set_password_hash(&existing.id, &hash_password(password)?)
            .await?;
        tracing::warn!("Replaced unsupported password hash of admin {}", existing.id);
        return Ok(SeedOutcome::Rehashed);
    }

    let user = users
        .insert(NewUser {
            email: email.to_string(),
            password_hash: hash_password(password)?,
        })
        .await?;

    tracing::info!("Admin user {} created", user.id);
    Ok(SeedOutcome::Created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryUserRepository;
    use crate::core::auth::{authenticate, verify_password, TokenService};
    use crate::utils::error::PortfolioError;

    const BCRYPT_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let users = MemoryUserRepository::new();

        assert_eq!(
            seed_admin(&users, "admin@example.com", "hunter22").await.unwrap(),
            SeedOutcome::Created
        );
        assert_eq!(
            seed_admin(&users, "admin@example.com", "other").await.unwrap(),
            SeedOutcome::Unchanged
        );

        let user = users
            .find_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(verify_password("hunter22", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_seed_admin_validates_input() {
        let users = MemoryUserRepository::new();

        assert!(seed_admin(&users, "not-an-email", "hunter22").await.is_err());
        assert!(seed_admin(&users, "admin@example.com", "").await.is_err());
    }

    #[tokio::test]
    async fn test_bcrypt_account_is_rejected_then_rehashed() {
        let users = MemoryUserRepository::new();
        users
            .insert(NewUser {
                email: "admin@example.com".to_string(),
                password_hash: BCRYPT_HASH.to_string(),
            })
            .await
            .unwrap();
        let tokens = TokenService::new("test-secret", 3600);

        let before = authenticate(&users, &tokens, "admin@example.com", "hunter22").await;
        assert!(matches!(before, Err(PortfolioError::InvalidCredentials)));

        assert_eq!(
            seed_admin(&users, "admin@example.com", "hunter22").await.unwrap(),
            SeedOutcome::Rehashed
        );

        let token = authenticate(&users, &tokens, "admin@example.com", "hunter22")
            .await
            .unwrap();
        assert!(tokens.verify(&token).is_ok());
        assert_eq!(
            seed_admin(&users, "admin@example.com", "hunter22").await.unwrap(),
            SeedOutcome::Unchanged
        );
    }
}
