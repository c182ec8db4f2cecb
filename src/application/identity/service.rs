//! Account use-cases
//!
//! HTTP handlers stay thin and delegate here. Whether an account is an
//! administrator is decided by the configured admin email list.

use std::sync::Arc;

use tracing::{info, warn};
use validator::ValidateEmail;

use crate::config::AdminConfig;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::{
    create_token, hash_password, verify_password, JwtConfig, MIN_PASSWORD_LEN,
};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    admin: AdminConfig,
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, admin: AdminConfig) -> Self {
        Self {
            repos,
            jwt_config,
            admin,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    fn role_for(&self, email: &str) -> UserRole {
        if self.admin.is_admin_email(email) {
            UserRole::Admin
        } else {
            UserRole::Customer
        }
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_email(email.trim()).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }
        if !verify_password(password, &user.password_hash) {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        // Admin list changes take effect at the next login
        let mut user = user;
        let role = self.role_for(&user.email);
        if role == UserRole::Admin && user.role != UserRole::Admin {
            self.repos.users().update_role(&user.id, role).await?;
            user.role = role;
        }
        self.repos.users().touch_login(&user.id).await?;

        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(&self, email: &str, password: &str, name: &str) -> DomainResult<User> {
        let email = email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(DomainError::Validation("Invalid email address".into()));
        }
        if name.trim().is_empty() {
            return Err(DomainError::Validation("Name is required".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let mut user = User::new(&email, name.trim(), hash_password(password)?);
        user.role = self.role_for(&email);
        let user = self.repos.users().create(user).await?;

        info!(user_id = %user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    /// Current account for a verified token subject
    pub async fn me(&self, user_id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))
    }

    /// Create an account for each configured admin email that has none,
    /// and promote existing ones. Returns how many accounts were created.
    pub async fn ensure_admin_accounts(&self) -> DomainResult<usize> {
        let mut created = 0;
        for email in &self.admin.emails {
            let email = email.trim().to_lowercase();
            if email.is_empty() {
                continue;
            }
            match self.repos.users().find_by_email(&email).await? {
                Some(user) if user.role == UserRole::Admin => {}
                Some(user) => {
                    self.repos.users().update_role(&user.id, UserRole::Admin).await?;
                    info!(email = %email, "Existing account promoted to admin");
                }
                None => {
                    if self.admin.default_password.len() < MIN_PASSWORD_LEN {
                        warn!(email = %email, "Skipping admin account: default password too short");
                        continue;
                    }
                    let mut user = User::new(
                        &email,
                        "Administrator",
                        hash_password(&self.admin.default_password)?,
                    );
                    user.role = UserRole::Admin;
                    self.repos.users().create(user).await?;
                    created += 1;
                    info!(email = %email, "Admin account created");
                }
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::verify_token;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_connection;

    async fn service() -> IdentityService {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(test_connection().await));
        let admin = AdminConfig {
            emails: vec!["owner@audiotailoc.com".into()],
            default_password: "doi-mat-khau-ngay".into(),
        };
        IdentityService::new(repos, JwtConfig::default(), admin)
    }

    #[tokio::test]
    async fn register_then_login_issues_token() {
        let svc = service().await;
        let user = svc
            .register("Khach@Example.com", "matkhau123", "Khách Hàng")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Customer);

        let auth = svc.login("khach@example.com", "matkhau123").await.unwrap();
        let claims = verify_token(&auth.token, svc.jwt_config()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(!claims.is_admin());
        assert!(svc.me(&user.id).await.unwrap().last_login_at.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_duplicates_are_rejected() {
        let svc = service().await;
        svc.register("a@b.vn", "matkhau123", "A").await.unwrap();
        assert!(matches!(
            svc.login("a@b.vn", "sai-mat-khau").await.unwrap_err(),
            DomainError::Unauthorized(_)
        ));
        assert!(matches!(
            svc.register("A@B.vn", "matkhau123", "A").await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            svc.register("c@d.vn", "short", "C").await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn admin_emails_get_admin_role() {
        let svc = service().await;
        assert_eq!(svc.ensure_admin_accounts().await.unwrap(), 1);
        assert_eq!(svc.ensure_admin_accounts().await.unwrap(), 0);

        let auth = svc
            .login("owner@audiotailoc.com", "doi-mat-khau-ngay")
            .await
            .unwrap();
        assert!(auth.user.is_admin());
        assert!(verify_token(&auth.token, svc.jwt_config()).unwrap().is_admin());
    }
}
