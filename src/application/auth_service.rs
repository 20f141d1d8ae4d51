use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{AuthenticatedPrincipal, LoginRequest, UserRead};
use crate::infrastructure::security::{generate_token, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, trace, warn};

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    jwt_validity_secs: u64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, jwt_validity_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            jwt_validity_secs,
        }
    }

    /// Checks an email/password pair against stored users.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn verify_credentials(&self, req: &LoginRequest) -> Result<AuthenticatedPrincipal> {
        trace!("Verifying credentials");

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::Unauthorized("Invalid email or password".to_string())
            })?;

        let password = req.password.clone();
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| {
                    error!(error = %e, "Password verification task failed");
                    DomainError::Internal(format!("Password verification task failed: {}", e))
                })?
                .map_err(|e| {
                    error!(error = %e, "Failed to verify password");
                    DomainError::Internal(format!("Failed to verify password: {}", e))
                })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during login");
            return Err(DomainError::Unauthorized("Invalid email or password".to_string()).into());
        }

        Ok(AuthenticatedPrincipal::from(&user))
    }

    /// Verifies credentials and issues a token for the principal's role.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<UserRead> {
        let principal = self.verify_credentials(&req).await?;

        let role = principal.role.ok_or_else(|| {
            error!(user_id = principal.user_id, "Registered user has no role");
            DomainError::InvalidState(format!("Registered user {} has no role", req.email))
        })?;

        let token = generate_token(
            &principal.email,
            role.as_str(),
            &self.jwt_secret,
            self.jwt_validity_secs,
        )
        .map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = principal.user_id, role = %role, "Login successful");

        Ok(UserRead {
            id: principal.user_id,
            email: principal.email,
            first_name: principal.first_name,
            last_name: principal.last_name,
            role: role.to_string(),
            token,
        })
    }
}
