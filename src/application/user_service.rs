use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, NewUser, User, UserRole};
use crate::domain::validation::Validate;
use crate::infrastructure::security::hash_password;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct UserService<R: UserRepository> {
    user_repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(user_repository: Arc<R>) -> Self {
        Self { user_repository }
    }

    /// Signup. The role is always `USER`; callers cannot choose it.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: CreateUser) -> Result<User> {
        req.validate()?;

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(
                DomainError::Conflict("User with this email already exists".to_string()).into(),
            );
        }

        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                DomainError::Internal(format!("Password hashing task failed: {}", e))
            })?
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {}", e))
            })?;

        let new_user = NewUser {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            role: Some(UserRole::User),
        };

        let user = self.user_repository.create_user(new_user).await?;
        info!(user_id = user.id, email = %user.email, "User registered successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn find_user(&self, id: u64) -> Result<User> {
        self.user_repository
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User not found: {}", id)).into())
    }

    #[instrument(skip(self))]
    pub async fn find_all_users(&self, page: PageRequest) -> Result<Page<User>> {
        let users = self.user_repository.find_all_users(page.normalized()).await?;
        debug!(returned = users.content.len(), "Users page loaded");
        Ok(users)
    }
}
