use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::Payment;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Default)]
struct UserTable {
    last_id: u64,
    users: BTreeMap<u64, User>,
}

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(UserTable::default())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if storage.users.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Email already taken");
            return Err(
                DomainError::Conflict("User with this email already exists".to_string()).into(),
            );
        }
        storage.last_id += 1;
        let user = user.with_id(storage.last_id);
        storage.users.insert(user.id, user.clone());
        debug!(
            user_id = user.id,
            email = %user.email,
            "User saved to memory storage"
        );
        Ok(user)
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.users.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = u.id, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.users.get(&id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(page = page.page, size = page.size))]
    async fn find_all_users(&self, page: PageRequest) -> Result<Page<User>> {
        let storage = self.storage.read().await;
        let result = page.paginate(storage.users.values().cloned());
        debug!(
            returned = result.content.len(),
            total = result.total_elements,
            "Users page read from storage"
        );
        Ok(result)
    }

    #[instrument(skip(self, payment), fields(payment_id = payment.id))]
    async fn add_payment(&self, user_id: u64, payment: Payment) -> Result<()> {
        let mut storage = self.storage.write().await;
        let user = storage
            .users
            .get_mut(&user_id)
            .ok_or_else(|| DomainError::NotFound(format!("User not found: {}", user_id)))?;
        user.payments.push(payment);
        trace!(user_id = user_id, "Payment attached to user");
        Ok(())
    }
}
