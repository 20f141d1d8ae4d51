use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::user::{NewUser, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user and returns it with its assigned id.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: u64) -> Result<Option<User>>;
    /// Users in id order.
    async fn find_all_users(&self, page: PageRequest) -> Result<Page<User>>;
    async fn add_payment(&self, user_id: u64, payment: Payment) -> Result<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn find_payment_by_id(&self, id: u64) -> Result<Option<Payment>>;
    /// Payments owned by `user_id`, in id order.
    async fn find_payments_by_user_id(&self, user_id: u64, page: PageRequest)
    -> Result<Page<Payment>>;
}
