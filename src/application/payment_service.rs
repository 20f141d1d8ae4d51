use crate::domain::error::DomainError;
use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::{CreatePayment, NewPayment, Payment};
use crate::domain::repository::{PaymentRepository, UserRepository};
use crate::domain::validation::Validate;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct PaymentService<P: PaymentRepository, U: UserRepository> {
    payment_repository: Arc<P>,
    user_repository: Arc<U>,
}

impl<P: PaymentRepository, U: UserRepository> PaymentService<P, U> {
    pub fn new(payment_repository: Arc<P>, user_repository: Arc<U>) -> Self {
        Self {
            payment_repository,
            user_repository,
        }
    }

    #[instrument(skip(self, req), fields(user_id = req.user_id, cost = req.cost.inner()))]
    pub async fn create_payment(&self, req: CreatePayment) -> Result<Payment> {
        req.validate()?;

        if self
            .user_repository
            .find_user_by_id(req.user_id)
            .await?
            .is_none()
        {
            warn!(user_id = req.user_id, "Payment for unknown user");
            return Err(DomainError::NotFound(format!("User not found: {}", req.user_id)).into());
        }

        let payment = self
            .payment_repository
            .create_payment(NewPayment {
                user_id: req.user_id,
                cost: req.cost,
                create_date: Utc::now(),
            })
            .await?;
        self.user_repository
            .add_payment(payment.user_id, payment.clone())
            .await?;

        info!(payment_id = payment.id, user_id = payment.user_id, "Payment created");
        Ok(payment)
    }

    #[instrument(skip(self))]
    pub async fn find_payment(&self, id: u64) -> Result<Payment> {
        self.payment_repository
            .find_payment_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Payment not found: {}", id)).into())
    }

    #[instrument(skip(self))]
    pub async fn find_payments_by_user_id(
        &self,
        user_id: u64,
        page: PageRequest,
    ) -> Result<Page<Payment>> {
        let payments = self
            .payment_repository
            .find_payments_by_user_id(user_id, page.normalized())
            .await?;
        debug!(returned = payments.content.len(), "Payments page loaded");
        Ok(payments)
    }
}
