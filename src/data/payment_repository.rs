use crate::domain::page::{Page, PageRequest};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::repository::PaymentRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Default)]
struct PaymentTable {
    last_id: u64,
    payments: BTreeMap<u64, Payment>,
}

#[derive(Clone)]
pub struct InMemoryPaymentRepository {
    storage: Arc<RwLock<PaymentTable>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(PaymentTable::default())),
        }
    }
}

impl Default for InMemoryPaymentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    #[instrument(skip(self, payment), fields(user_id = payment.user_id))]
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        let mut storage = self.storage.write().await;
        storage.last_id += 1;
        let payment = payment.with_id(storage.last_id);
        storage.payments.insert(payment.id, payment.clone());
        debug!(payment_id = payment.id, "Payment saved to memory storage");
        Ok(payment)
    }

    async fn find_payment_by_id(&self, id: u64) -> Result<Option<Payment>> {
        let storage = self.storage.read().await;
        Ok(storage.payments.get(&id).cloned())
    }

    #[instrument(skip(self), fields(page = page.page, size = page.size))]
    async fn find_payments_by_user_id(
        &self,
        user_id: u64,
        page: PageRequest,
    ) -> Result<Page<Payment>> {
        let storage = self.storage.read().await;
        let owned: Vec<Payment> = storage
            .payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        let result = page.paginate(owned.into_iter());
        debug!(
            returned = result.content.len(),
            total = result.total_elements,
            "Payments page read from storage"
        );
        Ok(result)
    }
}
