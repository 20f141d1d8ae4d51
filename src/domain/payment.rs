use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monetary amount in minor units.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Self {
        Amount(value)
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    pub user_id: u64,
    pub cost: Amount,
    pub create_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: u64,
    pub cost: Amount,
    pub create_date: DateTime<Utc>,
}

impl NewPayment {
    pub fn with_id(self, id: u64) -> Payment {
        Payment {
            id,
            user_id: self.user_id,
            cost: self.cost,
            create_date: self.create_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub user_id: u64,
    pub cost: Amount,
}
