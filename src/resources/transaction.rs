//! Transaction history. Read-only: the backend records transactions,
//! the console only lists and filters them.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::store::{PageMeta, ResourceStore};

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name of the investor, unwrapped from a nested user object
    /// when the backend sends one.
    #[serde(default, alias = "userName")]
    pub user_name: String,
    /// What was bought or sold (fund or basket name)
    #[serde(default, alias = "productName")]
    pub product_name: String,
    #[serde(default)]
    pub amount: f64,
    /// purchase, redemption, sip, subscription
    #[serde(default, rename = "type")]
    pub txn_type: String,
    #[serde(default = "default_txn_status")]
    pub status: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

fn default_txn_status() -> String {
    "pending".to_string()
}

/// `data` payload of `/transaction/list`.
#[derive(Debug, Deserialize)]
struct TransactionListData {
    #[serde(default, alias = "transactionList")]
    transactions: Vec<Transaction>,
    pagination: PageMeta,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub txn_type: Option<String>,
}

pub struct TransactionContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<Transaction>,
}

impl<'a> TransactionContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
        }
    }

    pub fn store(&self) -> &ResourceStore<Transaction> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32, filter: &TransactionFilter) {
        let ticket = self.store.begin_fetch();
        let mut query = super::page_query(page, limit);
        if let Some(user_id) = &filter.user_id {
            query.push(("userId", user_id.clone()));
        }
        if let Some(status) = &filter.status {
            query.push(("status", status.clone()));
        }
        if let Some(txn_type) = &filter.txn_type {
            query.push(("type", txn_type.clone()));
        }

        match self
            .client
            .get::<TransactionListData>("/transaction/list", &query)
            .await
        {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.transactions, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_field_rename() {
        let txn: Transaction = serde_json::from_str(
            r#"{
                "_id": "t1",
                "userName": "Meera",
                "productName": "Bluechip Fund",
                "amount": 5000.0,
                "type": "sip",
                "status": "completed",
                "createdAt": "2026-08-01T09:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(txn.txn_type, "sip");
        assert_eq!(txn.status, "completed");
    }

    #[test]
    fn test_transaction_defaults() {
        let txn: Transaction = serde_json::from_str(r#"{"_id": "t2"}"#).unwrap();
        assert_eq!(txn.status, "pending");
        assert_eq!(txn.amount, 0.0);
        assert!(txn.created_at.is_none());
    }
}
