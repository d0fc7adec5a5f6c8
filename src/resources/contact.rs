//! Inbound contact-form messages. List and delete only.

use serde::Deserialize;

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessage {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// `data` payload of `/contact/list`.
#[derive(Debug, Deserialize)]
struct ContactListData {
    #[serde(default, alias = "contactList")]
    contacts: Vec<ContactMessage>,
    pagination: PageMeta,
}

pub struct ContactContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<ContactMessage>,
    page: u32,
    limit: u32,
}

impl<'a> ContactContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn store(&self) -> &ResourceStore<ContactMessage> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32) {
        self.page = page;
        self.limit = limit;

        let ticket = self.store.begin_fetch();
        let query = super::page_query(page, limit);

        match self
            .client
            .get::<ContactListData>("/contact/list", &query)
            .await
        {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.contacts, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let path = format!("/contact/{}/delete", id);
        if let Err(e) = self.client.post_ack(&path, &[]).await {
            self.store.record_error(e.to_string());
            return Err(e);
        }
        self.fetch(self.page, self.limit).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_list_counted_pagination() {
        let data: ContactListData = serde_json::from_str(
            r#"{
                "contactList": [{"_id": "m1", "name": "Anu", "message": "Call me back"}],
                "pagination": {"currentPage": 1, "totalPages": 1, "totalRecords": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(data.contacts.len(), 1);
        let pagination = data.pagination.normalize(10);
        assert_eq!(pagination.total, 1);
        assert_eq!(pagination.limit, 10);
    }
}
