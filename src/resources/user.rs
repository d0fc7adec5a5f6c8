//! Platform users: investors and distributors.

use serde::Deserialize;

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformUser {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// KYC verification state: pending, verified, rejected
    #[serde(default = "default_kyc", alias = "kycStatus")]
    pub kyc_status: String,
    #[serde(default = "super::default_status")]
    pub status: String,
}

fn default_kyc() -> String {
    "pending".to_string()
}

/// `data` payload of `/user/list`.
#[derive(Debug, Deserialize)]
struct UserListData {
    #[serde(default, alias = "userList")]
    users: Vec<PlatformUser>,
    pagination: PageMeta,
}

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<String>,
    pub kyc_status: Option<String>,
}

pub struct UserContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<PlatformUser>,
    page: u32,
    limit: u32,
    filter: UserFilter,
}

impl<'a> UserContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            filter: UserFilter::default(),
        }
    }

    pub fn store(&self) -> &ResourceStore<PlatformUser> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32, filter: UserFilter) {
        self.page = page;
        self.limit = limit;
        self.filter = filter;

        let ticket = self.store.begin_fetch();
        let mut query = super::page_query(page, limit);
        if let Some(role) = &self.filter.role {
            query.push(("role", role.clone()));
        }
        if let Some(kyc) = &self.filter.kyc_status {
            query.push(("kycStatus", kyc.clone()));
        }

        match self.client.get::<UserListData>("/user/list", &query).await {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.users, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    pub async fn update_role(&mut self, id: &str, role: &str) -> Result<(), ApiError> {
        self.mutate(id, vec![("role", role.to_string())]).await
    }

    pub async fn update_kyc(&mut self, id: &str, kyc_status: &str) -> Result<(), ApiError> {
        self.mutate(id, vec![("kycStatus", kyc_status.to_string())])
            .await
    }

    async fn mutate(
        &mut self,
        id: &str,
        form: Vec<(&'static str, String)>,
    ) -> Result<(), ApiError> {
        let path = format!("/user/{}/update", id);
        if let Err(e) = self.client.post_ack(&path, &form).await {
            self.store.record_error(e.to_string());
            return Err(e);
        }
        self.fetch(self.page, self.limit, self.filter.clone()).await;
        Ok(())
    }
}
