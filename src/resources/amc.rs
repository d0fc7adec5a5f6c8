//! AMC (Asset Management Company) directory.

use serde::Deserialize;

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

#[derive(Debug, Clone, Deserialize)]
pub struct Amc {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "super::default_status")]
    pub status: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// `data` payload of `/amc/list`.
#[derive(Debug, Deserialize)]
struct AmcListData {
    #[serde(default, alias = "amcList")]
    amcs: Vec<Amc>,
    pagination: PageMeta,
}

/// Fields for `/amc/create` and `/amc/{id}/update`.
#[derive(Debug, Clone, Default)]
pub struct AmcDraft {
    pub name: String,
    pub code: String,
    pub email: String,
    pub phone: String,
}

impl AmcDraft {
    fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("code", self.code.clone()),
            ("email", self.email.clone()),
            ("phone", self.phone.clone()),
        ]
    }
}

pub struct AmcContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<Amc>,
    page: u32,
    limit: u32,
    search: Option<String>,
}

impl<'a> AmcContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            search: None,
        }
    }

    pub fn store(&self) -> &ResourceStore<Amc> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32, search: Option<String>) {
        self.page = page;
        self.limit = limit;
        self.search = search;

        let ticket = self.store.begin_fetch();
        let mut query = super::page_query(page, limit);
        if let Some(s) = &self.search {
            query.push(("search", s.clone()));
        }

        match self.client.get::<AmcListData>("/amc/list", &query).await {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.amcs, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    pub async fn create(&mut self, draft: &AmcDraft) -> Result<(), ApiError> {
        self.mutate("/amc/create".to_string(), draft.form()).await
    }

    pub async fn update(&mut self, id: &str, draft: &AmcDraft) -> Result<(), ApiError> {
        self.mutate(format!("/amc/{}/update", id), draft.form()).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.mutate(format!("/amc/{}/delete", id), Vec::new()).await
    }

    /// Mutation then resynchronizing fetch. The error is recorded in the
    /// store and also handed back so the caller can react.
    async fn mutate(
        &mut self,
        path: String,
        form: Vec<(&'static str, String)>,
    ) -> Result<(), ApiError> {
        if let Err(e) = self.client.post_ack(&path, &form).await {
            self.store.record_error(e.to_string());
            return Err(e);
        }
        self.fetch(self.page, self.limit, self.search.clone()).await;
        Ok(())
    }
}
