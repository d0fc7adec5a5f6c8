//! Explore page content: curated sections of featured funds. Read-only.

use serde::Deserialize;

use crate::client::ApiClient;
use crate::store::{PageMeta, Pagination, ResourceStore};

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedFund {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub nav: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExploreSection {
    pub title: String,
    #[serde(default, alias = "fundList")]
    pub funds: Vec<FeaturedFund>,
}

/// `data` payload of `/explore/list`. Pagination is optional here; the
/// endpoint usually returns every curated section at once.
#[derive(Debug, Deserialize)]
struct ExploreListData {
    #[serde(default, alias = "sectionList")]
    sections: Vec<ExploreSection>,
    #[serde(default)]
    pagination: Option<PageMeta>,
}

pub struct ExploreContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<ExploreSection>,
}

impl<'a> ExploreContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
        }
    }

    pub fn store(&self) -> &ResourceStore<ExploreSection> {
        &self.store
    }

    pub async fn fetch(&mut self) {
        let ticket = self.store.begin_fetch();

        match self.client.get::<ExploreListData>("/explore/list", &[]).await {
            Ok(data) => {
                let total = data.sections.len() as u64;
                let pagination = match data.pagination {
                    Some(meta) => meta.normalize(total.max(1) as u32),
                    None => Pagination {
                        page: 1,
                        limit: total.max(1) as u32,
                        total,
                    },
                };
                self.store.complete(ticket, data.sections, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }
}
