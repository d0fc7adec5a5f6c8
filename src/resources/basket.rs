//! Baskets: curated stock lists with target/stop-loss metadata, sold as
//! subscription products.

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

/// One constituent of a basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketHolding {
    pub symbol: String,
    /// Portfolio weight in percent
    #[serde(default)]
    pub weight: f64,
    #[serde(default, rename = "targetPrice")]
    pub target_price: Option<f64>,
    #[serde(default, rename = "stopLoss")]
    pub stop_loss: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Basket {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub holdings: Vec<BasketHolding>,
    /// Monthly subscription price in rupees
    #[serde(default, alias = "subscriptionPrice")]
    pub subscription_price: f64,
    #[serde(default = "super::default_status")]
    pub status: String,
}

/// `data` payload of `/basket/list`.
#[derive(Debug, Deserialize)]
struct BasketListData {
    #[serde(default, alias = "basketList")]
    baskets: Vec<Basket>,
    pagination: PageMeta,
}

#[derive(Debug, Clone, Default)]
pub struct BasketDraft {
    pub name: String,
    pub description: String,
    pub subscription_price: f64,
    pub holdings: Vec<BasketHolding>,
}

impl BasketDraft {
    /// Holdings travel as a JSON string inside the form body; the rest
    /// are plain fields.
    fn form(&self) -> Result<Vec<(&'static str, String)>, ApiError> {
        Ok(vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("subscriptionPrice", self.subscription_price.to_string()),
            ("holdings", serde_json::to_string(&self.holdings)?),
        ])
    }
}

pub struct BasketContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<Basket>,
    page: u32,
    limit: u32,
}

impl<'a> BasketContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn store(&self) -> &ResourceStore<Basket> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32) {
        self.page = page;
        self.limit = limit;

        let ticket = self.store.begin_fetch();
        let query = super::page_query(page, limit);

        match self.client.get::<BasketListData>("/basket/list", &query).await {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.baskets, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    pub async fn create(&mut self, draft: &BasketDraft) -> Result<(), ApiError> {
        let form = draft.form()?;
        self.mutate("/basket/create".to_string(), form).await
    }

    pub async fn update(&mut self, id: &str, draft: &BasketDraft) -> Result<(), ApiError> {
        let form = draft.form()?;
        self.mutate(format!("/basket/{}/update", id), form).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.mutate(format!("/basket/{}/delete", id), Vec::new()).await
    }

    async fn mutate(
        &mut self,
        path: String,
        form: Vec<(&'static str, String)>,
    ) -> Result<(), ApiError> {
        if let Err(e) = self.client.post_ack(&path, &form).await {
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
    fn test_holdings_decode_with_camel_case_fields() {
        let basket: Basket = serde_json::from_str(
            r#"{
                "_id": "b1",
                "name": "Momentum 10",
                "holdings": [
                    {"symbol": "TCS", "weight": 12.5, "targetPrice": 4200.0, "stopLoss": 3500.0},
                    {"symbol": "INFY", "weight": 8.0}
                ],
                "subscriptionPrice": 499.0
            }"#,
        )
        .unwrap();

        assert_eq!(basket.holdings.len(), 2);
        assert_eq!(basket.holdings[0].target_price, Some(4200.0));
        assert_eq!(basket.holdings[1].stop_loss, None);
        assert_eq!(basket.subscription_price, 499.0);
        assert_eq!(basket.status, "active");
    }

    #[test]
    fn test_draft_serializes_holdings_as_json_field() {
        let draft = BasketDraft {
            name: "Momentum 10".to_string(),
            holdings: vec![BasketHolding {
                symbol: "TCS".to_string(),
                weight: 12.5,
                target_price: None,
                stop_loss: None,
            }],
            ..Default::default()
        };
        let form = draft.form().unwrap();
        let holdings = &form.iter().find(|(k, _)| *k == "holdings").unwrap().1;
        assert!(holdings.contains("\"symbol\":\"TCS\""));
    }
}
