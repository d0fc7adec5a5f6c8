//! Mutual fund catalog.
//!
//! The backend is loose about several fund fields: `category` may be a
//! plain string or a `{ name }` object, `fundManagers` may be an array
//! of strings, an array of objects, or a single object, and `holdings`
//! may arrive bare or wrapped one level deep. Instead of sniffing shapes
//! at every read site, each field deserializes once into a tagged union
//! here at the network boundary and collapses to a single canonical
//! type. Array forms win over object forms, absent fields become the
//! empty/placeholder value.

use serde::Deserialize;

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

/// Placeholder when the backend sends no category at all.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One portfolio position of a fund.
#[derive(Debug, Clone, Deserialize)]
pub struct FundHolding {
    #[serde(alias = "symbol")]
    pub name: String,
    /// Allocation in percent
    #[serde(default, alias = "allocation")]
    pub weight: f64,
    #[serde(default)]
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CategoryField {
    Name(String),
    Object { name: String },
}

impl CategoryField {
    fn canonical(field: Option<Self>) -> String {
        match field {
            Some(CategoryField::Name(name)) | Some(CategoryField::Object { name }) => name,
            None => UNCATEGORIZED.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ManagerEntry {
    Name(String),
    Object { name: String },
}

impl ManagerEntry {
    fn into_name(self) -> String {
        match self {
            ManagerEntry::Name(name) | ManagerEntry::Object { name } => name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FundManagersField {
    Many(Vec<ManagerEntry>),
    One(ManagerEntry),
}

impl FundManagersField {
    fn canonical(field: Option<Self>) -> Vec<String> {
        match field {
            Some(FundManagersField::Many(entries)) => {
                entries.into_iter().map(ManagerEntry::into_name).collect()
            }
            Some(FundManagersField::One(entry)) => vec![entry.into_name()],
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HoldingsField {
    Plain(Vec<FundHolding>),
    Wrapped { holdings: Vec<FundHolding> },
}

impl HoldingsField {
    fn canonical(field: Option<Self>) -> Vec<FundHolding> {
        match field {
            Some(HoldingsField::Plain(holdings))
            | Some(HoldingsField::Wrapped { holdings }) => holdings,
            None => Vec::new(),
        }
    }
}

/// A fund exactly as the backend sends it.
#[derive(Debug, Deserialize)]
struct MutualFundWire {
    #[serde(alias = "_id")]
    id: String,
    name: String,
    #[serde(default)]
    category: Option<CategoryField>,
    #[serde(default, alias = "fundManagers")]
    fund_managers: Option<FundManagersField>,
    #[serde(default)]
    holdings: Option<HoldingsField>,
    #[serde(default)]
    nav: f64,
    #[serde(default, alias = "riskLevel")]
    risk_level: Option<String>,
}

/// The canonical fund the rest of the console works with.
#[derive(Debug, Clone)]
pub struct MutualFund {
    pub id: String,
    pub name: String,
    pub category: String,
    pub fund_managers: Vec<String>,
    pub holdings: Vec<FundHolding>,
    pub nav: f64,
    pub risk_level: Option<String>,
}

impl From<MutualFundWire> for MutualFund {
    fn from(wire: MutualFundWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            category: CategoryField::canonical(wire.category),
            fund_managers: FundManagersField::canonical(wire.fund_managers),
            holdings: HoldingsField::canonical(wire.holdings),
            nav: wire.nav,
            risk_level: wire.risk_level,
        }
    }
}

/// `data` payload of `/mutual-fund/list`.
#[derive(Debug, Deserialize)]
struct FundListData {
    #[serde(default, alias = "fundList")]
    funds: Vec<MutualFundWire>,
    pagination: PageMeta,
}

pub struct MutualFundContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<MutualFund>,
    page: u32,
    limit: u32,
    category: Option<String>,
}

impl<'a> MutualFundContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            category: None,
        }
    }

    pub fn store(&self) -> &ResourceStore<MutualFund> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32, category: Option<String>) {
        self.page = page;
        self.limit = limit;
        self.category = category;

        let ticket = self.store.begin_fetch();
        let mut query = super::page_query(page, limit);
        if let Some(c) = &self.category {
            query.push(("category", c.clone()));
        }

        match self
            .client
            .get::<FundListData>("/mutual-fund/list", &query)
            .await
        {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                let funds = data.funds.into_iter().map(MutualFund::from).collect();
                self.store.complete(ticket, funds, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    /// Single-fund detail from `/mutual-fund/{id}`.
    pub async fn get(&mut self, id: &str) -> Result<MutualFund, ApiError> {
        let path = format!("/mutual-fund/{}", id);
        match self.client.get::<MutualFundWire>(&path, &[]).await {
            Ok(wire) => Ok(wire.into()),
            Err(e) => {
                self.store.record_error(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(json: &str) -> MutualFund {
        let wire: MutualFundWire = serde_json::from_str(json).unwrap();
        wire.into()
    }

    #[test]
    fn test_category_string() {
        let f = fund(r#"{"_id": "f1", "name": "Bluechip", "category": "Equity"}"#);
        assert_eq!(f.category, "Equity");
    }

    #[test]
    fn test_category_nested_object() {
        let f = fund(r#"{"_id": "f1", "name": "Bluechip", "category": {"name": "Equity"}}"#);
        assert_eq!(f.category, "Equity");
    }

    #[test]
    fn test_category_absent_gets_placeholder() {
        let f = fund(r#"{"_id": "f1", "name": "Bluechip"}"#);
        assert_eq!(f.category, UNCATEGORIZED);
    }

    #[test]
    fn test_fund_managers_string_array() {
        let f = fund(r#"{"_id": "f1", "name": "Bluechip", "fundManagers": ["A. Rao", "S. Mehta"]}"#);
        assert_eq!(f.fund_managers, vec!["A. Rao", "S. Mehta"]);
    }

    #[test]
    fn test_fund_managers_object_array() {
        let f = fund(
            r#"{"_id": "f1", "name": "Bluechip",
                "fundManagers": [{"name": "A. Rao"}, {"name": "S. Mehta"}]}"#,
        );
        assert_eq!(f.fund_managers, vec!["A. Rao", "S. Mehta"]);
    }

    #[test]
    fn test_fund_managers_single_object() {
        let f = fund(r#"{"_id": "f1", "name": "Bluechip", "fundManagers": {"name": "A. Rao"}}"#);
        assert_eq!(f.fund_managers, vec!["A. Rao"]);
    }

    #[test]
    fn test_holdings_plain_array() {
        let f = fund(
            r#"{"_id": "f1", "name": "Bluechip",
                "holdings": [{"name": "TCS", "weight": 9.1}]}"#,
        );
        assert_eq!(f.holdings.len(), 1);
        assert_eq!(f.holdings[0].name, "TCS");
    }

    #[test]
    fn test_holdings_wrapped_object() {
        let f = fund(
            r#"{"_id": "f1", "name": "Bluechip",
                "holdings": {"holdings": [{"symbol": "TCS", "allocation": 9.1}]}}"#,
        );
        assert_eq!(f.holdings.len(), 1);
        assert_eq!(f.holdings[0].name, "TCS");
        assert_eq!(f.holdings[0].weight, 9.1);
    }

    #[test]
    fn test_holdings_absent_is_empty() {
        let f = fund(r#"{"_id": "f1", "name": "Bluechip"}"#);
        assert!(f.holdings.is_empty());
    }
}
