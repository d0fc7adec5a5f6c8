//! Platform settings: a flat key/value document, no pagination, so this
//! context keeps its own loading/error pair instead of a list store.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::client::{ApiClient, ApiError};

pub struct SettingsContext<'a> {
    client: &'a ApiClient,
    settings: BTreeMap<String, Value>,
    loading: bool,
    error: Option<String>,
}

impl<'a> SettingsContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            settings: BTreeMap::new(),
            loading: false,
            error: None,
        }
    }

    pub fn settings(&self) -> &BTreeMap<String, Value> {
        &self.settings
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn fetch(&mut self) {
        self.loading = true;
        self.error = None;

        match self
            .client
            .get::<BTreeMap<String, Value>>("/settings", &[])
            .await
        {
            Ok(settings) => {
                self.settings = settings;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    pub async fn update(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        let form = [("key", key.to_string()), ("value", value.to_string())];
        if let Err(e) = self.client.post_ack("/settings/update", &form).await {
            self.error = Some(e.to_string());
            return Err(e);
        }
        self.fetch().await;
        Ok(())
    }
}
