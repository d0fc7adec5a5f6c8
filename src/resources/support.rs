//! Support tickets.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::client::{ApiClient, ApiError};
use crate::store::{PageMeta, ResourceStore, DEFAULT_LIMIT};

/// Ticket lifecycle: open -> in-progress -> resolved -> closed. The
/// backend enforces transitions; the console only names the states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in-progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in-progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            other => Err(format!(
                "invalid status `{}`: expected open, in-progress, resolved or closed",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportTicket {
    #[serde(alias = "_id")]
    pub id: String,
    pub subject: String,
    #[serde(default = "default_ticket_status")]
    pub status: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default, alias = "userEmail")]
    pub user_email: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

fn default_ticket_status() -> String {
    "open".to_string()
}

fn default_priority() -> String {
    "normal".to_string()
}

/// `data` payload of `/support/list`.
#[derive(Debug, Deserialize)]
struct TicketListData {
    #[serde(default, alias = "ticketList")]
    tickets: Vec<SupportTicket>,
    pagination: PageMeta,
}

pub struct SupportContext<'a> {
    client: &'a ApiClient,
    store: ResourceStore<SupportTicket>,
    page: u32,
    limit: u32,
    status: Option<TicketStatus>,
}

impl<'a> SupportContext<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            store: ResourceStore::new(),
            page: 1,
            limit: DEFAULT_LIMIT,
            status: None,
        }
    }

    pub fn store(&self) -> &ResourceStore<SupportTicket> {
        &self.store
    }

    pub async fn fetch(&mut self, page: u32, limit: u32, status: Option<TicketStatus>) {
        self.page = page;
        self.limit = limit;
        self.status = status;

        let ticket = self.store.begin_fetch();
        let mut query = super::page_query(page, limit);
        if let Some(status) = self.status {
            query.push(("status", status.to_string()));
        }

        match self
            .client
            .get::<TicketListData>("/support/list", &query)
            .await
        {
            Ok(data) => {
                let pagination = data.pagination.normalize(limit);
                self.store.complete(ticket, data.tickets, pagination);
            }
            Err(e) => {
                self.store.fail(ticket, e.to_string());
            }
        }
    }

    pub async fn update_status(&mut self, id: &str, status: TicketStatus) -> Result<(), ApiError> {
        let path = format!("/support/{}/update", id);
        let form = [("status", status.to_string())];
        if let Err(e) = self.client.post_ack(&path, &form).await {
            self.store.record_error(e.to_string());
            return Err(e);
        }
        self.fetch(self.page, self.limit, self.status).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for s in ["open", "in-progress", "resolved", "closed"] {
            let status: TicketStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("reopened".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_ticket_defaults() {
        let ticket: SupportTicket =
            serde_json::from_str(r#"{"_id": "s1", "subject": "SIP not visible"}"#).unwrap();
        assert_eq!(ticket.status, "open");
        assert_eq!(ticket.priority, "normal");
    }
}
