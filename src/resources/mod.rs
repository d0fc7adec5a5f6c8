//! Typed contexts, one per backend resource.
//!
//! Every context follows the same contract: it owns a
//! [`ResourceStore`](crate::store::ResourceStore) for its list state,
//! `fetch` replaces that state from the backend, and mutations go
//! through the backend then re-fetch to resynchronize. Payload mapping
//! (field renames, nested-object unwrapping, defaulting) lives next to
//! each context's wire types.

pub mod amc;
pub mod basket;
pub mod contact;
pub mod course;
pub mod explore;
pub mod mutual_fund;
pub mod settings;
pub mod support;
pub mod transaction;
pub mod user;

pub use amc::{Amc, AmcContext};
pub use basket::{Basket, BasketContext, BasketHolding};
pub use contact::{ContactContext, ContactMessage};
pub use course::{Course, CourseContext, Lesson};
pub use explore::{ExploreContext, ExploreSection};
pub use mutual_fund::{FundHolding, MutualFund, MutualFundContext};
pub use settings::SettingsContext;
pub use support::{SupportContext, SupportTicket, TicketStatus};
pub use transaction::{Transaction, TransactionContext};
pub use user::{PlatformUser, UserContext};

/// Query parameters every paginated list endpoint takes.
pub(crate) fn page_query(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

/// Backends omit `status` on some older rows.
pub(crate) fn default_status() -> String {
    "active".to_string()
}
