pub mod cli;
pub mod client;
pub mod config;
pub mod rbac;
pub mod resources;
pub mod session;
pub mod store;

pub use client::{ApiClient, ApiError};
pub use rbac::{Permission, Principal};
pub use session::Session;
pub use store::{Pagination, ResourceStore};
