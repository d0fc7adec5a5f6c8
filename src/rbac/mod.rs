//! Role-based access control.
//!
//! The backend hands every logged-in user a flat list of permission
//! strings in `resource:action` form (`amc:create`, `basket:read`).
//! Wildcards come in two flavors: a held `resource:*` grants every action
//! on that resource, and the literal `*` grants everything. There are no
//! negative rules and no role hierarchy beyond what the list encodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The literal global wildcard a superadmin holds.
pub const GLOBAL_WILDCARD: &str = "*";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PermissionError {
    #[error("invalid permission `{0}`: expected `resource:action`")]
    InvalidGrammar(String),
}

/// A parsed `resource:action` pair.
///
/// CLI commands name their required permission through this type so a
/// typo fails at parse time rather than silently never matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    resource: String,
    action: String,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

/// Resources the console gates commands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Amc,
    Basket,
    Course,
    MutualFund,
    User,
    Transaction,
    Support,
    Contact,
    Settings,
    Explore,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Amc => "amc",
            Resource::Basket => "basket",
            Resource::Course => "course",
            Resource::MutualFund => "mutual-fund",
            Resource::User => "user",
            Resource::Transaction => "transaction",
            Resource::Support => "support",
            Resource::Contact => "contact",
            Resource::Settings => "settings",
            Resource::Explore => "explore",
        }
    }
}

/// Actions a permission string can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl Permission {
    /// Symbolic constructor; callers never spell the wire grammar.
    pub fn of(resource: Resource, action: Action) -> Self {
        Self::new(resource.as_str(), action.as_str())
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ':');
        let resource = parts.next().unwrap_or_default();
        let action = parts.next().unwrap_or_default();
        if resource.is_empty() || action.is_empty() {
            return Err(PermissionError::InvalidGrammar(s.to_string()));
        }
        Ok(Self::new(resource, action))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// The authenticated user as the backend describes them at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, alias = "kycStatus")]
    pub kyc_status: Option<String>,
}

impl Principal {
    /// Flat evaluator over the held permission list.
    ///
    /// A held `resource:*` matches by prefix including the colon, so
    /// `amc:*` grants `amc:read` but not `amcx:read`. Recomputed per
    /// call; the list is small and never mutated mid-session.
    pub fn has_permission(&self, required: &str) -> bool {
        for held in &self.permissions {
            if held == GLOBAL_WILDCARD || held == required {
                return true;
            }
            if let Some(prefix) = held.strip_suffix('*') {
                if prefix.ends_with(':') && required.starts_with(prefix) {
                    return true;
                }
            }
        }
        false
    }

    /// Typed variant of [`has_permission`](Self::has_permission).
    pub fn can(&self, permission: &Permission) -> bool {
        self.has_permission(&permission.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(permissions: &[&str]) -> Principal {
        Principal {
            id: "u1".to_string(),
            name: "Asha Iyer".to_string(),
            email: "asha@example.com".to_string(),
            role: "ops".to_string(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            kyc_status: None,
        }
    }

    #[test]
    fn test_global_wildcard_grants_everything() {
        let p = principal(&["*"]);
        assert!(p.has_permission("amc:create"));
        assert!(p.has_permission("support:close"));
        assert!(p.has_permission("anything:at-all"));
    }

    #[test]
    fn test_exact_match() {
        let p = principal(&["amc:read", "basket:create"]);
        assert!(p.has_permission("amc:read"));
        assert!(p.has_permission("basket:create"));
        assert!(!p.has_permission("amc:create"));
    }

    #[test]
    fn test_resource_wildcard() {
        let p = principal(&["amc:*"]);
        assert!(p.has_permission("amc:read"));
        assert!(p.has_permission("amc:create"));
        assert!(!p.has_permission("user:read"));
    }

    #[test]
    fn test_wildcard_prefix_requires_colon_boundary() {
        let p = principal(&["amc:*"]);
        // `amcx` is a different resource even though it shares a prefix
        assert!(!p.has_permission("amcx:read"));
    }

    #[test]
    fn test_empty_permission_list_denies() {
        let p = principal(&[]);
        assert!(!p.has_permission("amc:read"));
    }

    #[test]
    fn test_bare_wildcard_entry_is_not_a_prefix_rule() {
        // A held `amc*` (no colon) is malformed and must not match
        let p = principal(&["amc*"]);
        assert!(!p.has_permission("amc:read"));
    }

    #[test]
    fn test_permission_parse() {
        let p: Permission = "amc:create".parse().unwrap();
        assert_eq!(p.resource(), "amc");
        assert_eq!(p.action(), "create");
        assert_eq!(p.to_string(), "amc:create");

        assert!("amc".parse::<Permission>().is_err());
        assert!(":create".parse::<Permission>().is_err());
        assert!("amc:".parse::<Permission>().is_err());
    }

    #[test]
    fn test_symbolic_constructor_matches_wire_grammar() {
        let perm = Permission::of(Resource::MutualFund, Action::Read);
        assert_eq!(perm.to_string(), "mutual-fund:read");
        assert_eq!(perm, "mutual-fund:read".parse().unwrap());

        let p = principal(&["mutual-fund:*"]);
        assert!(p.can(&perm));
        assert!(!p.can(&Permission::of(Resource::Settings, Action::Update)));
    }

    #[test]
    fn test_can_matches_string_evaluator() {
        let p = principal(&["course:*"]);
        let perm = Permission::new("course", "update");
        assert!(p.can(&perm));
        assert_eq!(p.can(&perm), p.has_permission("course:update"));
    }
}
