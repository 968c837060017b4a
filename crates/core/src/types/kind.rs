//! Entity kinds served by the API.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The kind of record a repository or use case operates on.
///
/// Customers and users share one schema and one set of use cases; the kind
/// only selects the table, the labels used in error messages, and the
/// prefix of audit actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Customer,
    User,
}

impl EntityKind {
    /// All kinds, in route registration order.
    pub const ALL: [Self; 2] = [Self::Customer, Self::User];

    /// Human-readable label, e.g. `Customer`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::User => "User",
        }
    }

    /// Plural resource name, used for the URL segment, the table name and
    /// audit action prefixes.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Customer => "customers",
            Self::User => "users",
        }
    }

    /// Build a namespaced audit action such as `customers.create`.
    #[must_use]
    pub fn action(self, verb: &str) -> String {
        format!("{}.{verb}", self.resource())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_resources() {
        assert_eq!(EntityKind::Customer.label(), "Customer");
        assert_eq!(EntityKind::User.resource(), "users");
    }

    #[test]
    fn test_action() {
        assert_eq!(EntityKind::Customer.action("create"), "customers.create");
        assert_eq!(EntityKind::User.action("list_all"), "users.list_all");
    }
}
