//! Capability areas gated by role.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A named capability area of the CRM.
///
/// Closed set: adding a variant forces the authorization table to be updated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Employees,
    Inventory,
    Customers,
    Orders,
    Tasks,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Employees,
        Feature::Inventory,
        Feature::Customers,
        Feature::Orders,
        Feature::Tasks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Employees => "employees",
            Feature::Inventory => "inventory",
            Feature::Customers => "customers",
            Feature::Orders => "orders",
            Feature::Tasks => "tasks",
        }
    }
}

impl core::fmt::Display for Feature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| DomainError::UnknownFeature(s.to_string()))
    }
}
