//! Sorting and filtering parameters for gateway listings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::config::QueryDefaults;
use crate::errors::Error;

/// Metric the registry sorts by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortBy {
    #[serde(rename = "operatorStake")]
    OperatorStake,
    #[serde(rename = "totalStake")]
    TotalStake,
    #[serde(rename = "delegateStake")]
    DelegateStake,
    #[serde(rename = "performance")]
    Performance,
    #[serde(rename = "streak")]
    Streak,
    #[serde(rename = "delegateEAY")]
    DelegateEay,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::OperatorStake => "operatorStake",
            SortBy::TotalStake => "totalStake",
            SortBy::DelegateStake => "delegateStake",
            SortBy::Performance => "performance",
            SortBy::Streak => "streak",
            SortBy::DelegateEay => "delegateEAY",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operatorStake" => Ok(SortBy::OperatorStake),
            "totalStake" => Ok(SortBy::TotalStake),
            "delegateStake" => Ok(SortBy::DelegateStake),
            "performance" => Ok(SortBy::Performance),
            "streak" => Ok(SortBy::Streak),
            "delegateEAY" => Ok(SortBy::DelegateEay),
            other => Err(Error::Config(format!("unknown sort key: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"asc"` is ascending, everything else is descending.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters forwarded verbatim to the registry's list call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListGatewaysParams {
    pub limit: NonZeroU32,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

/// A gateway listing request: registry parameters plus a local text filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayQuery {
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    /// Case-insensitive substring over address and domain; empty means no filter.
    pub search: String,
    pub limit: NonZeroU32,
}

impl GatewayQuery {
    pub fn from_defaults(defaults: &QueryDefaults) -> Self {
        Self {
            sort_by: defaults.sort_by,
            sort_order: defaults.sort_order,
            search: String::new(),
            limit: defaults.limit,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn list_params(&self) -> ListGatewaysParams {
        ListGatewaysParams {
            limit: self.limit,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
        }
    }
}

impl Default for GatewayQuery {
    fn default() -> Self {
        Self::from_defaults(&QueryDefaults::default())
    }
}
