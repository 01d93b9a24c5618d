use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::types::{SortBy, SortOrder};

const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(100) {
    Some(limit) => limit,
    None => panic!("default limit is non-zero"),
};

/// Listing parameters used when a request leaves them out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDefaults {
    pub limit: NonZeroU32,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            sort_by: SortBy::OperatorStake,
            sort_order: SortOrder::Desc,
        }
    }
}
