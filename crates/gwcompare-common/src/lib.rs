pub mod compare;
pub mod config;
pub mod convert;
pub mod errors;
pub mod normalize;
pub mod query;
pub mod types;

pub use compare::{compare, ComparisonCard, ComparisonPair, Direction, FormatMode};
pub use config::{QueryDefaults, RegistryConfig, ServiceConfig};
pub use errors::{Error, Result};
pub use normalize::{
    normalize, normalize_batch, normalize_batch_with_report, normalize_listing_with_report,
    BatchReport, NormalizedBatch,
};
pub use query::{filter_gateways, GatewayQueryService, GatewayRegistry};
pub use types::*;
