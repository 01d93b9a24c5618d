//! Common data types used throughout the gwcompare system

pub mod gateway;
pub mod query;
pub mod raw;

pub use gateway::{Gateway, GatewayStatus, Observer, Weights};
pub use query::{GatewayQuery, ListGatewaysParams, SortBy, SortOrder};
pub use raw::{RawGateway, RawNumber, RawObserver, RawSettings, RawStats, RawWeights, StakeUnits};
