//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{MONEY_SCALE, has_money_scale, round_money};
pub use pagination::{PageMeta, PageRequest, PageResponse};
