//! Request middleware.

pub mod operator;

pub use operator::{CurrentOperator, OPERATOR_HEADER, operator_middleware};
