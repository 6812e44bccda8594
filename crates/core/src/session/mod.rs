//! Cash session lifecycle.
//!
//! At most one open session per operator; a session is created open,
//! mutated only by its close, and never reopened.

pub mod error;
pub mod service;
pub mod types;

pub use error::SessionError;
pub use service::SessionService;
pub use types::{
    CloseOutcome, CloseSessionInput, OpenSessionInput, SessionSnapshot, SessionStatus,
};
