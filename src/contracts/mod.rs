//! Hunt contract lifecycle module.
//!
//! The contract state machine, booking completion, and bill
//! materialization. Transition and validation rules are pure functions in
//! `lifecycle`, `booking`, and `materializer`; database access is confined
//! to `queries`.

pub mod booking;
pub mod lifecycle;
pub mod materializer;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use models::{CompletionPayload, ContractStatus, HuntContract, SignerRole};
pub use routes::router;
