//! Core type definitions for the triage queue.
//!
//! This crate defines the plain data types shared by the heap and its hosts:
//! - Patient identifiers and bounded priority scores
//! - Owned patient snapshots handed out by the queue
//! - Validated admission requests decoded from untyped input
//!
//! Nothing here knows about heap layout; ordering rules live in `triage-queue`.

mod admission;
mod ids;
mod patient;
mod priority;

pub use admission::Admission;
pub use ids::PatientId;
pub use patient::Patient;
pub use priority::Priority;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating an admission.
///
/// Every variant is produced before the queue is touched, so a caller that
/// sees one of these can rely on the queue being unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid patient id: {0}")]
    InvalidIdentity(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid label: {0}")]
    InvalidLabel(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
