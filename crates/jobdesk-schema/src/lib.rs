//! Wire models shared between the jobdesk web frontend and the REST backend.
//!
//! The backend contract is not fully pinned, so response models are lenient:
//! unknown fields are ignored, most fields are optional, and paginated
//! envelopes accept the handful of shapes the backend has been observed to
//! return.

pub mod model;

pub use model::*;
