//! Thin GitHub REST wrapper used by the prospector job
//!
//! - raw calls in `index` return status, body and `Link` header untouched
//! - response shapes in `models`

pub mod index;
pub mod models;
