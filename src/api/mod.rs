//! Remote content API: client and wire types.
//!
//! The API exposes exactly two read-only endpoints, both GET:
//!
//! - `/v1/category/all/` for the full category list
//! - `/v1/content/data/{id}/` for a single content record
//!
//! Both wrap their payload in a `{status, ...}` envelope where the literal
//! string `"200"` signals success. There are no retries here; callers decide
//! how a failure surfaces.

mod client;
mod types;

pub use client::{ApiClient, ApiError};
pub use types::{Category, Content};
