//! Data models for the discovery backend.
//!
//! Field names serialize in camelCase to match the marketplace frontend.

mod collection;
mod creator;
mod resource;

pub use collection::*;
pub use creator::*;
pub use resource::*;
