//! Discovery resolvers.
//!
//! Services borrow a [`DiscoveryStore`](crate::db::DiscoveryStore) for the
//! duration of a request and hold no state of their own.

mod collection;
mod creator;

pub use collection::CollectionService;
pub use creator::CreatorService;
