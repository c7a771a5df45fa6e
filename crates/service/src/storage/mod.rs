//! Storage abstractions for service layer
//!
//! In-memory stores shared between request handlers and background workers.
//! Nothing here touches disk; everything lives as long as its owning `Arc`.

pub mod concurrent_map;
pub mod value;

pub use concurrent_map::ConcurrentMap;
pub use value::CacheValue;
