pub mod cache;
pub mod error;
pub mod recommendation;
pub mod snapshot;
