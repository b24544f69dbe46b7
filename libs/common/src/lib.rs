//! Common library for the reviewer area
//!
//! This crate provides functionality shared by the reviewer services: the
//! persistent key-value storage substrate, an injectable clock, and the
//! storage error types.

pub mod clock;
pub mod error;
pub mod storage;

/// Example usage of the storage module
///
/// ```rust,no_run
/// use common::storage::{FileStore, KeyValueStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStore::open(".reviewer-storage").await?;
///     store.set("efReviewerSession", "{}").await?;
///     println!("Stored value: {:?}", store.get("efReviewerSession").await?);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
