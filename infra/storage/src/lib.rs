//! Durable local key/value storage for the campus clients.
//!
//! Items are UTF-8 strings addressed by key, optionally grouped into scopes, with the
//! semantics of browser local storage: a missing item reads as `None`, writes replace the
//! previous value, removal of an absent item is not an error.
//!
//! # Core Features
//!
//! - **Sandbox Security**: keys and scope names are validated and every resolved path is
//!   checked against the canonical root.
//! - **Atomic Writes**: unique temp write + `fsync` + `rename`.
//! - **Transparent Compression**: optional LZ4 block compression.
//! - **Self-Healing**: orphaned temp files are removed when the store is opened.
//!
//! # Examples
//!
//! ```rust
//! use campus_storage::{Compression, LocalStorage, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let storage = LocalStorage::builder()
//!         .root(&root)
//!         .compression(Compression::Lz4)
//!         .open()
//!         .await?;
//!
//!     storage.set_item("lastFlow", "registrar").await?;
//!     assert_eq!(storage.get_item("lastFlow").await?.as_deref(), Some("registrar"));
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod keys;
mod maintenance;
mod scope;
mod security;

pub use builder::StorageBuilder;
pub use engine::{Compression, LocalStorage};
pub use error::{StorageError, StorageErrorExt};
pub use keys::ScopeName;
pub use scope::ScopedStorage;
