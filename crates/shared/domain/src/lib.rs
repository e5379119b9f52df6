//! # Domain Models
//!
//! Pure data shared by the campus crates: the configuration tree, storage keys and endpoints,
//! the reference-list catalog and the upstream vocabularies. Keep it lean: no I/O, networking,
//! or heavy logic.

pub mod config;
pub mod constants;
pub mod reference;
pub mod vocabulary;
