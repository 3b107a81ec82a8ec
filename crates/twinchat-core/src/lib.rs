//! twinchat-core
//!
//! Shared configuration, error taxonomy, domain types and the capability
//! traits (`Embedder`, `Generator`) that the retrieval and chat crates plug
//! into.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
