//! Shared test fixtures for the association crates.
//!
//! This crate provides pools and documents for testing. It depends only on
//! `jwst-asn-core` so every other crate can take it as a dev-dependency.
//!
//! - [`pools`] - exposure pools, from a single exposure up to mixed programs
//! - [`documents`] - raw JSON association documents, valid and broken
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! jwst-asn-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use jwst_asn_test::pools::{lrs_background_pool, science};
//! use jwst_asn_test::documents::two_science_document;
//! ```

pub mod documents;
pub mod pools;

pub use pools::{background, imprint, pool_of, science};
