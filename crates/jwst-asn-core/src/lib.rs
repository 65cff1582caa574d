//! JWST association core - types and checks for Level 2 associations
//!
//! This crate provides the fundamental pieces every other crate builds on:
//! - Association document types (`Association`, `Product`, `Member`)
//! - The exposure pool the builder reads from
//! - Structural validation of association documents
//! - Idempotent member editing on loaded associations

pub mod association;
pub mod edit;
pub mod error;
pub mod naming;
pub mod pool;
pub mod validate;


pub use association::{Association, ExpType, Member, ParseExpTypeError, Product};
pub use edit::{EditOutcome, ProductSelector};
pub use error::{AsnError, Result};
pub use naming::{association_filename, product_name};
pub use pool::{AssociationPool, PoolEntry};
pub use validate::{
    validate_association, validate_document, Location, ValidationReport, Violation, ViolationKind,
};
