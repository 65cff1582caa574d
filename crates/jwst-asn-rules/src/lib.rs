//! Association rules and the Level 2 association builder
//!
//! This crate provides:
//! - Constraint predicates evaluated against pool entries
//! - Named rules (`Asn_Lv2Spec`, `Asn_Lv2Image`) pairing a predicate set
//!   with a product constructor
//! - A rule registry, optionally installed process-wide at startup
//! - The builder that groups a pool into associations
//!
//! # Example
//!
//! ```
//! use jwst_asn_core::{AssociationPool, ExpType, PoolEntry};
//! use jwst_asn_rules::{AssociationBuilder, RuleRegistry, LV2_SPEC};
//!
//! let pool = AssociationPool::new("pool", vec![
//!     PoolEntry::new("test_lrs1_rate.fits", ExpType::Science, "00623"),
//! ]).unwrap();
//!
//! let registry = RuleRegistry::with_builtin();
//! let report = AssociationBuilder::new(&registry).build(&pool, LV2_SPEC).unwrap();
//!
//! assert_eq!(report.associations.len(), 1);
//! assert_eq!(report.associations[0].products[0].name.as_deref(), Some("test_lrs1"));
//! ```

pub mod builder;
pub mod constraint;
pub mod registry;
pub mod rule;

#[cfg(test)]
mod builder_tests;

pub use builder::{group_by_candidate, AssociationBuilder, BuildFailure, CandidateGroup, GenerateReport};
pub use constraint::Constraint;
pub use registry::{global, install, RuleRegistry};
pub use rule::{asn_lv2_image, asn_lv2_spec, level2_products, ProductConstructor, Rule, LV2_IMAGE, LV2_SPEC};
