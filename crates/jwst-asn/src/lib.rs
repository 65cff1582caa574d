//! JWST Level 2 association builder, validator and member editor.
//!
//! Builds `spec2` and `image2` associations from an exposure pool, checks
//! association documents against their schema and invariants, and edits
//! product members in place.
//!
//! # Example
//!
//! ```
//! use jwst_asn::prelude::*;
//!
//! let pool = AssociationPool::new(
//!     "pool",
//!     vec![PoolEntry::new("test_lrs1_rate.fits", ExpType::Science, "00623")],
//! ).unwrap();
//! let registry = RuleRegistry::with_builtin();
//! let report = jwst_asn::generate(&pool, &AsnConfig::default(), &registry);
//!
//! assert_eq!(report.associations.len(), 1);
//! assert_eq!(report.associations[0].products[0].name.as_deref(), Some("test_lrs1"));
//! ```

// Data model, validation and editing
pub use jwst_asn_core::{
    association_filename, product_name, validate_association, validate_document, AsnError,
    Association, AssociationPool, EditOutcome, ExpType, Location, Member, ParseExpTypeError,
    PoolEntry, Product, ProductSelector, ValidationReport, Violation, ViolationKind,
};

// Rules and the builder
pub use jwst_asn_rules::{
    asn_lv2_image, asn_lv2_spec, global, install, level2_products, AssociationBuilder,
    BuildFailure, CandidateGroup, Constraint, GenerateReport, ProductConstructor, Rule,
    RuleRegistry, LV2_IMAGE, LV2_SPEC,
};

// Configuration
pub use jwst_asn_config::{AsnConfig, ConfigError, OutputConfig};

/// Console output, enabled with the `console` feature.
#[cfg(feature = "console")]
pub use jwst_asn_console as console;

mod error;
pub mod io;
mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{generate, generate_pool_file, write_report};

pub mod prelude {
    pub use super::{
        AsnConfig, Association, AssociationBuilder, AssociationPool, EditOutcome, ExpType, Member,
        PoolEntry, Product, RuleRegistry,
    };
    pub use super::{validate_association, validate_document};
}
