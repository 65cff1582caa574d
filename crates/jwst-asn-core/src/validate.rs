//! Structural validation of Level 2 association documents.
//!
//! The validator never stops at the first problem: every violation found in a
//! single pass is collected into a [`ValidationReport`] together with the
//! product/member index it was found at.
//!
//! ```
//! use jwst_asn_core::{validate_document, ViolationKind};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "products": [{
//!         "members": [
//!             {"expname": "a_rate.fits", "exptype": "SCIENCE"},
//!             {"expname": "b_rate.fits", "exptype": "SCIENCE"}
//!         ]
//!     }]
//! });
//!
//! let report = validate_document(&doc);
//! assert!(!report.is_valid());
//! assert_eq!(report.count(ViolationKind::InvariantViolation), 1);
//! assert_eq!(report.violations()[0].location.product, Some(0));
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::association::{Association, ExpType};
use crate::error::{AsnError, Result};

/// Optional top-level metadata keys that must be strings when present.
const METADATA_KEYS: &[&str] = &[
    "program",
    "asn_type",
    "asn_id",
    "asn_pool",
    "asn_rule",
    "version_id",
];

/// Class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Missing required key, wrong value type or enumeration value.
    SchemaViolation,
    /// A product does not hold exactly one SCIENCE member, or is empty.
    InvariantViolation,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::SchemaViolation => f.write_str("SchemaViolation"),
            ViolationKind::InvariantViolation => f.write_str("InvariantViolation"),
        }
    }
}

/// Where in a document a violation was found.
///
/// Both indices absent means the association itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub product: Option<usize>,
    pub member: Option<usize>,
}

impl Location {
    pub const ASSOCIATION: Location = Location {
        product: None,
        member: None,
    };

    pub fn product(product: usize) -> Self {
        Self {
            product: Some(product),
            member: None,
        }
    }

    pub fn member(product: usize, member: usize) -> Self {
        Self {
            product: Some(product),
            member: Some(member),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.product, self.member) {
            (None, _) => f.write_str("association"),
            (Some(p), None) => write!(f, "products[{}]", p),
            (Some(p), Some(m)) => write!(f, "products[{}].members[{}]", p, m),
        }
    }
}

/// A single violated invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub location: Location,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.message)
    }
}

/// Every violation found while validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of the given kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Violations found at the given product (including its members).
    pub fn at_product(&self, product: usize) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.location.product == Some(product))
    }

    /// Converts a failing report into [`AsnError::Invalid`].
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AsnError::Invalid(self))
        }
    }

    fn schema(&mut self, location: Location, message: impl Into<String>) {
        self.push(ViolationKind::SchemaViolation, location, message);
    }

    fn invariant(&mut self, location: Location, message: impl Into<String>) {
        self.push(ViolationKind::InvariantViolation, location, message);
    }

    fn push(&mut self, kind: ViolationKind, location: Location, message: impl Into<String>) {
        self.violations.push(Violation {
            kind,
            location,
            message: message.into(),
        });
    }

    // Shared by the raw and typed paths.
    fn check_product_members(&mut self, product: usize, member_count: usize, science: usize) {
        if member_count == 0 {
            self.invariant(Location::product(product), "product has no members");
        } else if science != 1 {
            self.invariant(
                Location::product(product),
                format!("product must have exactly one SCIENCE member, found {}", science),
            );
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return f.write_str("valid");
        }
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {}", violation)?;
        }
        Ok(())
    }
}

/// Validates a raw JSON association document.
pub fn validate_document(doc: &Value) -> ValidationReport {
    let mut report = ValidationReport::new();

    let Some(root) = doc.as_object() else {
        report.schema(Location::ASSOCIATION, "document must be a JSON object");
        return report;
    };

    check_metadata(root, &mut report);

    match root.get("products") {
        None => report.schema(Location::ASSOCIATION, "missing required key `products`"),
        Some(Value::Array(products)) => {
            if products.is_empty() {
                report.invariant(Location::ASSOCIATION, "association has no products");
            }
            for (index, product) in products.iter().enumerate() {
                check_product(index, product, &mut report);
            }
        }
        Some(_) => report.schema(Location::ASSOCIATION, "`products` must be an array"),
    }

    report
}

/// Validates a typed association.
///
/// Typing already guarantees key presence and the `exptype` enumeration, so
/// only empty filenames and the member invariants remain to check.
pub fn validate_association(asn: &Association) -> ValidationReport {
    let mut report = ValidationReport::new();

    if asn.products.is_empty() {
        report.invariant(Location::ASSOCIATION, "association has no products");
    }
    for (p, product) in asn.products.iter().enumerate() {
        for (m, member) in product.members.iter().enumerate() {
            if member.expname.trim().is_empty() {
                report.schema(Location::member(p, m), "`expname` must not be empty");
            }
        }
        report.check_product_members(p, product.members.len(), product.count(ExpType::Science));
    }

    report
}

fn check_metadata(root: &Map<String, Value>, report: &mut ValidationReport) {
    for key in METADATA_KEYS {
        if let Some(value) = root.get(*key) {
            if !value.is_string() {
                report.schema(Location::ASSOCIATION, format!("`{}` must be a string", key));
            }
        }
    }

    match root.get("constraints") {
        None | Some(Value::String(_)) => {}
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
        Some(_) => report.schema(
            Location::ASSOCIATION,
            "`constraints` must be a string or an array of strings",
        ),
    }
}

fn check_product(index: usize, product: &Value, report: &mut ValidationReport) {
    let location = Location::product(index);
    let Some(product) = product.as_object() else {
        report.schema(location, "product must be an object");
        return;
    };

    if let Some(name) = product.get("name") {
        if !name.is_string() {
            report.schema(location, "`name` must be a string");
        }
    }

    let members = match product.get("members") {
        None => {
            report.schema(location, "missing required key `members`");
            return;
        }
        Some(Value::Array(members)) => members,
        Some(_) => {
            report.schema(location, "`members` must be an array");
            return;
        }
    };

    let mut science = 0;
    for (m, member) in members.iter().enumerate() {
        if let Some(ExpType::Science) = check_member(index, m, member, report) {
            science += 1;
        }
    }
    report.check_product_members(index, members.len(), science);
}

// Returns the member's exposure type when it is valid.
fn check_member(
    product: usize,
    index: usize,
    member: &Value,
    report: &mut ValidationReport,
) -> Option<ExpType> {
    let location = Location::member(product, index);
    let Some(member) = member.as_object() else {
        report.schema(location, "member must be an object");
        return None;
    };

    match member.get("expname") {
        None => report.schema(location, "missing required key `expname`"),
        Some(Value::String(name)) if name.trim().is_empty() => {
            report.schema(location, "`expname` must not be empty")
        }
        Some(Value::String(_)) => {}
        Some(_) => report.schema(location, "`expname` must be a string"),
    }

    match member.get("exptype") {
        None => {
            report.schema(location, "missing required key `exptype`");
            None
        }
        Some(Value::String(raw)) => match raw.parse::<ExpType>() {
            Ok(exptype) => Some(exptype),
            Err(e) => {
                report.schema(location, e.to_string());
                None
            }
        },
        Some(_) => {
            report.schema(location, "`exptype` must be a string");
            None
        }
    }
}
