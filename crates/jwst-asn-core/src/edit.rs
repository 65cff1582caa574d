//! Idempotent member editing on loaded associations.
//!
//! Members are keyed by `(expname, exptype)`. Adding a present key and
//! removing an absent key are reported through [`EditOutcome`] rather than
//! failing. Edits that would break the one-SCIENCE-member invariant fail and
//! leave the product untouched.
//!
//! ```
//! use jwst_asn_core::{Association, EditOutcome, ExpType, Product};
//!
//! let mut asn = Association::new("spec2");
//! asn.products.push(Product::for_science("test_lrs2_rate.fits"));
//!
//! let added = asn.add_member(0usize, "test_lrs2bkg_rate.fits", ExpType::Background).unwrap();
//! assert_eq!(added, EditOutcome::Added);
//!
//! let again = asn.add_member("test_lrs2", "test_lrs2bkg_rate.fits", ExpType::Background).unwrap();
//! assert_eq!(again, EditOutcome::AlreadyPresent);
//! assert_eq!(asn.products[0].members.len(), 2);
//! ```

use std::fmt;

use tracing::debug;

use crate::association::{Association, ExpType, Member};
use crate::error::{AsnError, Result};
use crate::validate::Location;

/// Identifies a product by position or by (resolved) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelector {
    Index(usize),
    Name(String),
}

impl From<usize> for ProductSelector {
    fn from(index: usize) -> Self {
        ProductSelector::Index(index)
    }
}

impl From<&str> for ProductSelector {
    fn from(name: &str) -> Self {
        ProductSelector::Name(name.to_string())
    }
}

impl From<String> for ProductSelector {
    fn from(name: String) -> Self {
        ProductSelector::Name(name)
    }
}

impl fmt::Display for ProductSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSelector::Index(i) => write!(f, "#{}", i),
            ProductSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Result of a member edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The member was appended.
    Added,
    /// The key was already present; nothing changed.
    AlreadyPresent,
    /// The first matching member was removed.
    Removed,
    /// No member had the key; nothing changed.
    Absent,
}

impl EditOutcome {
    /// Returns true if the member list changed.
    pub fn changed(self) -> bool {
        matches!(self, EditOutcome::Added | EditOutcome::Removed)
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EditOutcome::Added => "added",
            EditOutcome::AlreadyPresent => "already present",
            EditOutcome::Removed => "removed",
            EditOutcome::Absent => "absent",
        };
        f.write_str(text)
    }
}

impl Association {
    /// Resolves a selector to a product index.
    ///
    /// Names match the explicit product name or, when a product has none,
    /// the name derived from its SCIENCE member. The first match wins.
    pub fn product_index(&self, selector: &ProductSelector) -> Result<usize> {
        match selector {
            ProductSelector::Index(i) if *i < self.products.len() => Ok(*i),
            ProductSelector::Index(_) => Err(AsnError::UnknownProduct(selector.to_string())),
            ProductSelector::Name(name) => self
                .products
                .iter()
                .position(|p| p.resolved_name().as_deref() == Some(name.as_str()))
                .ok_or_else(|| AsnError::UnknownProduct(selector.to_string())),
        }
    }

    /// Appends a member unless the `(expname, exptype)` key is present.
    ///
    /// # Errors
    ///
    /// - `UnknownProduct` if the selector matches nothing
    /// - `SchemaViolation` if `expname` is empty
    /// - `InvariantViolation` if adding a second SCIENCE member
    pub fn add_member(
        &mut self,
        product: impl Into<ProductSelector>,
        expname: &str,
        exptype: ExpType,
    ) -> Result<EditOutcome> {
        let index = self.product_index(&product.into())?;
        let product = &mut self.products[index];

        if expname.trim().is_empty() {
            return Err(AsnError::schema(
                Location::product(index),
                "`expname` must not be empty",
            ));
        }
        if product.contains(expname, exptype) {
            debug!(product = index, expname, %exptype, "member already present");
            return Ok(EditOutcome::AlreadyPresent);
        }
        if exptype.is_science() && product.count(ExpType::Science) > 0 {
            return Err(AsnError::invariant(
                Location::product(index),
                format!("cannot add SCIENCE member '{}': product already has one", expname),
            ));
        }

        product.members.push(Member::new(expname, exptype));
        debug!(product = index, expname, %exptype, "member added");
        Ok(EditOutcome::Added)
    }

    /// Removes the first member with the `(expname, exptype)` key.
    ///
    /// # Errors
    ///
    /// - `UnknownProduct` if the selector matches nothing
    /// - `InvariantViolation` if removing the only SCIENCE member
    pub fn remove_member(
        &mut self,
        product: impl Into<ProductSelector>,
        expname: &str,
        exptype: ExpType,
    ) -> Result<EditOutcome> {
        let index = self.product_index(&product.into())?;
        let product = &mut self.products[index];

        let Some(position) = product
            .members
            .iter()
            .position(|m| m.matches(expname, exptype))
        else {
            debug!(product = index, expname, %exptype, "member absent");
            return Ok(EditOutcome::Absent);
        };
        if exptype.is_science() && product.count(ExpType::Science) == 1 {
            return Err(AsnError::invariant(
                Location::product(index),
                format!("cannot remove '{}': it is the only SCIENCE member", expname),
            ));
        }

        product.members.remove(position);
        debug!(product = index, expname, %exptype, "member removed");
        Ok(EditOutcome::Removed)
    }
}
