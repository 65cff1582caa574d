//! Named association rules.
//!
//! A rule is plain data: a predicate set deciding which pool entries are
//! eligible, and a constructor turning one candidate group into products.

use std::fmt;

use jwst_asn_core::{ExpType, Member, Product};

use crate::builder::CandidateGroup;
use crate::constraint::Constraint;

/// Level 2 spectroscopic rule name.
pub const LV2_SPEC: &str = "Asn_Lv2Spec";

/// Level 2 imaging rule name.
pub const LV2_IMAGE: &str = "Asn_Lv2Image";

const SPEC_MODES: &[&str] = &[
    "MIR_LRS-FIXEDSLIT",
    "MIR_LRS-SLITLESS",
    "MIR_MRS",
    "NRS_FIXEDSLIT",
    "NRS_IFU",
    "NRS_MSASPEC",
    "NRS_BRIGHTOBJ",
    "NIS_SOSS",
    "NIS_WFSS",
    "NRC_WFSS",
    "NRC_TSGRISM",
];

const IMAGE_MODES: &[&str] = &["MIR_IMAGE", "NRC_IMAGE", "NIS_IMAGE", "FGS_IMAGE", "NRC_TSIMAGE"];

/// Turns one candidate group into products.
pub type ProductConstructor = fn(&Rule, &CandidateGroup<'_>) -> Vec<Product>;

/// A named predicate set plus product constructor.
#[derive(Clone)]
pub struct Rule {
    /// Registry key, e.g. `Asn_Lv2Spec`.
    pub name: String,
    /// `asn_type` written into every association the rule builds.
    pub asn_type: String,
    /// Predicates every eligible pool entry must satisfy.
    pub constraints: Vec<Constraint>,
    /// Builds products for one candidate group.
    pub construct: ProductConstructor,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        asn_type: impl Into<String>,
        construct: ProductConstructor,
    ) -> Self {
        Self {
            name: name.into(),
            asn_type: asn_type.into(),
            constraints: Vec::new(),
            construct,
        }
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Roles the rule admits; all roles when unconstrained.
    pub fn member_types(&self) -> Vec<ExpType> {
        self.constraints
            .iter()
            .find_map(|c| match c {
                Constraint::ExpTypeIn(types) => Some(types.clone()),
                _ => None,
            })
            .unwrap_or_else(|| ExpType::ALL.to_vec())
    }

    /// Human-readable rendering of the predicate set.
    pub fn describe(&self) -> Vec<String> {
        self.constraints.iter().map(|c| c.to_string()).collect()
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("asn_type", &self.asn_type)
            .field("constraints", &self.constraints)
            .finish()
    }
}

/// One product per SCIENCE entry, each followed by every BACKGROUND and
/// IMPRINT entry of the group in pool order.
pub fn level2_products(rule: &Rule, group: &CandidateGroup<'_>) -> Vec<Product> {
    let admitted = rule.member_types();
    let extras: Vec<Member> = group
        .entries
        .iter()
        .filter(|e| !e.exptype.is_science() && admitted.contains(&e.exptype))
        .map(|e| Member::new(e.filename.clone(), e.exptype))
        .collect();

    group
        .entries
        .iter()
        .filter(|e| e.exptype.is_science())
        .map(|science| {
            extras
                .iter()
                .filter(|m| m.expname != science.filename)
                .cloned()
                .fold(Product::for_science(science.filename.clone()), Product::with_member)
        })
        .collect()
}

/// `Asn_Lv2Spec`: spectroscopic science with backgrounds and imprints.
pub fn asn_lv2_spec() -> Rule {
    Rule::new(LV2_SPEC, "spec2", level2_products)
        .with_constraint(Constraint::ExpTypeIn(vec![
            ExpType::Science,
            ExpType::Background,
            ExpType::Imprint,
        ]))
        .with_constraint(Constraint::ExpModeIn(
            SPEC_MODES.iter().map(|m| m.to_string()).collect(),
        ))
}

/// `Asn_Lv2Image`: imaging science with backgrounds.
///
/// Only entries that carry an imaging mode qualify; entries without a mode
/// are left to `Asn_Lv2Spec`.
pub fn asn_lv2_image() -> Rule {
    Rule::new(LV2_IMAGE, "image2", level2_products)
        .with_constraint(Constraint::ExpTypeIn(vec![
            ExpType::Science,
            ExpType::Background,
        ]))
        .with_constraint(Constraint::ExpModeIn(
            IMAGE_MODES.iter().map(|m| m.to_string()).collect(),
        ))
        .with_constraint(Constraint::ExpModeSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jwst_asn_core::PoolEntry;

    #[test]
    fn test_describe() {
        let rule = asn_lv2_image();
        let described = rule.describe();
        assert_eq!(described[0], "exptype in [SCIENCE, BACKGROUND]");
        assert!(described[1].starts_with("exp_type in [MIR_IMAGE"));
        assert_eq!(described[2], "exp_type is set");
    }

    #[test]
    fn test_modeless_entry_is_spectroscopic_only() {
        let entry = PoolEntry::new("test_lrs1_rate.fits", ExpType::Science, "00623");
        let eligible = |rule: &Rule| rule.constraints.iter().all(|c| c.matches(&entry));

        assert!(eligible(&asn_lv2_spec()));
        assert!(!eligible(&asn_lv2_image()));
    }

    #[test]
    fn test_member_types_default_to_all() {
        let rule = Rule::new("Custom", "spec2", level2_products);
        assert_eq!(rule.member_types(), ExpType::ALL.to_vec());
    }

    #[test]
    fn test_level2_products_one_per_science() {
        let entries = [
            PoolEntry::new("sci1_rate.fits", ExpType::Science, "1"),
            PoolEntry::new("bkg_rate.fits", ExpType::Background, "1"),
            PoolEntry::new("sci2_rate.fits", ExpType::Science, "1"),
            PoolEntry::new("imp_rate.fits", ExpType::Imprint, "1"),
        ];
        let group = CandidateGroup {
            program: "1",
            candidate: Some("o001"),
            entries: entries.iter().collect(),
        };

        let products = level2_products(&asn_lv2_spec(), &group);
        assert_eq!(products.len(), 2);
        for product in &products {
            assert_eq!(product.members.len(), 3);
            assert_eq!(product.count(ExpType::Science), 1);
            assert!(product.members[0].exptype.is_science());
        }
        assert_eq!(products[1].name.as_deref(), Some("sci2"));

        // Imaging does not admit imprints.
        let products = level2_products(&asn_lv2_image(), &group);
        assert!(products.iter().all(|p| p.count(ExpType::Imprint) == 0));
    }
}
