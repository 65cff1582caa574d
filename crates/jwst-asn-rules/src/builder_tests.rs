//! Tests for the association builder.

use jwst_asn_core::{validate_association, AsnError, ExpType, Member, PoolEntry, Product};
use jwst_asn_test::pools::{
    empty_pool, lrs_background_pool, lrs_single_pool, mixed_pool, msa_nod_pool, pool_of, science,
};

use super::*;

fn builtin() -> RuleRegistry {
    RuleRegistry::with_builtin()
}

#[test]
fn test_empty_pool_yields_nothing() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry).generate(&empty_pool(), &[] as &[&str]);
    assert!(report.associations.is_empty());
    assert!(report.is_clean());
}

#[test]
fn test_single_science_exposure() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry)
        .build(&lrs_single_pool(), LV2_SPEC)
        .unwrap();

    assert_eq!(report.associations.len(), 1);
    let asn = &report.associations[0];
    assert_eq!(asn.asn_type.as_deref(), Some("spec2"));
    assert_eq!(asn.asn_rule.as_deref(), Some(LV2_SPEC));
    assert_eq!(asn.asn_pool.as_deref(), Some("test_pool"));
    assert_eq!(asn.asn_id.as_deref(), Some("a3001"));
    assert_eq!(asn.products.len(), 1);
    assert_eq!(asn.products[0].name.as_deref(), Some("test_lrs1"));
    assert_eq!(
        asn.products[0].members,
        vec![Member::science("test_lrs1_rate.fits")]
    );
}

#[test]
fn test_background_joins_science_product() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry)
        .build(&lrs_background_pool(), LV2_SPEC)
        .unwrap();

    assert_eq!(report.associations.len(), 1);
    let asn = &report.associations[0];
    assert_eq!(asn.asn_id.as_deref(), Some("o001"));
    assert_eq!(asn.products.len(), 1);

    let product = &asn.products[0];
    assert_eq!(product.members.len(), 2);
    assert_eq!(product.count(ExpType::Science), 1);
    assert!(product.contains("test_lrs2bkg_rate.fits", ExpType::Background));
}

#[test]
fn test_each_science_exposure_gets_a_product() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry)
        .build(&msa_nod_pool(), LV2_SPEC)
        .unwrap();

    assert_eq!(report.associations.len(), 1);
    let products = &report.associations[0].products;
    assert_eq!(products.len(), 2);
    for product in products {
        assert_eq!(product.members.len(), 2);
        assert_eq!(product.count(ExpType::Science), 1);
        assert_eq!(product.count(ExpType::Imprint), 1);
    }
    assert_eq!(products[0].name.as_deref(), Some("jw00623_nod1"));
    assert_eq!(products[1].name.as_deref(), Some("jw00623_nod2"));
}

#[test]
fn test_generate_runs_every_rule() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry).generate(&mixed_pool(), &[] as &[&str]);

    assert!(report.is_clean());
    let spec: Vec<_> = report
        .associations
        .iter()
        .filter(|a| a.asn_rule.as_deref() == Some(LV2_SPEC))
        .collect();
    let image: Vec<_> = report
        .associations
        .iter()
        .filter(|a| a.asn_rule.as_deref() == Some(LV2_IMAGE))
        .collect();

    // (00623, o001), (00623, c1000), (01234, o001)
    assert_eq!(spec.len(), 3);
    assert_eq!(spec[0].member_count(), 2);
    assert_eq!(spec[1].asn_id.as_deref(), Some("c1000"));
    assert_eq!(spec[2].program.as_deref(), Some("01234"));

    // The orphaned background in o004 produces nothing.
    assert_eq!(image.len(), 1);
    assert_eq!(image[0].asn_type.as_deref(), Some("image2"));
    assert_eq!(image[0].asn_id.as_deref(), Some("o003"));

    for asn in &report.associations {
        assert!(validate_association(asn).is_valid());
        for product in &asn.products {
            assert_eq!(product.count(ExpType::Science), 1);
        }
    }
}

#[test]
fn test_program_filter() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry)
        .with_program("623")
        .generate(&mixed_pool(), &[LV2_SPEC]);

    assert_eq!(report.associations.len(), 2);
    assert!(report
        .associations
        .iter()
        .all(|a| a.program.as_deref() == Some("00623")));
    assert!(report.associations[0]
        .constraints
        .contains(&"program == 623".to_string()));
}

#[test]
fn test_unknown_rule_does_not_stop_other_rules() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry)
        .generate(&lrs_single_pool(), &["Asn_Lv9Nothing", LV2_SPEC]);

    assert_eq!(report.associations.len(), 1);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.rule, "Asn_Lv9Nothing");
    assert!(failure.asn_id.is_none());
    assert!(matches!(failure.error, AsnError::UnknownRule(_)));
}

#[test]
fn test_build_unknown_rule_is_error() {
    let registry = builtin();
    let result = AssociationBuilder::new(&registry).build(&lrs_single_pool(), "Asn_Lv3Image");
    assert!(matches!(result, Err(AsnError::UnknownRule(_))));
}

// Puts every SCIENCE exposure of a group into one product.
fn merge_science(_rule: &Rule, group: &CandidateGroup<'_>) -> Vec<Product> {
    let members: Vec<Member> = group
        .entries
        .iter()
        .map(|e| Member::new(e.filename.clone(), e.exptype))
        .collect();
    vec![Product {
        name: Some("merged".into()),
        members,
    }]
}

#[test]
fn test_invalid_association_is_rejected_not_emitted() {
    let mut registry = builtin();
    registry.register(Rule::new("Asn_Merge", "spec2", merge_science));

    let pool = pool_of(vec![
        science("one_rate.fits").with_candidate("o001"),
        science("two_rate.fits").with_candidate("o001"),
        science("three_rate.fits").with_candidate("o002"),
    ]);
    let report = AssociationBuilder::new(&registry)
        .build(&pool, "Asn_Merge")
        .unwrap();

    // o001 has two SCIENCE members in one product; o002 is fine.
    assert_eq!(report.associations.len(), 1);
    assert_eq!(report.associations[0].asn_id.as_deref(), Some("o002"));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].asn_id.as_deref(), Some("o001"));
    match &report.failures[0].error {
        AsnError::Invalid(violations) => assert_eq!(violations.len(), 1),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_metadata() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry)
        .with_version_id("20261018t120000")
        .build(&lrs_background_pool(), LV2_SPEC)
        .unwrap();
    let asn = &report.associations[0];

    assert_eq!(asn.version_id.as_deref(), Some("20261018t120000"));
    assert_eq!(asn.program.as_deref(), Some("00623"));
    assert!(asn.constraints.contains(&"asn_candidate == o001".to_string()));
    assert!(asn.constraints.contains(&"program == 00623".to_string()));
    assert!(asn.constraints[0].starts_with("exptype in"));
}

#[test]
fn test_implicit_groups_are_numbered_per_program() {
    let registry = builtin();
    let pool = pool_of(vec![
        science("a_rate.fits"),
        PoolEntry::new("b_rate.fits", ExpType::Science, "00042"),
    ]);
    let report = AssociationBuilder::new(&registry)
        .build(&pool, LV2_SPEC)
        .unwrap();

    let ids: Vec<_> = report
        .associations
        .iter()
        .map(|a| a.asn_id.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(ids, vec!["a3001", "a3002"]);
}

#[test]
fn test_entry_with_two_candidates_joins_both_groups() {
    let pool = mixed_pool();
    let entries: Vec<_> = pool.iter().collect();
    let groups = group_by_candidate(&entries);

    let spec_a_groups = groups
        .iter()
        .filter(|g| g.entries.iter().any(|e| e.filename == "spec_a_rate.fits"))
        .count();
    assert_eq!(spec_a_groups, 2);

    // Same candidate id in a different program is a different group.
    let o001: Vec<_> = groups.iter().filter(|g| g.candidate == Some("o001")).collect();
    assert_eq!(o001.len(), 2);
}

#[test]
fn test_program_spellings_share_a_group() {
    let registry = builtin();
    let pool = pool_of(vec![
        PoolEntry::new("test_lrs2_rate.fits", ExpType::Science, "623")
            .with_candidate("o001")
            .with_exp_mode("MIR_LRS-FIXEDSLIT"),
        PoolEntry::new("test_lrs2bkg_rate.fits", ExpType::Background, "00623")
            .with_candidate("o001")
            .with_exp_mode("MIR_LRS-FIXEDSLIT"),
    ]);
    let report = AssociationBuilder::new(&registry)
        .build(&pool, LV2_SPEC)
        .unwrap();

    assert_eq!(report.associations.len(), 1);
    let asn = &report.associations[0];
    assert_eq!(asn.program.as_deref(), Some("623"));
    assert_eq!(asn.products[0].members.len(), 2);
    assert!(asn.products[0].contains("test_lrs2bkg_rate.fits", ExpType::Background));
    assert_eq!(
        jwst_asn_core::association_filename(asn, 1),
        "jw00623-o001_spec2_00001_asn.json"
    );
}

#[test]
fn test_single_exposure_through_every_rule() {
    let registry = builtin();
    let report = AssociationBuilder::new(&registry).generate(&lrs_single_pool(), &[] as &[&str]);

    assert!(report.is_clean());
    assert_eq!(report.associations.len(), 1);
    assert_eq!(report.associations[0].asn_rule.as_deref(), Some(LV2_SPEC));
}
