//! End-to-end tests: pool files in, association files out.

use std::fs;

use jwst_asn::io::{read_association, read_document, write_association};
use jwst_asn::prelude::*;
use jwst_asn::{generate, generate_pool_file, write_report, LV2_IMAGE, LV2_SPEC};
use jwst_asn_test::documents::two_science_document;
use jwst_asn_test::pools::{lrs_background_pool, mixed_pool};

const POOL_TABLE: &str = "\
FILENAME|EXPTYPE|PROGRAM|ASN_CANDIDATE|EXP_TYPE
test_lrs2_rate.fits|SCIENCE|623|[('o001', 'observation')]|MIR_LRS-FIXEDSLIT
test_lrs2bkg_rate.fits|BACKGROUND|623|[('o001', 'observation')]|MIR_LRS-FIXEDSLIT
";

#[test]
fn test_pool_file_to_association_files() {
    let dir = tempfile::tempdir().unwrap();
    let pool_path = dir.path().join("jw00623_pool.csv");
    fs::write(&pool_path, POOL_TABLE).unwrap();

    let config = AsnConfig::new()
        .with_version_id("20261018t120000")
        .with_output_dir(dir.path().join("asn"));
    let registry = RuleRegistry::with_builtin();
    let (report, written) = generate_pool_file(&pool_path, &config, &registry).unwrap();

    assert!(report.is_clean());
    assert_eq!(written.len(), 1);
    let file_name = written[0].file_name().unwrap().to_str().unwrap();
    assert_eq!(file_name, "jw00623-o001_spec2_00001_asn.json");

    let asn = read_association(&written[0]).unwrap();
    assert_eq!(asn.asn_pool.as_deref(), Some("jw00623_pool"));
    assert_eq!(asn.version_id.as_deref(), Some("20261018t120000"));
    assert_eq!(asn.products[0].name.as_deref(), Some("test_lrs2"));
    assert_eq!(asn.products[0].members.len(), 2);

    let raw = read_document(&written[0]).unwrap();
    assert!(validate_document(&raw).is_valid());
}

#[test]
fn test_every_rule_writes_numbered_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = AsnConfig::new().with_output_dir(dir.path());
    let registry = RuleRegistry::with_builtin();

    let report = generate(&mixed_pool(), &config, &registry);
    let written = write_report(&report, &config.output).unwrap();

    assert_eq!(written.len(), 4);
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names[0].ends_with("_spec2_00001_asn.json"));
    assert!(names[3].ends_with("_image2_00004_asn.json"));
    assert!(names.iter().any(|n| n.starts_with("jw01234-")));
}

#[test]
fn test_config_selects_rules() {
    let registry = RuleRegistry::with_builtin();

    let image_only = AsnConfig::new().with_rule(LV2_IMAGE);
    let report = generate(&mixed_pool(), &image_only, &registry);
    assert_eq!(report.associations.len(), 1);

    let spec_only = AsnConfig::new().with_rule(LV2_SPEC).with_program("1234");
    let report = generate(&mixed_pool(), &spec_only, &registry);
    assert_eq!(report.associations.len(), 1);
    assert_eq!(report.associations[0].program.as_deref(), Some("01234"));
}

#[test]
fn test_empty_report_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = AsnConfig::new().with_output_dir(dir.path().join("never_created"));
    let registry = RuleRegistry::with_builtin();

    let report = generate(&AssociationPool::new("empty", Vec::new()).unwrap(), &config, &registry);
    let written = write_report(&report, &config.output).unwrap();
    assert!(written.is_empty());
    assert!(!config.output.dir.exists());
}

#[test]
fn test_edit_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let registry = RuleRegistry::with_builtin();
    let report = generate(&lrs_background_pool(), &AsnConfig::new(), &registry);
    let path = dir.path().join("asn.json");
    write_association(&path, &report.associations[0], true).unwrap();

    let mut asn = read_association(&path).unwrap();
    let before = asn.clone();
    let outcome = asn
        .add_member("test_lrs2", "test_lrs2imp_rate.fits", ExpType::Imprint)
        .unwrap();
    assert_eq!(outcome, EditOutcome::Added);
    write_association(&path, &asn, true).unwrap();

    let mut asn = read_association(&path).unwrap();
    assert_eq!(asn.member_count(), 3);
    let outcome = asn
        .remove_member("test_lrs2", "test_lrs2imp_rate.fits", ExpType::Imprint)
        .unwrap();
    assert_eq!(outcome, EditOutcome::Removed);
    assert_eq!(asn, before);
}

#[test]
fn test_invalid_document_on_disk_reports_product() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, two_science_document().to_string()).unwrap();

    let report = validate_document(&read_document(&path).unwrap());
    assert_eq!(report.len(), 1);
    assert_eq!(report.at_product(1).count(), 1);
}

#[test]
fn test_single_exposure_with_default_config() {
    let pool = AssociationPool::new(
        "pool",
        vec![PoolEntry::new("test_lrs1_rate.fits", ExpType::Science, "00623")],
    )
    .unwrap();
    let registry = RuleRegistry::with_builtin();

    let report = generate(&pool, &AsnConfig::default(), &registry);

    assert!(report.is_clean());
    assert_eq!(report.associations.len(), 1);
    let asn = &report.associations[0];
    assert_eq!(asn.asn_type.as_deref(), Some("spec2"));
    assert_eq!(asn.products.len(), 1);
    assert_eq!(asn.products[0].name.as_deref(), Some("test_lrs1"));
    assert_eq!(asn.products[0].members.len(), 1);
}

#[test]
fn test_modeless_pool_file_writes_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let pool_path = dir.path().join("pool.csv");
    fs::write(&pool_path, "FILENAME|EXPTYPE|PROGRAM\ntest_lrs1_rate.fits|SCIENCE|00623\n").unwrap();
    let config = AsnConfig::new().with_output_dir(dir.path().join("asn"));
    let registry = RuleRegistry::with_builtin();

    let (report, written) = generate_pool_file(&pool_path, &config, &registry).unwrap();

    assert!(report.is_clean());
    assert_eq!(written.len(), 1);
    let file_name = written[0].file_name().unwrap().to_str().unwrap();
    assert_eq!(file_name, "jw00623-a3001_spec2_00001_asn.json");
}
