//! Exposure pool fixtures.

use jwst_asn_core::{AssociationPool, ExpType, PoolEntry};

/// Program used by every fixture unless stated otherwise.
pub const PROGRAM: &str = "00623";

pub fn science(filename: &str) -> PoolEntry {
    PoolEntry::new(filename, ExpType::Science, PROGRAM)
}

pub fn background(filename: &str) -> PoolEntry {
    PoolEntry::new(filename, ExpType::Background, PROGRAM)
}

pub fn imprint(filename: &str) -> PoolEntry {
    PoolEntry::new(filename, ExpType::Imprint, PROGRAM)
}

/// Builds a pool named `test_pool` from entries.
pub fn pool_of(entries: Vec<PoolEntry>) -> AssociationPool {
    AssociationPool::new("test_pool", entries).expect("fixture entries are valid")
}

pub fn empty_pool() -> AssociationPool {
    pool_of(Vec::new())
}

/// One SCIENCE exposure, no candidate.
pub fn lrs_single_pool() -> AssociationPool {
    pool_of(vec![science("test_lrs1_rate.fits")])
}

/// SCIENCE and BACKGROUND exposures sharing candidate `o001`.
pub fn lrs_background_pool() -> AssociationPool {
    pool_of(vec![
        science("test_lrs2_rate.fits")
            .with_candidate("o001")
            .with_exp_mode("MIR_LRS-FIXEDSLIT"),
        background("test_lrs2bkg_rate.fits")
            .with_candidate("o001")
            .with_exp_mode("MIR_LRS-FIXEDSLIT"),
    ])
}

/// NIRSpec MSA nods: two SCIENCE exposures plus an imprint in one candidate.
pub fn msa_nod_pool() -> AssociationPool {
    pool_of(vec![
        science("jw00623_nod1_rate.fits")
            .with_candidate("o002")
            .with_exp_mode("NRS_MSASPEC"),
        science("jw00623_nod2_rate.fits")
            .with_candidate("o002")
            .with_exp_mode("NRS_MSASPEC"),
        imprint("jw00623_imprint_rate.fits")
            .with_candidate("o002")
            .with_exp_mode("NRS_MSASPEC"),
    ])
}

/// Spectroscopy and imaging from two programs, one background orphaned in
/// its own candidate.
pub fn mixed_pool() -> AssociationPool {
    pool_of(vec![
        science("spec_a_rate.fits")
            .with_candidate("o001")
            .with_candidate("c1000")
            .with_exp_mode("NRS_FIXEDSLIT"),
        background("spec_a_bkg_rate.fits")
            .with_candidate("o001")
            .with_exp_mode("NRS_FIXEDSLIT"),
        science("img_a_rate.fits")
            .with_candidate("o003")
            .with_exp_mode("MIR_IMAGE"),
        background("orphan_bkg_rate.fits")
            .with_candidate("o004")
            .with_exp_mode("MIR_IMAGE"),
        PoolEntry::new("other_prog_rate.fits", ExpType::Science, "01234")
            .with_candidate("o001")
            .with_exp_mode("NRS_FIXEDSLIT"),
    ])
}
