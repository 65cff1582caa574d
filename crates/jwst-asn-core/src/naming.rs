//! Product and association file naming.

use crate::association::Association;

/// Pipeline product suffixes stripped when deriving a product name.
pub const PRODUCT_SUFFIXES: &[&str] = &[
    "uncal",
    "rate",
    "rateints",
    "trapsfilled",
    "cal",
    "calints",
    "x1d",
    "x1dints",
    "s2d",
    "i2d",
    "bsub",
    "bsubints",
];

/// Derives a product name from an exposure filename.
///
/// Drops any directory and extension, then a trailing known pipeline suffix.
///
/// ```
/// use jwst_asn_core::product_name;
///
/// assert_eq!(product_name("test_lrs1_rate.fits"), "test_lrs1");
/// assert_eq!(product_name("data/jw00623032001_02101_00001_mirimage_cal.fits"),
///            "jw00623032001_02101_00001_mirimage");
/// assert_eq!(product_name("plain.fits"), "plain");
/// ```
pub fn product_name(expname: &str) -> String {
    let file = expname.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(expname);
    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };
    match stem.rsplit_once('_') {
        Some((root, suffix)) if !root.is_empty() && PRODUCT_SUFFIXES.contains(&suffix) => {
            root.to_string()
        }
        _ => stem.to_string(),
    }
}

/// Builds the output filename for an association.
///
/// Format: `jw{program}-{asn_id}_{asn_type}_{sequence}_asn.json`, with a
/// numeric program zero-padded to five digits and a five digit sequence.
///
/// ```
/// use jwst_asn_core::{association_filename, Association};
///
/// let mut asn = Association::new("spec2");
/// asn.program = Some("623".into());
/// asn.asn_id = Some("o032".into());
/// assert_eq!(association_filename(&asn, 1), "jw00623-o032_spec2_00001_asn.json");
/// ```
pub fn association_filename(asn: &Association, sequence: usize) -> String {
    let program = match asn.program.as_deref() {
        Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => format!("{:0>5}", p),
        Some(p) if !p.is_empty() => p.to_string(),
        _ => "00000".to_string(),
    };
    let asn_id = asn.asn_id.as_deref().unwrap_or("a0000");
    let asn_type = asn.asn_type.as_deref().unwrap_or("level2");
    format!(
        "jw{}-{}_{}_{:05}_asn.json",
        program,
        asn_id.to_lowercase(),
        asn_type.to_lowercase(),
        sequence
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_suffix_is_kept() {
        assert_eq!(product_name("target_nrs1.fits"), "target_nrs1");
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(product_name("exposure_rate"), "exposure");
    }

    #[test]
    fn test_bare_suffix_is_not_stripped_to_empty() {
        assert_eq!(product_name("_rate.fits"), "_rate");
    }

    #[test]
    fn test_filename_defaults() {
        let asn = Association::default();
        assert_eq!(association_filename(&asn, 7), "jw00000-a0000_level2_00007_asn.json");
    }

    #[test]
    fn test_program_spellings_share_prefix() {
        let mut short = Association::new("spec2");
        short.program = Some("623".into());
        short.asn_id = Some("o001".into());
        let mut padded = short.clone();
        padded.program = Some("00623".into());

        assert_eq!(association_filename(&short, 1), association_filename(&padded, 1));
        assert!(association_filename(&short, 1).starts_with("jw00623-"));
    }

    #[test]
    fn test_non_numeric_program_verbatim() {
        let mut asn = Association::new("image2");
        asn.program = Some("test".into());
        asn.asn_id = Some("A3001".into());
        assert_eq!(association_filename(&asn, 2), "jwtest-a3001_image2_00002_asn.json");
    }
}
