//! End-to-end generation: pool in, association files out.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use jwst_asn_config::{AsnConfig, OutputConfig};
use jwst_asn_core::{association_filename, AssociationPool};
use jwst_asn_rules::{AssociationBuilder, GenerateReport, RuleRegistry};

use crate::{io, Result};

/// Runs the configured rules against a pool.
///
/// Nothing is written; see [`write_report`].
pub fn generate(pool: &AssociationPool, config: &AsnConfig, registry: &RuleRegistry) -> GenerateReport {
    let mut builder = AssociationBuilder::new(registry);
    if let Some(version_id) = &config.version_id {
        builder = builder.with_version_id(version_id.clone());
    }
    if let Some(program) = &config.program {
        builder = builder.with_program(program.clone());
    }
    builder.generate(pool, &config.rules)
}

/// Writes every association of a report into the output directory.
///
/// Files are numbered from 1 in report order. Returns the paths written.
pub fn write_report(report: &GenerateReport, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    if report.associations.is_empty() {
        return Ok(Vec::new());
    }
    fs::create_dir_all(&output.dir)?;

    let mut written = Vec::with_capacity(report.associations.len());
    for (index, asn) in report.associations.iter().enumerate() {
        let path = output.dir.join(association_filename(asn, index + 1));
        io::write_association(&path, asn, output.pretty)?;
        written.push(path);
    }
    Ok(written)
}

/// Loads a pool file, generates associations and writes them out.
///
/// Associations rejected by validation are reported but never written.
pub fn generate_pool_file(
    pool_path: impl AsRef<Path>,
    config: &AsnConfig,
    registry: &RuleRegistry,
) -> Result<(GenerateReport, Vec<PathBuf>)> {
    let pool = AssociationPool::load(pool_path)?;
    let report = generate(&pool, config, registry);
    let written = write_report(&report, &config.output)?;

    info!(
        pool = %pool.name(),
        files = written.len() as u64,
        dir = %config.output.dir.display(),
        "generation finished"
    );
    Ok((report, written))
}
