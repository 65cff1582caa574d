//! Command handlers.

use std::io::Write;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use tracing::warn;

use jwst_asn::io::{read_association, read_document, write_association};
use jwst_asn::{
    generate as generate_report, validate_document, write_report, AsnConfig, AssociationPool,
    EditOutcome, ExpType, Result, RuleRegistry,
};

use crate::MemberArgs;

/// Configuration file picked up from the working directory when none is given.
const DEFAULT_CONFIG: &str = "asn.toml";

pub(crate) struct GenerateOptions {
    pub pool: PathBuf,
    pub rules: Vec<String>,
    pub config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub version_id: Option<String>,
    pub program: Option<String>,
    pub dry_run: bool,
}

impl GenerateOptions {
    // Command-line values override the configuration file.
    fn resolve_config(&self) -> Result<AsnConfig> {
        let mut config = match &self.config {
            Some(path) => AsnConfig::load(path)?,
            None => AsnConfig::load(DEFAULT_CONFIG).unwrap_or_default(),
        };
        if !self.rules.is_empty() {
            config.rules = self.rules.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(version_id) = &self.version_id {
            config.version_id = Some(version_id.clone());
        }
        if let Some(program) = &self.program {
            config.program = Some(program.clone());
        }
        Ok(config)
    }
}

pub(crate) fn generate(
    options: GenerateOptions,
    registry: &RuleRegistry,
    out: &mut impl Write,
) -> Result<bool> {
    let config = options.resolve_config()?;
    let pool = AssociationPool::load(&options.pool)?;
    let report = generate_report(&pool, &config, registry);

    for failure in &report.failures {
        warn!(
            rule = %failure.rule,
            asn_id = failure.asn_id.as_deref().unwrap_or("-"),
            error = %failure.error,
            "association rejected"
        );
    }

    if options.dry_run {
        for asn in &report.associations {
            writeln!(out, "{}", asn.to_json_pretty()?)?;
        }
    } else {
        for path in write_report(&report, &config.output)? {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(report.is_clean())
}

pub(crate) fn validate(files: &[PathBuf], out: &mut impl Write) -> Result<bool> {
    let mut all_valid = true;
    for path in files {
        let document = match read_document(path) {
            Ok(document) => document,
            Err(err) => {
                all_valid = false;
                writeln!(out, "{}: {} {}", path.display(), "FAIL".bright_red().bold(), err)?;
                continue;
            }
        };

        let report = validate_document(&document);
        if report.is_valid() {
            writeln!(out, "{}: {}", path.display(), "OK".bright_green().bold())?;
            continue;
        }

        all_valid = false;
        writeln!(
            out,
            "{}: {} {} violation(s)",
            path.display(),
            "FAIL".bright_red().bold(),
            report.len()
        )?;
        for violation in report.violations() {
            writeln!(out, "  {}", violation)?;
        }
    }
    Ok(all_valid)
}

pub(crate) fn add_member(file: &Path, member: MemberArgs, out: &mut impl Write) -> Result<bool> {
    let mut asn = read_association(file)?;
    let outcome = asn.add_member(member.product, &member.expname, member.exptype)?;
    finish_edit(file, &asn, outcome, &member.expname, out)
}

pub(crate) fn remove_member(file: &Path, member: MemberArgs, out: &mut impl Write) -> Result<bool> {
    let mut asn = read_association(file)?;
    let outcome = asn.remove_member(member.product, &member.expname, member.exptype)?;
    finish_edit(file, &asn, outcome, &member.expname, out)
}

// Unchanged documents are left alone on disk.
fn finish_edit(
    file: &Path,
    asn: &jwst_asn::Association,
    outcome: EditOutcome,
    expname: &str,
    out: &mut impl Write,
) -> Result<bool> {
    if outcome.changed() {
        write_association(file, asn, true)?;
    }
    writeln!(out, "{}: {}", expname, outcome)?;
    Ok(true)
}

pub(crate) fn members(file: &Path, exptype: Option<ExpType>, out: &mut impl Write) -> Result<bool> {
    let asn = read_association(file)?;
    for name in asn.member_filenames(exptype) {
        writeln!(out, "{}", name)?;
    }
    Ok(true)
}

pub(crate) fn rules(registry: &RuleRegistry, out: &mut impl Write) -> Result<bool> {
    for rule in registry.iter() {
        writeln!(out, "{} ({})", rule.name.bold(), rule.asn_type)?;
        for constraint in rule.describe() {
            writeln!(out, "  {}", constraint)?;
        }
    }
    Ok(true)
}
