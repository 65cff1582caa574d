//! Association builder.
//!
//! Evaluates registered rules against a pool: eligible entries are grouped by
//! `(program, candidate)`, each group is handed to the rule's constructor, and
//! every resulting association is validated before it is emitted. A failure
//! aborts only the association (or rule) it belongs to.

use std::collections::HashMap;

use jwst_asn_core::{validate_association, AsnError, Association, AssociationPool, PoolEntry, Result};
use tracing::{debug, info, warn};

use crate::constraint::{program_key, Constraint};
use crate::registry::RuleRegistry;

/// First sequence number for associations built from entries that list no
/// candidate.
const IMPLICIT_ASN_ID_BASE: usize = 3001;

/// Eligible pool entries sharing a program and association candidate.
#[derive(Debug, Clone)]
pub struct CandidateGroup<'a> {
    pub program: &'a str,
    /// `None` for entries that list no candidate.
    pub candidate: Option<&'a str>,
    /// Members of the group in pool order.
    pub entries: Vec<&'a PoolEntry>,
}

/// An association or rule that could not be built.
#[derive(Debug)]
pub struct BuildFailure {
    pub rule: String,
    /// Set when a single association failed; `None` when the whole rule did.
    pub asn_id: Option<String>,
    pub error: AsnError,
}

/// Associations built from one pool, plus every failure encountered.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub associations: Vec<Association>,
    pub failures: Vec<BuildFailure>,
}

impl GenerateReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: GenerateReport) {
        self.associations.extend(other.associations);
        self.failures.extend(other.failures);
    }
}

/// Builds associations from a pool using rules from a registry.
#[derive(Debug, Clone)]
pub struct AssociationBuilder<'r> {
    registry: &'r RuleRegistry,
    version_id: Option<String>,
    program: Option<String>,
}

impl<'r> AssociationBuilder<'r> {
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self {
            registry,
            version_id: None,
            program: None,
        }
    }

    /// Sets the `version_id` written into every association.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Restricts every rule to a single program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Runs several rules against one pool.
    ///
    /// An empty `rule_names` runs every registered rule. An unknown rule is
    /// recorded as a failure and the remaining rules still run.
    pub fn generate<S: AsRef<str>>(&self, pool: &AssociationPool, rule_names: &[S]) -> GenerateReport {
        let names: Vec<&str> = if rule_names.is_empty() {
            self.registry.names()
        } else {
            rule_names.iter().map(|s| s.as_ref()).collect()
        };

        info!(
            event = "generate_start",
            pool = %pool.name(),
            entry_count = pool.len() as u64,
            rule_count = names.len() as u64,
        );

        let mut report = GenerateReport::default();
        for name in names {
            match self.build(pool, name) {
                Ok(built) => report.merge(built),
                Err(error) => {
                    warn!(rule = name, error = %error, "rule skipped");
                    report.failures.push(BuildFailure {
                        rule: name.to_string(),
                        asn_id: None,
                        error,
                    });
                }
            }
        }

        info!(
            event = "generate_end",
            pool = %pool.name(),
            association_count = report.associations.len() as u64,
            failure_count = report.failures.len() as u64,
        );
        report
    }

    /// Runs one rule against a pool.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRule` if the rule is not registered. Failures of
    /// individual associations are reported inside the returned report.
    pub fn build(&self, pool: &AssociationPool, rule_name: &str) -> Result<GenerateReport> {
        let rule = self.registry.get(rule_name)?;

        let mut constraints = rule.constraints.clone();
        if let Some(program) = &self.program {
            constraints.push(Constraint::Program(program.clone()));
        }
        let eligible: Vec<&PoolEntry> = pool
            .iter()
            .filter(|entry| constraints.iter().all(|c| c.matches(entry)))
            .collect();

        debug!(
            rule = %rule.name,
            eligible = eligible.len(),
            entries = pool.len(),
            "filtered pool"
        );

        let mut report = GenerateReport::default();
        let mut implicit = 0;
        for group in group_by_candidate(&eligible) {
            let asn_id = match group.candidate {
                Some(candidate) => candidate.to_string(),
                None => {
                    implicit += 1;
                    format!("a{}", IMPLICIT_ASN_ID_BASE + implicit - 1)
                }
            };

            let products = (rule.construct)(rule, &group);
            if products.is_empty() {
                debug!(rule = %rule.name, asn_id = %asn_id, "no science exposures in group");
                continue;
            }

            let asn = Association {
                program: Some(group.program.to_string()),
                asn_type: Some(rule.asn_type.clone()),
                asn_id: Some(asn_id.clone()),
                asn_pool: Some(pool.name().to_string()),
                asn_rule: Some(rule.name.clone()),
                version_id: self.version_id.clone(),
                constraints: describe_group(&constraints, &group),
                products,
                extra: Default::default(),
            };

            match validate_association(&asn).into_result() {
                Ok(()) => {
                    debug!(
                        rule = %rule.name,
                        asn_id = %asn_id,
                        products = asn.products.len(),
                        "association built"
                    );
                    report.associations.push(asn);
                }
                Err(error) => {
                    warn!(rule = %rule.name, asn_id = %asn_id, error = %error, "association rejected");
                    report.failures.push(BuildFailure {
                        rule: rule.name.clone(),
                        asn_id: Some(asn_id),
                        error,
                    });
                }
            }
        }

        info!(
            event = "rule_end",
            rule = %rule.name,
            association_count = report.associations.len() as u64,
            failure_count = report.failures.len() as u64,
        );
        Ok(report)
    }
}

/// Groups entries by `(program, candidate)` in order of first appearance.
///
/// An entry listing several candidates joins each of their groups; entries
/// listing none share one group per program. Programs differing only in
/// leading zeros are one program; the group keeps the first spelling seen.
pub fn group_by_candidate<'a>(entries: &[&'a PoolEntry]) -> Vec<CandidateGroup<'a>> {
    let mut groups: Vec<CandidateGroup<'a>> = Vec::new();
    let mut index: HashMap<(&'a str, Option<&'a str>), usize> = HashMap::new();

    for &entry in entries {
        let keys: Vec<Option<&'a str>> = if entry.candidates.is_empty() {
            vec![None]
        } else {
            entry.candidates.iter().map(|c| Some(c.as_str())).collect()
        };

        for candidate in keys {
            let key = (program_key(&entry.program), candidate);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(CandidateGroup {
                    program: entry.program.as_str(),
                    candidate,
                    entries: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].entries.push(entry);
        }
    }

    groups
}

fn describe_group(constraints: &[Constraint], group: &CandidateGroup<'_>) -> Vec<String> {
    let mut described: Vec<String> = constraints.iter().map(|c| c.to_string()).collect();
    if !constraints.iter().any(|c| matches!(c, Constraint::Program(_))) {
        described.push(Constraint::Program(group.program.to_string()).to_string());
    }
    if let Some(candidate) = group.candidate {
        described.push(Constraint::Candidate(candidate.to_string()).to_string());
    }
    described
}
