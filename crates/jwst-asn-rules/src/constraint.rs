//! Constraint predicates evaluated against pool entries.

use std::fmt;

use jwst_asn_core::{ExpType, PoolEntry};

/// A single predicate over a pool entry.
///
/// # Example
///
/// ```
/// use jwst_asn_core::{ExpType, PoolEntry};
/// use jwst_asn_rules::Constraint;
///
/// let entry = PoolEntry::new("a_rate.fits", ExpType::Science, "00623").with_candidate("o001");
///
/// assert!(Constraint::Program("623".into()).matches(&entry));
/// assert!(Constraint::Candidate("o001".into()).matches(&entry));
/// assert!(!Constraint::ExpTypeIn(vec![ExpType::Background]).matches(&entry));
/// assert_eq!(Constraint::Program("623".into()).to_string(), "program == 623");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Entry belongs to the program. Numeric programs compare without
    /// leading zeros.
    Program(String),

    /// Entry lists the association candidate.
    Candidate(String),

    /// Entry's member role is one of these.
    ExpTypeIn(Vec<ExpType>),

    /// Entry's instrument mode is one of these, ignoring case. Entries
    /// without a mode pass.
    ExpModeIn(Vec<String>),

    /// Entry carries an instrument mode.
    ExpModeSet,
}

impl Constraint {
    pub fn matches(&self, entry: &PoolEntry) -> bool {
        match self {
            Constraint::Program(program) => same_program(program, &entry.program),
            Constraint::Candidate(candidate) => entry.candidates.iter().any(|c| c == candidate),
            Constraint::ExpTypeIn(types) => types.contains(&entry.exptype),
            Constraint::ExpModeIn(modes) => entry
                .exp_mode
                .as_deref()
                .map_or(true, |mode| modes.iter().any(|m| m.eq_ignore_ascii_case(mode))),
            Constraint::ExpModeSet => entry.exp_mode.is_some(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Program(program) => write!(f, "program == {}", program),
            Constraint::Candidate(candidate) => write!(f, "asn_candidate == {}", candidate),
            Constraint::ExpTypeIn(types) => {
                let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
                write!(f, "exptype in [{}]", names.join(", "))
            }
            Constraint::ExpModeIn(modes) => write!(f, "exp_type in [{}]", modes.join(", ")),
            Constraint::ExpModeSet => f.write_str("exp_type is set"),
        }
    }
}

/// Compares program identifiers, treating `623` and `00623` as equal.
pub(crate) fn same_program(a: &str, b: &str) -> bool {
    program_key(a) == program_key(b)
}

/// Canonical form of a program identifier: numeric programs lose their
/// leading zeros, anything else is only trimmed.
pub(crate) fn program_key(program: &str) -> &str {
    let program = program.trim();
    if program.is_empty() || !program.bytes().all(|c| c.is_ascii_digit()) {
        return program;
    }
    match program.trim_start_matches('0') {
        "" => "0",
        stripped => stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_program() {
        assert!(same_program("623", "00623"));
        assert!(same_program("0", "00000"));
        assert!(!same_program("623", "624"));
        assert!(same_program("test", "test"));
        assert!(!same_program("test", "00623"));
    }

    #[test]
    fn test_program_key() {
        assert_eq!(program_key("00623"), "623");
        assert_eq!(program_key(" 623 "), "623");
        assert_eq!(program_key("00000"), "0");
        assert_eq!(program_key("test"), "test");
    }

    #[test]
    fn test_exp_mode_set() {
        let entry = PoolEntry::new("a.fits", ExpType::Science, "1");
        assert!(!Constraint::ExpModeSet.matches(&entry));
        assert!(Constraint::ExpModeSet.matches(&entry.with_exp_mode("MIR_IMAGE")));
        assert_eq!(Constraint::ExpModeSet.to_string(), "exp_type is set");
    }

    #[test]
    fn test_exp_mode_unset_passes() {
        let entry = PoolEntry::new("a.fits", ExpType::Science, "1");
        assert!(Constraint::ExpModeIn(vec!["MIR_IMAGE".into()]).matches(&entry));

        let lrs = entry.with_exp_mode("mir_lrs-fixedslit");
        assert!(Constraint::ExpModeIn(vec!["MIR_LRS-FIXEDSLIT".into()]).matches(&lrs));
        assert!(!Constraint::ExpModeIn(vec!["MIR_IMAGE".into()]).matches(&lrs));
    }

    #[test]
    fn test_display() {
        let c = Constraint::ExpTypeIn(vec![ExpType::Science, ExpType::Imprint]);
        assert_eq!(c.to_string(), "exptype in [SCIENCE, IMPRINT]");
        assert_eq!(
            Constraint::ExpModeIn(vec!["NRS_IFU".into(), "MIR_MRS".into()]).to_string(),
            "exp_type in [NRS_IFU, MIR_MRS]"
        );
    }
}
