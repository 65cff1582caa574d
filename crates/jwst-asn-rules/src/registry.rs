//! Rule registry.
//!
//! A [`RuleRegistry`] maps rule names to [`Rule`]s. A registry can be used
//! directly, or installed once as the process-wide registry with [`install`]
//! and read back with [`global`]. Nothing is registered implicitly.

use std::sync::OnceLock;

use jwst_asn_core::{AsnError, Result};
use tracing::debug;

use crate::rule::{asn_lv2_image, asn_lv2_spec, Rule};

static GLOBAL: OnceLock<RuleRegistry> = OnceLock::new();

/// Ordered name → rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in Level 2 rules.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(asn_lv2_spec());
        registry.register(asn_lv2_image());
        registry
    }

    /// Registers a rule, returning the rule it replaced if the name was taken.
    pub fn register(&mut self, rule: Rule) -> Option<Rule> {
        debug!(rule = %rule.name, "registering rule");
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => Some(std::mem::replace(existing, rule)),
            None => {
                self.rules.push(rule);
                None
            }
        }
    }

    /// Looks up a rule by name.
    pub fn get(&self, name: &str) -> Result<&Rule> {
        self.rules
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| AsnError::UnknownRule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name == name)
    }

    /// Rule names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Installs the process-wide registry.
///
/// # Errors
///
/// Returns `RegistryAlreadyInstalled` if a registry was installed before;
/// the existing registry stays in place.
pub fn install(registry: RuleRegistry) -> Result<&'static RuleRegistry> {
    let mut installed = false;
    let global = GLOBAL.get_or_init(|| {
        installed = true;
        registry
    });
    if installed {
        debug!(rules = global.len(), "rule registry installed");
        Ok(global)
    } else {
        Err(AsnError::RegistryAlreadyInstalled)
    }
}

/// Returns the process-wide registry, if one was installed.
pub fn global() -> Option<&'static RuleRegistry> {
    GLOBAL.get()
}
