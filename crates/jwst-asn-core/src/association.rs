//! Association document types.
//!
//! An [`Association`] groups exposures into [`Product`]s, each of which lists
//! its [`Member`] exposures. The serde layout matches the Level 2 JSON
//! association document:
//!
//! ```
//! use jwst_asn_core::{Association, ExpType};
//!
//! let asn = Association::from_json_str(r#"{
//!     "asn_type": "spec2",
//!     "products": [
//!         {"name": "test_lrs1", "members": [
//!             {"expname": "test_lrs1_rate.fits", "exptype": "science"}
//!         ]}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(asn.products.len(), 1);
//! assert_eq!(asn.products[0].members[0].exptype, ExpType::Science);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::naming::product_name;

/// Role of an exposure within a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ExpType {
    /// The exposure the product is built from.
    Science,
    /// Background exposure used for subtraction.
    Background,
    /// NIRSpec MSA imprint exposure.
    Imprint,
}

impl ExpType {
    /// Every member role, in document order.
    pub const ALL: [ExpType; 3] = [ExpType::Science, ExpType::Background, ExpType::Imprint];

    pub fn as_str(self) -> &'static str {
        match self {
            ExpType::Science => "SCIENCE",
            ExpType::Background => "BACKGROUND",
            ExpType::Imprint => "IMPRINT",
        }
    }

    pub fn is_science(self) -> bool {
        self == ExpType::Science
    }
}

impl fmt::Display for ExpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known member role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid exposure type '{0}': expected one of SCIENCE, BACKGROUND, IMPRINT")]
pub struct ParseExpTypeError(pub String);

impl FromStr for ExpType {
    type Err = ParseExpTypeError;

    /// Parses a member role, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ExpType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseExpTypeError(s.to_string()))
    }
}

impl TryFrom<String> for ExpType {
    type Error = ParseExpTypeError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single exposure reference within a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Exposure filename.
    pub expname: String,
    /// Role of the exposure.
    pub exptype: ExpType,
}

impl Member {
    pub fn new(expname: impl Into<String>, exptype: ExpType) -> Self {
        Self {
            expname: expname.into(),
            exptype,
        }
    }

    pub fn science(expname: impl Into<String>) -> Self {
        Self::new(expname, ExpType::Science)
    }

    /// Returns true if this member has the given `(expname, exptype)` key.
    pub fn matches(&self, expname: &str, exptype: ExpType) -> bool {
        self.exptype == exptype && self.expname == expname
    }
}

/// One output unit of an association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Output name; derived from the SCIENCE member when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Member exposures, in insertion order.
    pub members: Vec<Member>,
}

impl Product {
    /// Creates a product around a single SCIENCE exposure, named after it.
    pub fn for_science(expname: impl Into<String>) -> Self {
        let expname = expname.into();
        Self {
            name: Some(product_name(&expname)),
            members: vec![Member::science(expname)],
        }
    }

    /// Appends a member without any invariant checks.
    ///
    /// Used during construction; edits on a finished association go through
    /// [`Association::add_member`].
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Number of members with the given role.
    pub fn count(&self, exptype: ExpType) -> usize {
        self.members.iter().filter(|m| m.exptype == exptype).count()
    }

    /// Returns the SCIENCE member if there is exactly one.
    pub fn science(&self) -> Option<&Member> {
        let mut science = self.members.iter().filter(|m| m.exptype.is_science());
        match (science.next(), science.next()) {
            (Some(member), None) => Some(member),
            _ => None,
        }
    }

    /// Returns the explicit name, or derives one from the SCIENCE member.
    pub fn resolved_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| self.science().map(|m| product_name(&m.expname)))
    }

    pub fn contains(&self, expname: &str, exptype: ExpType) -> bool {
        self.members.iter().any(|m| m.matches(expname, exptype))
    }
}

/// A grouping of exposures into products for joint processing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Association {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_pool: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn_rule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    /// Constraints the association was built under. Accepts either a single
    /// string or a list of strings on input.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_list"
    )]
    pub constraints: Vec<String>,

    pub products: Vec<Product>,

    /// Keys this crate does not interpret, carried through edits unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Association {
    /// Creates an empty association of the given type.
    pub fn new(asn_type: impl Into<String>) -> Self {
        Self {
            asn_type: Some(asn_type.into()),
            ..Self::default()
        }
    }

    /// Parses an association from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parses an association from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Filenames of all members, optionally restricted to one role, in
    /// product then member order.
    pub fn member_filenames(&self, exptype: Option<ExpType>) -> Vec<&str> {
        self.products
            .iter()
            .flat_map(|p| p.members.iter())
            .filter(|m| exptype.map_or(true, |t| m.exptype == t))
            .map(|m| m.expname.as_str())
            .collect()
    }

    /// Total number of members across all products.
    pub fn member_count(&self) -> usize {
        self.products.iter().map(|p| p.members.len()).sum()
    }
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}
