//! Exposure pool the association builder reads from.
//!
//! A pool is loaded once and never mutated. Two on-disk forms are accepted:
//!
//! - a JSON array of [`PoolEntry`] objects
//! - a pipe-delimited table with a header row, as written by the archive:
//!
//! ```text
//! FILENAME|EXPTYPE|PROGRAM|ASN_CANDIDATE|EXP_TYPE
//! test_lrs2_rate.fits|science|00623|[('o001', 'observation')]|MIR_LRS-FIXEDSLIT
//! test_lrs2bkg_rate.fits|background|00623|[('o001', 'observation')]|MIR_LRS-FIXEDSLIT
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::association::ExpType;
use crate::error::{AsnError, Result};

/// A record per observed exposure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    /// Exposure filename.
    pub filename: String,

    /// Role the exposure plays when it joins a product.
    pub exptype: ExpType,

    /// Program identifier.
    pub program: String,

    /// Association candidates the exposure may belong to.
    #[serde(default)]
    pub candidates: Vec<String>,

    /// Instrument mode (the `EXP_TYPE` keyword), e.g. `MIR_LRS-FIXEDSLIT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_mode: Option<String>,
}

impl PoolEntry {
    pub fn new(filename: impl Into<String>, exptype: ExpType, program: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            exptype,
            program: program.into(),
            candidates: Vec::new(),
            exp_mode: None,
        }
    }

    pub fn with_candidate(mut self, candidate: impl Into<String>) -> Self {
        self.candidates.push(candidate.into());
        self
    }

    pub fn with_exp_mode(mut self, exp_mode: impl Into<String>) -> Self {
        self.exp_mode = Some(exp_mode.into());
        self
    }
}

/// The full, read-only candidate set of exposures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationPool {
    name: String,
    entries: Vec<PoolEntry>,
}

impl AssociationPool {
    /// Creates a pool, rejecting entries without a filename or program.
    pub fn new(name: impl Into<String>, entries: Vec<PoolEntry>) -> Result<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.filename.trim().is_empty() {
                return Err(AsnError::PoolFormat {
                    line: index + 1,
                    message: "entry has an empty filename".to_string(),
                });
            }
            if entry.program.trim().is_empty() {
                return Err(AsnError::PoolFormat {
                    line: index + 1,
                    message: format!("entry '{}' has an empty program", entry.filename),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            entries,
        })
    }

    /// Loads a pool from disk, choosing the format by extension.
    ///
    /// `.json` files are parsed as JSON arrays, anything else as a
    /// pipe-delimited table. The pool is named after the file stem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let pool = if is_json {
            Self::from_json_str(name, &contents)?
        } else {
            Self::from_table_str(name, &contents)?
        };
        debug!(pool = %pool.name, entries = pool.len(), "loaded pool");
        Ok(pool)
    }

    /// Parses a pool from a JSON array of entries.
    pub fn from_json_str(name: impl Into<String>, s: &str) -> Result<Self> {
        let entries: Vec<PoolEntry> = serde_json::from_str(s)?;
        Self::new(name, entries)
    }

    /// Parses a pool from a pipe-delimited table.
    ///
    /// Columns are matched case-insensitively. `FILENAME`, `EXPTYPE` and
    /// `PROGRAM` are required; `ASN_CANDIDATE` and `EXP_TYPE` are optional.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_table_str(name: impl Into<String>, s: &str) -> Result<Self> {
        let mut rows = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let Some((header_line, header)) = rows.next() else {
            return Self::new(name, Vec::new());
        };
        let columns = TableColumns::from_header(header_line, header)?;

        let mut entries = Vec::new();
        for (line, row) in rows {
            entries.push(columns.parse_row(line, row)?);
        }
        Self::new(name, entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by filename.
    pub fn get(&self, filename: &str) -> Option<&PoolEntry> {
        self.entries.iter().find(|e| e.filename == filename)
    }
}

impl<'a> IntoIterator for &'a AssociationPool {
    type Item = &'a PoolEntry;
    type IntoIter = std::slice::Iter<'a, PoolEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

struct TableColumns {
    width: usize,
    filename: usize,
    exptype: usize,
    program: usize,
    candidates: Option<usize>,
    exp_mode: Option<usize>,
}

impl TableColumns {
    fn from_header(line: usize, header: &str) -> Result<Self> {
        let names: Vec<String> = header
            .split('|')
            .map(|c| c.trim().to_ascii_uppercase())
            .collect();
        let find = |column: &str| names.iter().position(|n| n == column);
        let require = |column: &str| {
            find(column).ok_or_else(|| AsnError::PoolFormat {
                line,
                message: format!("missing required column {}", column),
            })
        };

        Ok(Self {
            width: names.len(),
            filename: require("FILENAME")?,
            exptype: require("EXPTYPE")?,
            program: require("PROGRAM")?,
            candidates: find("ASN_CANDIDATE"),
            exp_mode: find("EXP_TYPE"),
        })
    }

    fn parse_row(&self, line: usize, row: &str) -> Result<PoolEntry> {
        let cells: Vec<&str> = row.split('|').map(str::trim).collect();
        if cells.len() != self.width {
            return Err(AsnError::PoolFormat {
                line,
                message: format!("expected {} columns, found {}", self.width, cells.len()),
            });
        }

        let exptype = cells[self.exptype]
            .parse::<ExpType>()
            .map_err(|e| AsnError::PoolFormat {
                line,
                message: e.to_string(),
            })?;
        let candidates = self
            .candidates
            .map(|i| parse_candidates(cells[i]))
            .unwrap_or_default();
        let exp_mode = self
            .exp_mode
            .map(|i| cells[i])
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(PoolEntry {
            filename: cells[self.filename].to_string(),
            exptype,
            program: cells[self.program].to_string(),
            candidates,
            exp_mode,
        })
    }
}

/// Extracts candidate ids from an `ASN_CANDIDATE` cell.
///
/// Accepts the archive's tuple-list form, `[('o001', 'observation'), ...]`,
/// where the id is the first element of each tuple, or a plain list of ids
/// separated by commas or whitespace. Duplicates are dropped, order kept.
pub(crate) fn parse_candidates(raw: &str) -> Vec<String> {
    let is_quote = |c: char| c == '\'' || c == '"';
    let raw = raw.trim();

    let ids: Vec<&str> = if raw.contains('(') {
        raw.split('(')
            .skip(1)
            .filter_map(|tuple| tuple.split(|c: char| c == ',' || c == ')').next())
            .map(|id| id.trim().trim_matches(is_quote).trim())
            .collect()
    } else {
        raw.trim_matches(|c: char| c == '[' || c == ']')
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(|id| id.trim_matches(is_quote))
            .collect()
    };

    let mut candidates: Vec<String> = Vec::new();
    for id in ids.into_iter().filter(|id| !id.is_empty()) {
        if !candidates.iter().any(|c| c == id) {
            candidates.push(id.to_string());
        }
    }
    candidates
}
