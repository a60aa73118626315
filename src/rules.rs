//! Boilerplate line rules.
//!
//! Platform chrome changes with the platform's templates, so the rules are data:
//! a JSON table compiled into the binary, replaceable with `rules_path`.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

const BUILTIN_RULES: &str = include_str!("../rules.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Pattern occurs anywhere in the raw line.
    Contains,
    /// Trimmed line equals the pattern.
    Exact,
    /// Regex matched against the trimmed line.
    Regex,
}

#[derive(Debug, Deserialize)]
struct RuleTable {
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    pattern: String,
    kind: MatchKind,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: String,
    pub kind: MatchKind,
    regex: Option<Regex>,
}

impl Rule {
    pub fn new(pattern: &str, kind: MatchKind) -> Result<Self> {
        let regex = match kind {
            MatchKind::Regex => Some(
                Regex::new(pattern)
                    .map_err(|e| Error::Rules(format!("bad pattern '{}': {}", pattern, e)))?,
            ),
            _ => None,
        };
        Ok(Rule {
            pattern: pattern.to_string(),
            kind,
            regex,
        })
    }

    pub fn matches(&self, line: &str) -> bool {
        match (self.kind, &self.regex) {
            (MatchKind::Contains, _) => line.contains(&self.pattern),
            (MatchKind::Exact, _) => line.trim() == self.pattern,
            (MatchKind::Regex, Some(re)) => re.is_match(line.trim()),
            (MatchKind::Regex, None) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_RULES)
    }

    /// Built-in table, or the one at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::builtin();
        };
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_json(&json)?;
        info!(path = %path.display(), rules = set.len(), "Loaded boilerplate rules");
        Ok(set)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: RuleTable = serde_json::from_str(json).map_err(|e| Error::Rules(e.to_string()))?;
        let rules = table
            .rules
            .iter()
            .map(|r| Rule::new(&r.pattern, r.kind))
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleSet { rules })
    }

    /// First rule that drops `line`, if any.
    pub fn matching(&self, line: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(line))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
