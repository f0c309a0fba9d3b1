//! Query keys and resource families

use serde::Serialize;
use std::fmt;

/// A group of cache entries belonging to one resource type.
///
/// Invalidation works on families: every key registered under a family is
/// marked stale at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Family(&'static str);

impl Family {
    /// Create a new family identifier
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The family name
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifies one cached query: its family plus ordered key parts.
///
/// Two keys are equal only when the family and every part match, so
/// `tasks / list / {"completed":true}` and `tasks / list / {}` are cached
/// separately but invalidated together.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    family: Family,
    parts: Vec<String>,
}

impl QueryKey {
    /// Create a key with no parts beyond the family
    pub fn new(family: Family) -> Self {
        Self {
            family,
            parts: Vec::new(),
        }
    }

    /// Append a key part
    pub fn with(mut self, part: impl Into<String>) -> Self {
        self.parts.push(part.into());
        self
    }

    /// Append serialized parameters as a key part.
    ///
    /// Parameters are rendered as compact JSON, so struct field order decides
    /// the canonical form.
    pub fn with_params<P: Serialize>(self, params: &P) -> Result<Self, serde_json::Error> {
        let rendered = serde_json::to_string(params)?;
        Ok(self.with(rendered))
    }

    /// The family this key belongs to
    pub fn family(&self) -> Family {
        self.family
    }

    /// The key parts after the family
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        for part in &self.parts {
            write!(f, "/{}", part)?;
        }
        Ok(())
    }
}
