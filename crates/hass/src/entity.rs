//! Entity identifiers (`<domain>.<name>`).

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A validated Home Assistant entity id such as `light.bedroom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId {
    raw: String,
    dot: usize,
}

impl EntityId {
    /// Parse an entity id.
    ///
    /// Both halves must be non-empty and use only `[a-z0-9_]`, so the id is
    /// safe to place in a URL path as is.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim();
        match raw.split_once('.') {
            Some((domain, name)) if is_slug(domain) && is_slug(name) => Ok(Self {
                raw: raw.to_string(),
                dot: domain.len(),
            }),
            _ => Err(Error::InvalidEntityId(input.to_string())),
        }
    }

    /// Device category, e.g. `light` or `media_player`.
    pub fn domain(&self) -> &str {
        &self.raw[..self.dot]
    }

    pub fn name(&self) -> &str {
        &self.raw[self.dot + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn is_slug(part: &str) -> bool {
    !part.is_empty()
        && part
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
