//! Repository reference parsing

use std::fmt;

use crate::error::{Error, Result};

/// Fixed host prefix stripped from repository locations
pub const HOST_PREFIX: &str = "https://github.com/";

/// Owner/name pair identifying a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    /// Account or organization owning the repository
    pub owner: String,

    /// Repository name
    pub name: String,
}

impl RepositoryReference {
    /// Parse a location of the form `https://github.com/<owner>/<name>`.
    ///
    /// No normalization is applied: a trailing slash, a `.git` suffix or extra
    /// path segments are all rejected or kept verbatim.
    pub fn parse(location: &str) -> Result<Self> {
        let remainder = location.strip_prefix(HOST_PREFIX).unwrap_or(location);
        let parts: Vec<&str> = remainder.split('/').collect();

        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(Error::InvalidReferenceFormat(location.to_string())),
        }
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
