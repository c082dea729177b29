//! Who the records belong to.
//!
//! Sign-in is handled elsewhere; this crate only needs to know the current
//! owner id, and receives it through [`OwnerProvider`] instead of a global.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CareError, Result};

pub const OWNER_ENV_VAR: &str = "CARELOG_OWNER";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Returns `None` for blank ids.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == id.len() {
            Some(Self(id))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub trait OwnerProvider: Send + Sync {
    fn current_owner(&self) -> Option<OwnerId>;

    fn require_owner(&self) -> Result<OwnerId> {
        self.current_owner().ok_or(CareError::NoOwner)
    }
}

/// First non-blank candidate wins: command-line flag, then environment, then
/// the value saved in settings.
#[derive(Debug, Clone, Default)]
pub struct LayeredOwner {
    candidates: Vec<Option<String>>,
}

impl LayeredOwner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, candidate: Option<String>) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn with_env(self) -> Self {
        self.with(std::env::var(OWNER_ENV_VAR).ok())
    }
}

impl OwnerProvider for LayeredOwner {
    fn current_owner(&self) -> Option<OwnerId> {
        self.candidates
            .iter()
            .flatten()
            .find_map(|candidate| OwnerId::new(candidate.clone()))
    }
}
