//! Full Name Value Object

use derive_more::Display;
use serde::{Deserialize, Serialize};

const FULL_NAME_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Trim and validate
    pub fn new(raw: impl AsRef<str>) -> Result<Self, &'static str> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err("Full name is required");
        }
        if trimmed.chars().count() > FULL_NAME_MAX_LENGTH {
            return Err("Full name must be at most 255 characters");
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
