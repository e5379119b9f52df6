use crate::error::StorageError;
use std::fmt;

const MAX_KEY_LEN: usize = 128;

/// A validated scope name: lowercase ASCII alphanumerics and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeName(String);

impl TryFrom<&str> for ScopeName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.to_lowercase();

        if name.is_empty() {
            return Err(StorageError::PathTraversalAttempt {
                message: "EMPTY".into(),
                context: Some("Scope cannot be empty".into()),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::PathTraversalAttempt {
                message: name.into(),
                context: Some("Scope contains illegal characters".into()),
            });
        }

        Ok(Self(name))
    }
}

impl TryFrom<String> for ScopeName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for ScopeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated item key. Keys are case-sensitive and map one-to-one onto file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ItemKey<'a>(&'a str);

impl<'a> ItemKey<'a> {
    pub(crate) fn parse(key: &'a str) -> Result<Self, StorageError> {
        let invalid = |reason: &'static str| StorageError::InvalidKey {
            message: key.to_owned().into(),
            context: Some(reason.into()),
        };

        if key.is_empty() {
            return Err(invalid("Key cannot be empty"));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(invalid("Key is longer than 128 bytes"));
        }
        if key.starts_with('.') {
            return Err(invalid("Key cannot start with a dot"));
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
            return Err(invalid("Key contains illegal characters"));
        }

        Ok(Self(key))
    }

    pub(crate) fn file_name(&self) -> String {
        format!("{}.{}", self.0, crate::engine::ITEM_SUFFIX)
    }
}
