use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::field::ValueKind;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required env file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read env file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Fields(#[from] FieldErrors),
}

/// A problem with a single leaf field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing required env: {key}")]
    Missing { key: String },

    #[error("field {key}: invalid {kind}: {detail}")]
    Invalid {
        key: String,
        kind: ValueKind,
        detail: String,
    },
}

impl FieldError {
    /// The derived environment key of the offending field.
    pub fn key(&self) -> &str {
        match self {
            FieldError::Missing { key } | FieldError::Invalid { key, .. } => key,
        }
    }
}

/// Every field error found by one bind, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Keys of all failing fields.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(FieldError::key)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::field::ScalarKind;

    #[test]
    fn test_messages() {
        let missing = FieldError::Missing {
            key: "DATABASE_HOST".into(),
        };
        assert_eq!(missing.to_string(), "missing required env: DATABASE_HOST");

        let invalid = FieldError::Invalid {
            key: "PORT".into(),
            kind: ValueKind::Scalar(ScalarKind::Int),
            detail: "parsing \"abc\": invalid digit found in string".into(),
        };
        assert_eq!(
            invalid.to_string(),
            "field PORT: invalid int: parsing \"abc\": invalid digit found in string"
        );
    }

    #[test]
    fn test_joined_display() {
        let errors = FieldErrors::new(vec![
            FieldError::Missing { key: "A".into() },
            FieldError::Missing { key: "B".into() },
        ]);
        assert_eq!(
            errors.to_string(),
            "missing required env: A\nmissing required env: B"
        );
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["A", "B"]);

        let err = ConfigError::from(errors);
        assert!(matches!(err, ConfigError::Fields(ref e) if e.len() == 2));
    }
}
