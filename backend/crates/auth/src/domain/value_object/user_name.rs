//! User Name Value Object
//!
//! The user name is the login handle and the public display name.
//!
//! ## Rules
//! - Surrounding whitespace is trimmed, nothing else is rewritten
//! - ASCII letters, digits and `_` only
//! - Length 3 to 30 characters
//! - Case-sensitive: `Alice` and `alice` are different users

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    Empty,
    TooShort { length: usize, min: usize },
    TooLong { length: usize, max: usize },
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Username is required"),
            Self::TooShort { length, min } => {
                write!(f, "Username is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "Username is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => write!(
                f,
                "Invalid character '{char}' at position {position}. Only letters, numbers and underscores are allowed"
            ),
        }
    }
}

impl std::error::Error for UserNameError {}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated user name.
///
/// # Invariants
/// - Length between [`USER_NAME_MIN_LENGTH`] and [`USER_NAME_MAX_LENGTH`]
/// - Only `[A-Za-z0-9_]`
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate raw input.
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let trimmed = input.as_ref().trim();
        Self::validate(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Rebuild from a stored value (already validated on write).
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    fn validate(value: &str) -> Result<(), UserNameError> {
        if value.is_empty() {
            return Err(UserNameError::Empty);
        }

        // Byte length equals char length once every char is ASCII, so check chars first.
        if let Some((position, char)) = value
            .chars()
            .enumerate()
            .find(|(_, c)| !Self::is_valid_char(*c))
        {
            return Err(UserNameError::InvalidCharacter { char, position });
        }

        let length = value.len();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                length,
                min: USER_NAME_MIN_LENGTH,
            });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserName").field(&self.0).finish()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["alice", "Bob_42", "___", "a1b", &"x".repeat(30)] {
            assert!(UserName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let name = UserName::new("  alice \n").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn test_case_is_preserved_and_significant() {
        let upper = UserName::new("Alice").unwrap();
        let lower = UserName::new("alice").unwrap();
        assert_eq!(upper.as_str(), "Alice");
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_length_bounds() {
        assert!(matches!(
            UserName::new("ab"),
            Err(UserNameError::TooShort { length: 2, .. })
        ));
        assert!(matches!(
            UserName::new("a".repeat(31)),
            Err(UserNameError::TooLong { length: 31, .. })
        ));
        assert_eq!(UserName::new("   "), Err(UserNameError::Empty));
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            UserName::new("al ice"),
            Err(UserNameError::InvalidCharacter {
                char: ' ',
                position: 2
            })
        );
        assert!(UserName::new("<script>").is_err());
        assert!(UserName::new("alice.smith").is_err());
        assert!(UserName::new("ålice").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let name: UserName = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(name.as_str(), "alice");
        assert!(serde_json::from_str::<UserName>("\"a\"").is_err());
    }
}
