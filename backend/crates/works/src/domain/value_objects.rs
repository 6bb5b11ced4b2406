//! Domain Value Objects
//!
//! Immutable value types for the content domain.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{WorksError, WorksResult};

// ============================================================================
// Work classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum WorkType {
    Manga = 0,
    Novel = 1,
    Comic = 2,
}

impl WorkType {
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(WorkType::Manga),
            1 => Some(WorkType::Novel),
            2 => Some(WorkType::Comic),
            _ => None,
        }
    }
}

/// Publication progress as set by the author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum WorkStatus {
    Ongoing = 0,
    Completed = 1,
    Hiatus = 2,
}

impl WorkStatus {
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(WorkStatus::Ongoing),
            1 => Some(WorkStatus::Completed),
            2 => Some(WorkStatus::Hiatus),
            _ => None,
        }
    }
}

// ============================================================================
// Moderation
// ============================================================================

/// Admin-controlled visibility state of a work.
///
/// ```text
/// pending ──> published <──> rejected
///    └──────────────────────────^
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum ModerationStatus {
    #[default]
    Pending = 0,
    Published = 1,
    Rejected = 2,
}

impl ModerationStatus {
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub const fn code(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Published => "published",
            ModerationStatus::Rejected => "rejected",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(ModerationStatus::Pending),
            1 => Some(ModerationStatus::Published),
            2 => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(ModerationStatus::Pending),
            "published" => Some(ModerationStatus::Published),
            "rejected" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_published(&self) -> bool {
        matches!(self, ModerationStatus::Published)
    }

    pub const fn can_transition_to(&self, next: ModerationStatus) -> bool {
        use ModerationStatus::*;
        matches!(
            (*self, next),
            (Pending, Published) | (Pending, Rejected) | (Rejected, Published) | (Published, Rejected)
        )
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Chapter content
// ============================================================================

/// Prose for novels, an ordered list of page image URLs for manga/comics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChapterContent {
    Text(String),
    Images(Vec<String>),
}

// ============================================================================
// Feedback email
// ============================================================================

const EMAIL_MAX_LENGTH: usize = 254;

/// Lower-cased contact address attached to feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> WorksResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(WorksError::Validation("Email is required".into()));
        }
        if email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(WorksError::Validation("Email is invalid".into()));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }
        if local.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return false;
        }

        domain.contains('.')
            && domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-'])
    }

    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
