//! Login Lockout Value Object
//!
//! Failed-attempt counter and lock deadline carried on the user record.

use chrono::{DateTime, Duration, Utc};

/// Lockout state of one account.
///
/// # Invariants
/// - `failed_attempts > 0` only while no successful login happened since
///   the last failure
/// - `lock_until` is only set by reaching the failure threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginLockout {
    failed_attempts: u32,
    lock_until: Option<DateTime<Utc>>,
}

impl LoginLockout {
    /// Rebuild from stored values.
    pub fn from_parts(failed_attempts: u32, lock_until: Option<DateTime<Utc>>) -> Self {
        Self {
            failed_attempts,
            lock_until,
        }
    }

    #[inline]
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    #[inline]
    pub fn lock_until(&self) -> Option<DateTime<Utc>> {
        self.lock_until
    }

    /// Lock deadline if the account is locked at `now`.
    pub fn locked_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.lock_until.filter(|until| *until > now)
    }

    /// A lock is set but its deadline has passed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lock_until, Some(until) if until <= now)
    }

    /// Nothing to reset.
    pub fn is_clear(&self) -> bool {
        self.failed_attempts == 0 && self.lock_until.is_none()
    }

    /// Count one failure; lock once `threshold` is reached.
    pub fn record_failure(&mut self, now: DateTime<Utc>, threshold: u32, duration: Duration) {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        if self.failed_attempts >= threshold {
            self.lock_until = Some(
                now.checked_add_signed(duration)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            );
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
