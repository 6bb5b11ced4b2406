//! Login Attempt Guard
//!
//! Decides the outcome of one login attempt and the resulting lockout state.
//! Pure: the caller persists the returned user when `changed` is set.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entity::user::User;

/// Default number of consecutive failures before the account locks.
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 15;

/// Default lock length in minutes.
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    InvalidCredentials,
    AccountLocked { until: DateTime<Utc> },
}

/// Result of [`LoginAttemptGuard::evaluate`].
#[derive(Debug, Clone)]
pub struct LoginEvaluation {
    pub outcome: LoginOutcome,
    pub user: User,
    /// Lockout fields changed and must be persisted.
    pub changed: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct LoginAttemptGuard {
    threshold: u32,
    lockout_duration: Duration,
}

impl Default for LoginAttemptGuard {
    fn default() -> Self {
        Self::new(
            DEFAULT_LOCKOUT_THRESHOLD,
            Duration::minutes(DEFAULT_LOCKOUT_MINUTES),
        )
    }
}

impl LoginAttemptGuard {
    /// A threshold of 0 is treated as 1.
    pub fn new(threshold: u32, lockout_duration: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            lockout_duration,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Evaluate one attempt.
    ///
    /// `password_matches` is only called when the account is not locked, so a
    /// locked account never pays for (or leaks through) a hash verification.
    pub fn evaluate<F>(
        &self,
        mut user: User,
        password_matches: F,
        now: DateTime<Utc>,
    ) -> LoginEvaluation
    where
        F: FnOnce(&User) -> bool,
    {
        if let Some(until) = user.lockout.locked_at(now) {
            return LoginEvaluation {
                outcome: LoginOutcome::AccountLocked { until },
                user,
                changed: false,
            };
        }

        let mut changed = false;

        // Lazy expiry: an elapsed lock starts a fresh window
        if user.lockout.is_expired_at(now) {
            user.lockout.reset();
            changed = true;
        }

        let outcome = if password_matches(&user) {
            if !user.lockout.is_clear() {
                user.lockout.reset();
                changed = true;
            }
            LoginOutcome::Success
        } else {
            user.lockout.record_failure(now, self.threshold, self.lockout_duration);
            changed = true;
            LoginOutcome::InvalidCredentials
        };

        if changed {
            user.updated_at = now;
        }

        LoginEvaluation {
            outcome,
            user,
            changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        login_lockout::LoginLockout,
        user_name::UserName,
        user_password::{RawPassword, UserPassword},
        user_role::UserRole,
    };
    use platform::password::HashParams;

    fn user() -> User {
        // Hash content is irrelevant: the closure decides the match
        let raw = RawPassword::candidate("unused".to_string());
        let hash = UserPassword::from_raw(&raw, None, HashParams::fast()).unwrap();
        User::new(UserName::new("alice").unwrap(), hash, UserRole::User)
    }

    #[test]
    fn test_success_on_clean_account_changes_nothing() {
        let guard = LoginAttemptGuard::default();
        let eval = guard.evaluate(user(), |_| true, Utc::now());
        assert_eq!(eval.outcome, LoginOutcome::Success);
        assert!(!eval.changed);
    }

    #[test]
    fn test_failure_increments_and_persists() {
        let guard = LoginAttemptGuard::default();
        let eval = guard.evaluate(user(), |_| false, Utc::now());
        assert_eq!(eval.outcome, LoginOutcome::InvalidCredentials);
        assert!(eval.changed);
        assert_eq!(eval.user.lockout.failed_attempts(), 1);
        assert_eq!(eval.user.lockout.lock_until(), None);
    }

    #[test]
    fn test_threshold_locks_and_locked_skips_password_check() {
        let guard = LoginAttemptGuard::new(3, Duration::minutes(15));
        let now = Utc::now();
        let mut u = user();
        for _ in 0..3 {
            u = guard.evaluate(u, |_| false, now).user;
        }
        assert_eq!(u.lockout.lock_until(), Some(now + Duration::minutes(15)));

        let eval = guard.evaluate(u, |_| panic!("password must not be checked"), now);
        assert_eq!(
            eval.outcome,
            LoginOutcome::AccountLocked {
                until: now + Duration::minutes(15)
            }
        );
        assert!(!eval.changed);
    }

    #[test]
    fn test_expired_lock_is_cleared_before_attempt() {
        let guard = LoginAttemptGuard::new(3, Duration::minutes(15));
        let now = Utc::now();
        let mut u = user();
        u.lockout = LoginLockout::from_parts(3, Some(now - Duration::seconds(1)));

        let eval = guard.evaluate(u.clone(), |_| false, now);
        assert_eq!(eval.outcome, LoginOutcome::InvalidCredentials);
        assert_eq!(eval.user.lockout.failed_attempts(), 1);
        assert_eq!(eval.user.lockout.lock_until(), None);

        let eval = guard.evaluate(u, |_| true, now);
        assert_eq!(eval.outcome, LoginOutcome::Success);
        assert!(eval.changed);
        assert!(eval.user.lockout.is_clear());
    }

    #[test]
    fn test_success_resets_partial_counter() {
        let guard = LoginAttemptGuard::default();
        let now = Utc::now();
        let u = guard.evaluate(user(), |_| false, now).user;
        let eval = guard.evaluate(u, |_| true, now);
        assert_eq!(eval.outcome, LoginOutcome::Success);
        assert!(eval.changed);
        assert_eq!(eval.user.lockout.failed_attempts(), 0);
    }

    #[test]
    fn test_zero_threshold_is_clamped() {
        let guard = LoginAttemptGuard::new(0, Duration::minutes(1));
        assert_eq!(guard.threshold(), 1);
    }
}
