//! Failed-authentication counter with sliding-window lockout arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use hg_shared::config::LockoutConfig;

use super::stamp::AuditStamp;

/// Authentication surface a counter guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardScope {
    Login,
    Otp,
    Totp,
    PasswordReset,
}

impl GuardScope {
    /// Database column representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardScope::Login => "LOGIN",
            GuardScope::Otp => "OTP",
            GuardScope::Totp => "TOTP",
            GuardScope::PasswordReset => "PASSWORD_RESET",
        }
    }

    /// Parse the database column representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOGIN" => Some(GuardScope::Login),
            "OTP" => Some(GuardScope::Otp),
            "TOTP" => Some(GuardScope::Totp),
            "PASSWORD_RESET" => Some(GuardScope::PasswordReset),
            _ => None,
        }
    }
}

/// Per-(subject, scope) failure counter.
///
/// Created lazily on the first failure, reset on success, never deleted.
/// The tunables are persisted with the row so policy changes only affect
/// counters created afterwards.
///
/// All arithmetic takes the clock as an argument; callers are expected to
/// run it inside their storage-level critical section so concurrent
/// failures cannot under-count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BruteForceCounter {
    /// Guarded subject (phone for login, user key elsewhere)
    pub subject_id: String,

    /// Guarded surface
    pub scope: GuardScope,

    /// Strikes inside the current window
    pub strike: i32,

    /// Lifetime failure tally, audit only
    pub failed_attempts: i64,

    /// Start of the open window, if any
    pub window_started_at: Option<DateTime<Utc>>,

    /// Most recent failure instant
    pub last_failed_at: Option<DateTime<Utc>>,

    /// Lockout expiry, if a lockout is in force
    pub locked_until: Option<DateTime<Utc>>,

    /// Strikes within one window before a lockout applies
    pub threshold: i32,

    /// Window length in seconds
    pub window_seconds: i64,

    /// First-tier lockout duration in seconds
    pub base_lock_seconds: i64,

    /// Repeat-offender lockout duration in seconds
    pub extended_lock_seconds: i64,

    /// Client context of the last failure, audit only
    pub last_user_agent: Option<String>,
    pub last_ip: Option<String>,

    pub stamp: AuditStamp,
}

impl BruteForceCounter {
    /// Fresh counter seeded with the configured tunables
    pub fn new(subject_id: impl Into<String>, scope: GuardScope, config: &LockoutConfig) -> Self {
        Self {
            subject_id: subject_id.into(),
            scope,
            strike: 0,
            failed_attempts: 0,
            window_started_at: None,
            last_failed_at: None,
            locked_until: None,
            threshold: config.threshold,
            window_seconds: config.window_seconds,
            base_lock_seconds: config.base_lock_seconds,
            extended_lock_seconds: config.extended_lock_seconds,
            last_user_agent: None,
            last_ip: None,
            stamp: AuditStamp::now(),
        }
    }

    /// Whether a lockout is in force at `now`
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.locked_until, Some(until) if now < until)
    }

    /// Seconds until the lockout expires, zero when not locked
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self.locked_until {
            Some(until) if now < until => (until - now).num_seconds(),
            _ => 0,
        }
    }

    /// Register one failed attempt at `now`.
    ///
    /// Sliding window: a failure outside the open window restarts it with
    /// strike 1, inside it increments the strike. Crossing the threshold
    /// applies a base-tier lockout; the strike keeps accumulating so that a
    /// caller who continues failing reaches the repeat-offender tier at
    /// twice the threshold, which applies the extended lockout and resets
    /// the strike and window.
    pub fn register_failure(&mut self, now: DateTime<Utc>) {
        let window_expired = match self.window_started_at {
            Some(started) => now > started + Duration::seconds(self.window_seconds),
            None => true,
        };
        if window_expired {
            self.window_started_at = Some(now);
            self.strike = 1;
        } else {
            self.strike += 1;
        }

        self.failed_attempts += 1;
        self.last_failed_at = Some(now);

        if self.strike >= self.threshold {
            let severe = self.strike >= self.threshold * 2;
            let lock_seconds = if severe {
                self.extended_lock_seconds
            } else {
                self.base_lock_seconds
            };
            self.locked_until = Some(now + Duration::seconds(lock_seconds));

            if severe {
                self.strike = 0;
                self.window_started_at = None;
            }
        }
        self.stamp.touch();
    }

    /// Clear strike, window, and lockout after a successful attempt
    pub fn register_success(&mut self) {
        self.strike = 0;
        self.window_started_at = None;
        self.locked_until = None;
        self.stamp.touch();
    }

    /// Record the client context of the latest failure
    pub fn record_client(&mut self, user_agent: Option<String>, ip: Option<String>) {
        if user_agent.is_some() {
            self.last_user_agent = user_agent;
        }
        if ip.is_some() {
            self.last_ip = ip;
        }
    }
}
