//! Remote results versus local fallbacks.
//!
//! Remote calls return a classified [`IaGenError`]. [`Outcome`] records
//! whether a value came from the remote model or from a local computation,
//! and why the fallback happened, so callers can decide what to show.

use crate::error::IaGenError;
use serde::Serialize;

/// Why a remote result was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No usable credentials or backend.
    Unconfigured,
    /// Credentials rejected or billing disabled.
    Auth,
    /// Rate limit or quota exhausted.
    RateLimited,
    /// Network failure or timeout.
    Network,
    /// Prompt or response blocked by safety filters.
    Blocked,
    /// Upstream text held no usable structure.
    Unparseable,
    /// Any other upstream or local failure.
    Upstream,
}

impl FailureKind {
    /// Classifies an error.
    pub fn of(err: &IaGenError) -> Self {
        match err {
            IaGenError::Auth(_) | IaGenError::Billing(_) => Self::Auth,
            IaGenError::RateLimited { .. } => Self::RateLimited,
            IaGenError::Network(_) | IaGenError::Timeout(_) => Self::Network,
            IaGenError::ContentBlocked(_) => Self::Blocked,
            IaGenError::Extraction(_) | IaGenError::Json(_) | IaGenError::Decode(_) => {
                Self::Unparseable
            }
            _ => Self::Upstream,
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Unconfigured => "remote model not configured",
            Self::Auth => "authentication failed",
            Self::RateLimited => "quota or rate limit exceeded",
            Self::Network => "network error",
            Self::Blocked => "blocked by safety filters",
            Self::Unparseable => "response could not be parsed",
            Self::Upstream => "remote model error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// A value and where it came from.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Outcome<T> {
    /// Produced by the remote model.
    Remote(T),
    /// Produced locally after the remote path failed.
    Fallback {
        /// The local value.
        value: T,
        /// Why the remote path was abandoned.
        reason: FailureKind,
    },
}

impl<T> Outcome<T> {
    /// Keeps a successful remote value, or computes the local one.
    pub fn from_result<F>(result: Result<T, IaGenError>, local: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match result {
            Ok(value) => Self::Remote(value),
            Err(err) => {
                let reason = FailureKind::of(&err);
                tracing::warn!(error = %err, %reason, "remote call failed, using local fallback");
                Self::Fallback {
                    value: local(),
                    reason,
                }
            }
        }
    }

    /// Local value used because no remote provider exists.
    pub fn unconfigured(value: T) -> Self {
        Self::Fallback {
            value,
            reason: FailureKind::Unconfigured,
        }
    }

    /// Borrows the value.
    pub fn value(&self) -> &T {
        match self {
            Self::Remote(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Takes the value.
    pub fn into_value(self) -> T {
        match self {
            Self::Remote(value) | Self::Fallback { value, .. } => value,
        }
    }

    /// Returns true when the value is a local fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Fallback reason, if any.
    pub fn reason(&self) -> Option<FailureKind> {
        match self {
            Self::Remote(_) => None,
            Self::Fallback { reason, .. } => Some(*reason),
        }
    }

    /// Maps the carried value, keeping provenance.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Remote(value) => Outcome::Remote(f(value)),
            Self::Fallback { value, reason } => Outcome::Fallback {
                value: f(value),
                reason,
            },
        }
    }
}
