//! Bounded attempt/retry engine.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// One failed attempt, with optional diagnostic context.
///
/// Recognized domain errors describe themselves and carry no context;
/// anything else gets a diagnostic string captured at the failure site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError<E> {
    /// The error the attempt failed with.
    pub error: E,
    /// Diagnostic context, if any.
    pub context: Option<String>,
}

impl<E> AttemptError<E> {
    /// Create a new attempt error.
    pub const fn new(error: E, context: Option<String>) -> Self {
        Self { error, context }
    }
}

impl<E: fmt::Display> fmt::Display for AttemptError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{context}\n{}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Overall result of an attempt run.
///
/// Error lists are ordered oldest-first. A `Failure` list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome<T, E> {
    /// The run eventually produced a value.
    Success {
        /// Errors from the attempts that failed before the successful one.
        errors: Vec<AttemptError<E>>,
        /// The value produced by the successful attempt.
        value: T,
    },
    /// Every attempt failed, or a non-retryable error stopped the run.
    Failure {
        /// Errors from every attempt made.
        errors: Vec<AttemptError<E>>,
    },
}

impl<T, E> AttemptOutcome<T, E> {
    /// Number of attempts made during the run.
    #[must_use]
    pub fn attempts(&self) -> usize {
        match self {
            Self::Success { errors, .. } => errors.len() + 1,
            Self::Failure { errors } => errors.len(),
        }
    }
}

/// Strategy for making a bounded number of sequential attempts at an
/// operation, sleeping between retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptStrategy {
    /// Maximum number of attempts to make. Treated as at least 1.
    pub attempts: u32,
    /// How long to sleep between two attempts.
    pub interval: Duration,
}

impl Default for AttemptStrategy {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval: Duration::from_secs(1),
        }
    }
}

impl AttemptStrategy {
    /// Create a new strategy.
    #[must_use]
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// Run `attempt` until it succeeds or the strategy is exhausted.
    ///
    /// A successful attempt is passed to `validate`; a validation failure is
    /// treated exactly like an attempt failure. After any failure,
    /// `is_retryable` decides whether the run continues: a non-retryable
    /// error stops the run immediately, with no sleep and no further
    /// attempts. The sleep happens only between two attempts that both
    /// actually run.
    pub async fn run<T, E, A, Fut, V, R, C>(
        &self,
        mut attempt: A,
        validate: V,
        is_retryable: R,
        context_of: C,
    ) -> AttemptOutcome<T, E>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        V: Fn(&T) -> Result<(), E>,
        R: Fn(&E) -> bool,
        C: Fn(&E) -> Option<String>,
        E: fmt::Display,
    {
        let max_attempts = self.attempts.max(1);
        let mut errors = Vec::new();
        let mut made = 0;
        while made < max_attempts {
            made += 1;
            let error = match attempt().await {
                Ok(value) => match validate(&value) {
                    Ok(()) => return AttemptOutcome::Success { errors, value },
                    Err(error) => error,
                },
                Err(error) => error,
            };
            let retryable = is_retryable(&error);
            let context = context_of(&error);
            if !retryable {
                debug!(%error, "error cannot be retried");
            }
            errors.push(AttemptError::new(error, context));
            if !retryable || made >= max_attempts {
                break;
            }
            tokio::time::sleep(self.interval).await;
        }
        AttemptOutcome::Failure { errors }
    }
}
