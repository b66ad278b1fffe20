//! Poll-until-condition primitive
//!
//! The platform mutates instances, images and volumes asynchronously; the
//! only way to observe completion is to re-issue a describe-style call and
//! inspect the outcome. [`Wait`] bridges that to a synchronous contract:
//! it re-invokes an action until a predicate over the action's error is
//! satisfied or the attempt budget runs out.
//!
//! Two standard conditions cover the usual call sites: [`Wait::until_ready`]
//! awaits a resource reaching a target state (stop on first success), and
//! [`Wait::until_gone`] awaits its disappearance (stop on first error,
//! typically not-found after a delete).

use crate::error::{ProvisionError, Result};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

const DEFAULT_ATTEMPTS: u32 = 30;
const DEFAULT_DELAY: Duration = Duration::from_secs(60);

/// Retry budget for one polling operation
///
/// Constructed fresh per operation and discarded afterwards; defaults give
/// 30 attempts spaced 60 seconds apart. `deadline` optionally bounds total
/// wall-clock time regardless of the attempt budget, and dropping the
/// returned future cancels the wait.
#[derive(Debug, Clone)]
pub struct Wait {
    pub attempts: u32,
    pub delay: Duration,
    pub deadline: Option<Duration>,
}

impl Default for Wait {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY,
            deadline: None,
        }
    }
}

/// Standard condition: satisfied once the action stops failing
pub fn ready<E>(err: Option<&E>) -> bool {
    err.is_none()
}

/// Inverse condition: satisfied once the action starts failing
pub fn gone<E>(err: Option<&E>) -> bool {
    err.is_some()
}

impl Wait {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Poll `action` until `satisfied` accepts its outcome
    ///
    /// The predicate sees `None` when the action succeeded and `Some(err)`
    /// when it failed, so it can wait for success or for an expected error.
    /// Returns `Some(value)` when the terminating call succeeded, `None`
    /// when an expected error satisfied the predicate. Sleeps `delay`
    /// between non-terminal attempts.
    pub async fn until<T, E, F, Fut, C>(&self, mut action: F, satisfied: C) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        C: Fn(Option<&E>) -> bool,
        E: Display,
    {
        self.bounded(async {
            for attempt in 1..=self.attempts {
                match action().await {
                    Ok(value) => {
                        if satisfied(None) {
                            return Ok(Some(value));
                        }
                        tracing::trace!(attempt, "condition not met");
                    }
                    Err(err) => {
                        if satisfied(Some(&err)) {
                            return Ok(None);
                        }
                        tracing::trace!(%err, attempt, "condition not met");
                    }
                }
                if attempt < self.attempts {
                    sleep(self.delay).await;
                }
            }
            Err(ProvisionError::WaitTimeout {
                attempts: self.attempts,
            })
        })
        .await
    }

    /// Poll until the action succeeds, returning its value
    pub async fn until_ready<T, E, F, Fut>(&self, mut action: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        self.bounded(async {
            for attempt in 1..=self.attempts {
                match action().await {
                    Ok(value) => return Ok(value),
                    Err(err) => tracing::trace!(%err, attempt, "not ready"),
                }
                if attempt < self.attempts {
                    sleep(self.delay).await;
                }
            }
            Err(ProvisionError::WaitTimeout {
                attempts: self.attempts,
            })
        })
        .await
    }

    /// Poll until the action fails, treating the error as completion
    ///
    /// Used after delete/terminate calls, where not-found means done.
    pub async fn until_gone<T, E, F, Fut>(&self, mut action: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        self.bounded(async {
            for attempt in 1..=self.attempts {
                if let Err(err) = action().await {
                    tracing::trace!(%err, attempt, "resource gone");
                    return Ok(());
                }
                if attempt < self.attempts {
                    sleep(self.delay).await;
                }
            }
            Err(ProvisionError::WaitTimeout {
                attempts: self.attempts,
            })
        })
        .await
    }

    async fn bounded<T>(&self, poll: impl Future<Output = Result<T>>) -> Result<T> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, poll)
                .await
                .map_err(|_| ProvisionError::DeadlineExceeded)?,
            None => poll.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maestro_client::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast() -> Wait {
        Wait::new().attempts(5).delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_until_ready_after_transient_errors() {
        let calls = AtomicUsize::new(0);
        let value = fast()
            .until_ready(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ClientError::Remote("still starting".into()))
                    } else {
                        Ok(42u32)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_until_ready_exhausts_attempts() {
        let calls = AtomicUsize::new(0);
        let result = fast()
            .until_ready(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<u32, _>(ClientError::Remote("never ready".into())) }
            })
            .await;

        assert!(matches!(
            result,
            Err(ProvisionError::WaitTimeout { attempts: 5 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_until_gone_stops_on_first_error() {
        let calls = AtomicUsize::new(0);
        fast()
            .until_gone(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Ok("still here")
                    } else {
                        Err(ClientError::NotFound)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_until_with_custom_condition() {
        // waiting for a specific error class, not just any error
        let calls = AtomicUsize::new(0);
        let outcome = fast()
            .until(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        match n {
                            0 => Ok("present"),
                            1 => Err(ClientError::Remote("flaky".into())),
                            _ => Err(ClientError::NotFound),
                        }
                    }
                },
                |err| matches!(err, Some(ClientError::NotFound)),
            )
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_until_with_standard_conditions() {
        let satisfied = fast()
            .until(|| async { Ok::<_, ClientError>(7u32) }, ready)
            .await
            .unwrap();
        assert_eq!(satisfied, Some(7));

        let vanished = fast()
            .until(|| async { Err::<u32, _>(ClientError::NotFound) }, gone)
            .await
            .unwrap();
        assert_eq!(vanished, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bounds_total_wait() {
        let result = Wait::new()
            .attempts(30)
            .delay(Duration::from_secs(60))
            .deadline(Duration::from_secs(90))
            .until_ready(|| async { Err::<u32, _>(ClientError::Remote("stuck".into())) })
            .await;

        assert!(matches!(result, Err(ProvisionError::DeadlineExceeded)));
    }
}
