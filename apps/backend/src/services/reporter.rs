//! Result reporting: persists finished games without ever blocking the player.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use mindmatch_core::{GameOutcome, Variant};
use uuid::Uuid;

use crate::db::Database;
use crate::error::Result;
use crate::models::{ProgressDetails, SaveStatus};

/// Finished game handed to the reporter.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub player_id: Uuid,
    pub activity_name: String,
    pub outcome: GameOutcome,
    pub variant: Variant,
    pub accuracy: f64,
}

impl GameReport {
    pub fn details(&self) -> ProgressDetails {
        ProgressDetails {
            achievement: self.outcome.achievement.clone(),
            completed_at: Utc::now(),
            game_type: "mind_match".to_string(),
            max_score: 100,
            variant: self.variant,
            accuracy: self.accuracy,
        }
    }
}

/// Persistence boundary. Implementations must be idempotent: the same report
/// may arrive more than once when a retry follows a slow success.
pub trait ResultReporter: Send + Sync {
    fn report(&self, report: &GameReport) -> impl Future<Output = Result<()>> + Send;
}

impl ResultReporter for Database {
    fn report(&self, report: &GameReport) -> impl Future<Output = Result<()>> + Send {
        let details = report.details();
        async move {
            self.upsert_progress(
                report.player_id,
                &report.activity_name,
                i32::from(report.outcome.score),
                &details,
            )
            .await?;
            Ok(())
        }
    }
}

/// Timeout and retry settings for one report.
#[derive(Debug, Clone)]
pub struct ReportPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first one.
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Deliver a report, translating the result into a save status.
///
/// Errors are logged here and go no further.
pub async fn report_with_policy<R: ResultReporter>(
    reporter: &R,
    report: &GameReport,
    policy: &ReportPolicy,
) -> SaveStatus {
    let attempts = policy.retries + 1;

    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.timeout, reporter.report(report)).await {
            Ok(Ok(())) => {
                tracing::info!(
                    player_id = %report.player_id,
                    score = report.outcome.score,
                    attempt,
                    "Saved game result"
                );
                return SaveStatus::Saved;
            }
            Ok(Err(e)) => {
                tracing::warn!(player_id = %report.player_id, attempt, "Failed to save game result: {}", e);
            }
            Err(_) => {
                tracing::warn!(
                    player_id = %report.player_id,
                    attempt,
                    timeout_ms = policy.timeout.as_millis() as u64,
                    "Saving game result timed out"
                );
            }
        }

        if attempt < attempts {
            tokio::time::sleep(policy.backoff * attempt).await;
        }
    }

    tracing::error!(player_id = %report.player_id, "Giving up on saving game result");
    SaveStatus::Failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use std::sync::atomic::{AtomicU32, Ordering};

    enum Behavior {
        FailFirst(u32),
        Hang,
    }

    struct FakeReporter {
        behavior: Behavior,
        calls: AtomicU32,
    }

    impl FakeReporter {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl ResultReporter for FakeReporter {
        fn report(&self, _report: &GameReport) -> impl Future<Output = Result<()>> + Send {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let result = match self.behavior {
                Behavior::FailFirst(n) if call <= n => {
                    Some(Err(ApiError::Database(sqlx::Error::PoolTimedOut)))
                }
                Behavior::FailFirst(_) => Some(Ok(())),
                Behavior::Hang => None,
            };
            async move {
                match result {
                    Some(r) => r,
                    None => std::future::pending().await,
                }
            }
        }
    }

    fn report() -> GameReport {
        GameReport {
            player_id: Uuid::nil(),
            activity_name: "mind_match_game".to_string(),
            outcome: GameOutcome {
                score: 100,
                achievement: Some("Brain Master".to_string()),
            },
            variant: Variant::DeferredEvaluation,
            accuracy: 1.0,
        }
    }

    fn fast_policy(retries: u32) -> ReportPolicy {
        ReportPolicy {
            timeout: Duration::from_millis(20),
            retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_saved_on_first_try() {
        let reporter = FakeReporter::new(Behavior::FailFirst(0));
        let status = report_with_policy(&reporter, &report(), &fast_policy(2)).await;
        assert_eq!(status, SaveStatus::Saved);
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_then_saved() {
        let reporter = FakeReporter::new(Behavior::FailFirst(2));
        let status = report_with_policy(&reporter, &report(), &fast_policy(2)).await;
        assert_eq!(status, SaveStatus::Saved);
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_after_retries() {
        let reporter = FakeReporter::new(Behavior::FailFirst(10));
        let status = report_with_policy(&reporter, &report(), &fast_policy(1)).await;
        assert_eq!(status, SaveStatus::Failed);
        assert_eq!(reporter.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let reporter = FakeReporter::new(Behavior::Hang);
        let status = report_with_policy(&reporter, &report(), &fast_policy(0)).await;
        assert_eq!(status, SaveStatus::Failed);
    }

    #[test]
    fn test_details_shape() {
        let details = report().details();
        assert_eq!(details.achievement.as_deref(), Some("Brain Master"));
        assert_eq!(details.game_type, "mind_match");
        assert_eq!(details.max_score, 100);
        assert_eq!(details.variant, Variant::DeferredEvaluation);
    }
}
