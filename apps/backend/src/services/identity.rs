//! Identity lookup with bounded retry.

use std::future::Future;

use mindmatch_core::{GatePolicy, IdentityLookup};

use crate::db::Database;
use crate::error::Result;
use crate::models::Player;

/// Resolves a bearer token to a player.
///
/// `Ok(None)` means the token is unknown; `Err` means the lookup itself
/// failed and may be retried.
pub trait IdentityProvider: Send + Sync {
    fn lookup(&self, token: &str) -> impl Future<Output = Result<Option<Player>>> + Send;
}

impl IdentityProvider for Database {
    fn lookup(&self, token: &str) -> impl Future<Output = Result<Option<Player>>> + Send {
        self.get_player_by_token(token)
    }
}

/// Look up the caller, retrying transient failures per the gate policy.
pub async fn resolve_identity<P: IdentityProvider>(
    provider: &P,
    token: Option<&str>,
    policy: &GatePolicy,
) -> IdentityLookup<Player> {
    let Some(token) = token else {
        return IdentityLookup::Absent;
    };

    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        match provider.lookup(token).await {
            Ok(Some(player)) => return IdentityLookup::Present(player),
            Ok(None) => return IdentityLookup::Absent,
            Err(e) => {
                tracing::warn!(attempt, max_attempts = attempts, "Identity lookup failed: {}", e);
                if attempt < attempts {
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
        }
    }

    IdentityLookup::Unavailable
}
