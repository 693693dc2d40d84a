//! Entry Expiration Task
//!
//! One lightweight task per scheduled deadline. Timers are driven by the
//! runtime's shared timer wheel; a pending timer is cancelled through the
//! entry's token, which is a child of its store's scope.

use std::sync::Weak;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::cache::{CacheStore, EntryId};

/// Spawns the task that expires entry `id` of `store` at `deadline`.
///
/// The task exits without touching the store when `token` is cancelled first,
/// when the store has been dropped, or when the store finds the token
/// cancelled once it holds the write lock. A deadline already in the past
/// fires on the next poll.
///
/// # Returns
/// A JoinHandle for the spawned task. Dropping it detaches the task.
pub(crate) fn spawn_expiration(
    store: Weak<CacheStore>,
    id: EntryId,
    deadline: Instant,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                trace!(?id, "Expiration timer cancelled");
                return;
            }
            _ = tokio::time::sleep_until(deadline) => {}
        }

        let Some(store) = store.upgrade() else {
            return;
        };
        if !store.expire(id, &token).await {
            trace!(store = store.name(), ?id, "Expiration timer was stale");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;

    async fn store_with(key: &str, ttl: Duration) -> (Arc<CacheStore>, CancellationToken) {
        let store = Arc::new(CacheStore::new("tasks"));
        store.add_entry(key, Bytes::from_static(b"v"), ttl).await;
        (store, CancellationToken::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_finishes_after_cancel() {
        let token = CancellationToken::new();
        let handle = spawn_expiration(
            Weak::new(),
            EntryId {
                index: 0,
                generation: 1,
            },
            Instant::now() + Duration::from_secs(3600),
            token.clone(),
        );

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_tolerates_dropped_store() {
        let (store, token) = store_with("k", Duration::from_secs(60)).await;
        let id = EntryId {
            index: 0,
            generation: 1,
        };
        let weak = Arc::downgrade(&store);
        drop(store);

        let handle = spawn_expiration(weak, id, Instant::now(), token);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_with_past_deadline_fires() {
        let (store, token) = store_with("k", Duration::from_secs(3600)).await;
        let id = EntryId {
            index: 0,
            generation: 1,
        };

        let past = Instant::now() - Duration::from_millis(10);
        spawn_expiration(Arc::downgrade(&store), id, past, token)
            .await
            .unwrap();

        assert!(store.is_empty().await);
    }
}
