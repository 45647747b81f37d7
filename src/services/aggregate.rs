//! Concurrent fan-out of independent catalog reads
//!
//! Every lookup is polled concurrently inside the calling task. The first
//! failure ends the aggregate: lookups still in flight are dropped and their
//! outcomes never surface, successful or not.

use std::{future::Future, hash::Hash};

use futures::future::{try_join_all, BoxFuture};
use indexmap::IndexMap;

use crate::error::{AppError, AppResult};

/// A pending read producing one value of a keyed aggregate
pub type Lookup<'a, T> = BoxFuture<'a, AppResult<T>>;

fn log_failure(e: AppError) -> AppError {
    tracing::debug!(error = %e, "aggregate lookup failed");
    e
}

/// Run keyed lookups of one result type and collect them under their keys,
/// in the order given.
pub async fn keyed<K, T>(lookups: Vec<(K, Lookup<'_, T>)>) -> AppResult<IndexMap<K, T>>
where
    K: Hash + Eq,
{
    let (keys, pending): (Vec<K>, Vec<Lookup<'_, T>>) = lookups.into_iter().unzip();
    let values = try_join_all(pending).await.map_err(log_failure)?;
    Ok(keys.into_iter().zip(values).collect())
}

/// Two lookups of different types
pub async fn join2<A, B>(
    a: impl Future<Output = AppResult<A>>,
    b: impl Future<Output = AppResult<B>>,
) -> AppResult<(A, B)> {
    tokio::try_join!(a, b).map_err(log_failure)
}

/// Three lookups of different types
pub async fn join3<A, B, C>(
    a: impl Future<Output = AppResult<A>>,
    b: impl Future<Output = AppResult<B>>,
    c: impl Future<Output = AppResult<C>>,
) -> AppResult<(A, B, C)> {
    tokio::try_join!(a, b, c).map_err(log_failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_keyed_preserves_keys_and_order() {
        let lookups: Vec<(&str, Lookup<'_, i64>)> = vec![
            ("book_count", async { Ok::<_, AppError>(12) }.boxed()),
            ("author_count", async { Ok::<_, AppError>(4) }.boxed()),
        ];
        let results = keyed(lookups).await.unwrap();
        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec!["book_count", "author_count"]);
        assert_eq!(results["book_count"], 12);
        assert_eq!(results["author_count"], 4);
    }

    #[tokio::test]
    async fn test_keyed_first_failure_wins_without_waiting() {
        let lookups: Vec<(&str, Lookup<'_, i64>)> = vec![
            (
                "slow",
                async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<_, AppError>(1)
                }
                .boxed(),
            ),
            ("broken", async { Err::<i64, _>(AppError::Internal("count failed".to_string())) }.boxed()),
            ("stuck", futures::future::pending::<AppResult<i64>>().boxed()),
        ];

        let result = tokio::time::timeout(Duration::from_secs(1), keyed(lookups))
            .await
            .expect("aggregate waited on a lookup after a failure");

        match result {
            Err(AppError::Internal(msg)) => assert_eq!(msg, "count failed"),
            other => panic!("expected the failing lookup's error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_join3_surfaces_only_the_failure() {
        let result = join3(
            async { Ok::<_, AppError>("author") },
            async { Err::<Vec<i32>, _>(AppError::NotFound("genres".to_string())) },
            futures::future::pending::<AppResult<i64>>(),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "genres"));
    }

    #[tokio::test]
    async fn test_join2_returns_both_values() {
        let (a, b) = join2(async { Ok::<_, AppError>(1) }, async { Ok::<_, AppError>("two") }).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }
}
