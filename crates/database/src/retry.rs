use configuration::RetryPolicy;
use std::future::Future;

/// Errors worth another attempt: the connection dropped or the pool was busy.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Protocol(_)
    )
}

/// Runs `op` until it succeeds, fails permanently, or `policy.attempts` is used up.
///
/// Between tries the task sleeps `delay_ms`, multiplied by `backoff` after each
/// failed retry.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut retry: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) && retry + 1 < policy.attempts => {
                let delay = policy.delay_for(retry);
                tracing::warn!(
                    operation,
                    attempt = retry + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient database error, retrying."
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            Err(err) => {
                tracing::error!(operation, error = %err, "Database operation failed.");
                return Err(err);
            }
        }
    }
}
