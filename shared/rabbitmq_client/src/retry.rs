use std::{fmt::Display, future::Future, time::Duration};

///
/// Run async function in a loop until it returns Ok
///
pub async fn retry<F, Fut, T, E>(retry_interval: Duration, action: &'static str, async_fn: F) -> T
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        tracing::info!(attempt, "{action}");
        match async_fn().await {
            Ok(output) => return output,
            Err(err) => tracing::warn!(attempt, %err, "{action} failed"),
        }

        tokio::time::sleep(retry_interval).await;
    }
}
