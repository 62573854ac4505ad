//! Worker-per-backend fan-out with a join barrier.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use polytune_core::{Error, HttpError, Result};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Run `call` once per backend id on its own task and merge the results.
///
/// Failures and empty results are logged and absorbed; errors that are not
/// ordinary backend failures are logged as errors. Every task is joined
/// before this returns, so nothing outlives the call. Result order follows
/// task completion and is unspecified.
pub(crate) async fn fan_out<T, F, Fut>(
    backends: Vec<String>,
    timeout: Option<Duration>,
    call: F,
) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    let collected = Arc::new(Mutex::new(Vec::new()));
    let mut tasks = JoinSet::new();

    for backend in backends {
        let collected = Arc::clone(&collected);
        let fut = call(backend.clone());

        tasks.spawn(async move {
            match bounded(timeout, fut).await {
                Ok(items) if items.is_empty() => debug!("{backend}: no results"),
                Ok(items) => {
                    debug!("{backend}: {} result(s)", items.len());
                    collected.lock().extend(items);
                }
                Err(e) if e.is_unsupported() => debug!("{backend}: skipped ({e})"),
                Err(e) if e.is_skippable() => warn!("{backend}: {e}"),
                Err(e) => error!("{backend}: unexpected {e}"),
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("Backend task ended abnormally: {e}");
        }
    }

    let merged = std::mem::take(&mut *collected.lock());
    merged
}

/// Await `fut`, failing with a timeout error once `timeout` elapses.
pub(crate) async fn bounded<T>(
    timeout: Option<Duration>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Http(HttpError::Timeout))?,
        None => fut.await,
    }
}
