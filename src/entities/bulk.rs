//! Bounded fan-out for bulk import/export calls.

use anyhow::Result;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Run the given jobs with at most `connections` in flight at once.
///
/// Every job runs to completion even if an earlier one fails; the first
/// error observed is returned. The bound is opaque to callers above this
/// layer: orchestration stays strictly sequential.
pub(crate) async fn run<F>(connections: usize, jobs: Vec<F>) -> Result<()>
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(connections.max(1)));
    let mut handles = Vec::with_capacity(jobs.len());
    for job in jobs {
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire().await?;
            job.await
        }));
    }

    let mut first_err = None;
    for joined in join_all(handles).await {
        let result = match joined {
            Ok(r) => r,
            Err(e) => Err(anyhow::Error::new(e)),
        };
        if let Err(e) = result {
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
