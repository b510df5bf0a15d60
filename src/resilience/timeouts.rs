//! Timeout enforcement.
//!
//! Every network step (connect, probe, operation) runs under a deadline.
//! An expired deadline becomes `ClientError::Timeout`, which counts as a
//! connection failure.

use std::future::Future;
use std::time::Duration;

use crate::net::connection::ClientError;

/// Run `fut` with a deadline, flattening the elapsed case into `ClientError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_becomes_timeout() {
        let limit = Duration::from_secs(2);
        let result: Result<(), _> = with_timeout(limit, std::future::pending()).await;
        assert_eq!(result, Err(ClientError::Timeout(limit)));
    }

    #[tokio::test]
    async fn test_inner_result_passes_through() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok::<_, ClientError>(7) }).await;
        assert_eq!(ok, Ok(7));

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(ClientError::Application("bad row".into()))
        })
        .await;
        assert_eq!(err, Err(ClientError::Application("bad row".into())));
    }
}
