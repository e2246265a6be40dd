//! Per-adapter connection lifecycle.

use std::fmt::Display;

use chrono::Utc;
use pos_bridge_core::{ConnectionStatus, RateLimitInfo};
use tokio::sync::{Mutex, RwLock};

/// Connection status guarded for concurrent callers.
///
/// `connect` and `disconnect` serialize on the lifecycle lock so at most one
/// handshake is in flight per adapter; status reads never wait on it.
#[derive(Debug, Default)]
pub struct ConnectionState {
    status: RwLock<ConnectionStatus>,
    lifecycle: Mutex<()>,
}

impl ConnectionState {
    /// Current status.
    pub async fn snapshot(&self) -> ConnectionStatus {
        self.status.read().await.clone()
    }

    /// Whether the last handshake succeeded and no disconnect followed.
    pub async fn is_connected(&self) -> bool {
        self.status.read().await.is_connected
    }

    /// Run `handshake` unless already connected, recording the outcome.
    ///
    /// # Errors
    ///
    /// Returns the handshake error; the status keeps its message in
    /// `connection_error`.
    pub async fn connect_with<F, Fut, E>(&self, handshake: F) -> Result<ConnectionStatus, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let _guard = self.lifecycle.lock().await;

        if self.status.read().await.is_connected {
            return Ok(self.snapshot().await);
        }

        self.status.write().await.last_connection_attempt = Some(Utc::now());

        match handshake().await {
            Ok(()) => {
                let mut status = self.status.write().await;
                status.is_connected = true;
                status.last_successful_connection = Some(Utc::now());
                status.connection_error = None;
                Ok(status.clone())
            }
            Err(error) => {
                let mut status = self.status.write().await;
                status.is_connected = false;
                status.connection_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Mark the adapter disconnected. Idempotent.
    pub async fn disconnect(&self) -> ConnectionStatus {
        let _guard = self.lifecycle.lock().await;
        let mut status = self.status.write().await;
        status.is_connected = false;
        status.clone()
    }

    /// Store the latest vendor rate-limit headers.
    pub async fn record_rate_limit(&self, info: Option<RateLimitInfo>) {
        if info.is_some() {
            self.status.write().await.rate_limit_info = info;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_connect_records_success() {
        let state = ConnectionState::default();
        let status = state.connect_with(|| async { Ok::<_, String>(()) }).await.unwrap();
        assert!(status.is_connected);
        assert!(status.last_successful_connection.is_some());
        assert!(status.connection_error.is_none());
    }

    #[tokio::test]
    async fn test_connect_failure_keeps_message() {
        let state = ConnectionState::default();
        let err = state
            .connect_with(|| async { Err::<(), _>("bad credentials".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "bad credentials");

        let status = state.snapshot().await;
        assert!(!status.is_connected);
        assert!(status.last_connection_attempt.is_some());
        assert_eq!(status.connection_error.as_deref(), Some("bad credentials"));
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let state = Arc::new(ConnectionState::default());
        let handshakes = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let state = Arc::clone(&state);
            let handshakes = Arc::clone(&handshakes);
            tasks.push(tokio::spawn(async move {
                state
                    .connect_with(|| async {
                        handshakes.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, String>(())
                    })
                    .await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().unwrap().is_connected);
        }
        assert_eq!(handshakes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disconnect_twice() {
        let state = ConnectionState::default();
        state.connect_with(|| async { Ok::<_, String>(()) }).await.unwrap();
        assert!(!state.disconnect().await.is_connected);
        assert!(!state.disconnect().await.is_connected);
        assert!(!state.is_connected().await);
    }
}
