//! Subscription tasks
//!
//! Every live listener is drained by its own task. The task owns the
//! [`Listener`]; tearing the subscription down cancels the task, which drops
//! the listener and thereby unsubscribes it at the store.
//!
//! ```text
//! store.listen() ─▶ Listener ─▶ task ─▶ on_push(snapshot) ─▶ mirror + router
//!                                  ▲
//!          Subscription::cancel() ─┘
//! ```

use crate::store::{Listener, Snapshot};
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle on a running subscription task
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct Subscription {
    name: &'static str,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Spawn a task with its own cancellation token
    pub fn spawn<F, Fut>(name: &'static str, task: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(task(token.clone()));
        tracing::debug!(subscription = %name, "Subscription started");
        Self {
            name,
            token,
            handle,
        }
    }

    /// Mirror a listener: every successful push goes to `on_push`
    ///
    /// A listener error is logged and ends the subscription; the mirror keeps
    /// its last state until a new subscription succeeds.
    pub fn mirror<F>(name: &'static str, mut listener: Listener, mut on_push: F) -> Self
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        Self::spawn(name, move |token| async move {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    next = listener.next() => next,
                };
                match next {
                    Some(Ok(snapshot)) => {
                        if token.is_cancelled() {
                            break;
                        }
                        on_push(snapshot);
                    }
                    Some(Err(e)) => {
                        tracing::error!(subscription = %name, error = %e, "Subscription failed, mirror no longer updating");
                        break;
                    }
                    None => break,
                }
            }
            tracing::debug!(subscription = %name, "Subscription ended");
        })
    }

    /// Whether the task is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!(subscription = %self.name, "Subscription cancelled");
        }
        self.token.cancel();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_mirror_applies_pushes_until_error() {
        let (sink, listener) = Listener::channel();
        let pushes = Arc::new(AtomicUsize::new(0));
        let counter = pushes.clone();
        let sub = Subscription::mirror("test", listener, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sink.send(Ok(Vec::new()));
        sink.send(Ok(Vec::new()));
        sink.send(Err(StoreError::unavailable("gone")));
        sink.send(Ok(Vec::new()));

        tokio::time::timeout(Duration::from_secs(2), async {
            while sub.is_running() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(pushes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes_listener() {
        let (sink, listener) = Listener::channel();
        let sub = Subscription::mirror("test", listener, |_| {});
        drop(sub);

        tokio::time::timeout(Duration::from_secs(2), async {
            while !sink.is_closed() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }
}
