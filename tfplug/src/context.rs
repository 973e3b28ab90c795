//! Request-scoped cancellation and deadlines
//!
//! Every trait method receives a Context as its first parameter. The host
//! cancels it when the operation is abandoned or its deadline passes.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time;

/// Context carries the cancellation signal and optional deadline of one operation
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    deadline: Option<Instant>,
    done: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
}

impl Context {
    pub fn new() -> Self {
        let (done_tx, done_rx) = watch::channel(false);

        Self {
            inner: Arc::new(ContextInner {
                deadline: None,
                done: done_rx,
                done_tx,
            }),
        }
    }

    /// Derives a child context that is cancelled when the timeout elapses or
    /// when this context is cancelled, whichever happens first.
    /// Must be called from within a tokio runtime.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let mut deadline = Instant::now() + timeout;
        if let Some(parent) = self.inner.deadline {
            deadline = deadline.min(parent);
        }

        let (done_tx, done_rx) = watch::channel(*self.inner.done.borrow());

        let child_tx = done_tx.clone();
        let mut parent_done = self.inner.done.clone();
        tokio::spawn(async move {
            let parent_cancelled = async {
                loop {
                    if *parent_done.borrow_and_update() {
                        return;
                    }
                    if parent_done.changed().await.is_err() {
                        // Parent dropped without cancelling; only the deadline remains
                        std::future::pending::<()>().await;
                    }
                }
            };

            tokio::select! {
                _ = time::sleep_until(deadline.into()) => {}
                _ = parent_cancelled => {}
                _ = child_tx.closed() => return,
            }
            let _ = child_tx.send(true);
        });

        Self {
            inner: Arc::new(ContextInner {
                deadline: Some(deadline),
                done: done_rx,
                done_tx,
            }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.done.borrow()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Time left before the deadline, None when there is no deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.inner
            .deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Resolves once the context is cancelled
    pub async fn cancelled(&self) {
        let mut done = self.inner.done.clone();
        loop {
            if *done.borrow_and_update() {
                return;
            }
            if done.changed().await.is_err() {
                // The sender lives in ContextInner, so this only happens on teardown
                std::future::pending::<()>().await;
            }
        }
    }

    pub fn cancel(&self) {
        let _ = self.inner.done_tx.send(true);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn context_timeout_cancels() {
        let ctx = Context::new().with_timeout(Duration::from_millis(50));

        assert!(!ctx.is_cancelled());

        sleep(Duration::from_millis(120)).await;

        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn context_manual_cancel() {
        let ctx = Context::new();

        assert!(!ctx.is_cancelled());

        ctx.cancel();

        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn context_deadline() {
        let ctx = Context::new();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());

        let ctx_with_timeout = ctx.with_timeout(Duration::from_secs(1));
        assert!(ctx_with_timeout.deadline().is_some());
        assert!(ctx_with_timeout.remaining().unwrap() <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn child_is_cancelled_with_parent() {
        let parent = Context::new();
        let child = parent.clone().with_timeout(Duration::from_secs(60));

        parent.cancel();

        tokio::time::timeout(Duration::from_secs(1), child.cancelled())
            .await
            .expect("child should observe parent cancellation");
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn child_deadline_never_exceeds_parent() {
        let parent = Context::new().with_timeout(Duration::from_millis(100));
        let child = parent.clone().with_timeout(Duration::from_secs(60));

        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_cancelled() {
        let ctx = Context::new();
        ctx.cancel();

        tokio::time::timeout(Duration::from_millis(100), ctx.cancelled())
            .await
            .expect("already cancelled");
    }
}
