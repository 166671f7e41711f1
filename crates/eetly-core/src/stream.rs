// ── Reactive snapshot stream ──
//
// Subscription type for consuming published snapshots from the
// SnapshotStore.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::Published;

/// A subscription to published snapshots.
///
/// Provides point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct SnapshotStream {
    current: Option<Published>,
    receiver: watch::Receiver<Option<Published>>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<Option<Published>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot seen at creation or at the last `changed()`.
    pub fn current(&self) -> Option<&Published> {
        self.current.as_ref()
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Option<Published> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publication.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Published> {
        loop {
            self.receiver.changed().await.ok()?;
            let next = self.receiver.borrow_and_update().clone();
            if let Some(published) = next {
                self.current = Some(published.clone());
                return Some(published);
            }
        }
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// Yields the current snapshot first if one exists.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SnapshotWatchStream {
    inner: WatchStream<Option<Published>>,
}

impl Stream for SnapshotWatchStream {
    type Item = Published;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(published))) => return Poll::Ready(Some(published)),
                Poll::Ready(Some(None)) => {}
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
