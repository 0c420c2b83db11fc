use futures::Stream;
use serde::de::DeserializeOwned;
use sled::{Event, Tree};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

// A live query over a document or a parent's children. Updates arrive in
// server-assigned order until the subscriber cancels (or drops) the handle.
pub struct Subscription<T> {
    rx: async_channel::Receiver<T>,
    forwarder: JoinHandle<()>,
}

impl<T> Subscription<T>
where
    T: DeserializeOwned + Send + 'static,
{
    // watches a single document; the stream ends when the document is removed
    pub(crate) fn document(tree: &Tree, key: &[u8]) -> Self {
        Self::spawn(tree.watch_prefix(key), true)
    }

    // watches an append-only child collection under one parent key
    pub(crate) fn children(tree: &Tree, prefix: &[u8]) -> Self {
        Self::spawn(tree.watch_prefix(prefix), false)
    }

    fn spawn(mut events: sled::Subscriber, stop_on_remove: bool) -> Self {
        let (tx, rx) = async_channel::unbounded();

        let forwarder = tokio::spawn(async move {
            while let Some(event) = (&mut events).await {
                match event {
                    Event::Insert { value, .. } => {
                        let item: T = match serde_json::from_slice(&value) {
                            Ok(item) => item,
                            Err(err) => {
                                tracing::warn!("dropping undecodable update: {:?}", err);
                                continue;
                            }
                        };

                        if tx.send(item).await.is_err() {
                            break;
                        }
                    }
                    Event::Remove { .. } => {
                        if stop_on_remove {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, forwarder }
    }
}

impl<T> Subscription<T> {
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await.ok()
    }

    // stops delivery and releases the watch
    pub fn cancel(&self) {
        self.forwarder.abort();
        self.rx.close();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.forwarder.abort();
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.get_mut().rx).poll_next(cx)
    }
}
