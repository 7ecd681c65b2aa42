//! Single consumer delivery queue.
//!
//! Every mutation of translator state that follows an asynchronous step is
//! posted here and applied by one task, so sweeps never overlap. Sweep
//! requests are debounced: each request cancels the pending timer and starts
//! a new one, and only the surviving timer posts the sweep.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use glossa_service::TranslateError;
use glossa_types::TextSlots;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::accessor::TextAccessor;
use crate::element::ElementHandle;

pub(crate) enum Command<E> {
    Sweep,
    /// A fetch pipeline finished for `element`
    Resolved {
        element: ElementHandle,
        accessor: Arc<dyn TextAccessor<E>>,
        texts: TextSlots,
        /// Faded out before the fetch, so fade back in after injection
        faded: bool,
    },
    /// Model acquisition finished
    ModelReady(Result<(), TranslateError>),
}

pub(crate) trait QueueHandler<E>: Send + Sync + 'static {
    fn handle(&self, command: Command<E>);
}

pub(crate) struct DeliveryQueue<E> {
    tx: AsyncSender<Command<E>>,
    runtime: Handle,
    debounce: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<E: 'static> DeliveryQueue<E> {
    /// The queue task holds `handler` weakly and stops once it is dropped or
    /// every sender is gone.
    pub(crate) fn spawn<H>(runtime: Handle, handler: Weak<H>, debounce: Duration) -> Self
    where
        H: QueueHandler<E>,
    {
        let (tx, rx) = kanal::unbounded_async();
        runtime.spawn(drain(handler, rx));

        Self {
            tx,
            runtime,
            debounce,
            timer: Mutex::new(None),
        }
    }

    /// Restart the debounce timer
    pub(crate) fn request_sweep(&self) {
        let tx = self.tx.clone();
        let debounce = self.debounce;

        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = timer.take() {
            pending.abort();
        }
        *timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            if tx.send(Command::Sweep).await.is_err() {
                tracing::trace!("Sweep dropped, delivery queue closed");
            }
        }));
    }

    pub(crate) fn sender(&self) -> AsyncSender<Command<E>> {
        self.tx.clone()
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }
}

async fn drain<E, H>(handler: Weak<H>, rx: AsyncReceiver<Command<E>>)
where
    H: QueueHandler<E>,
{
    while let Ok(command) = rx.recv().await {
        let Some(handler) = handler.upgrade() else {
            break;
        };
        handler.handle(command);
    }

    tracing::debug!("Delivery queue stopped");
}
