// ── Reactive streams ──
//
// Replay-latest broadcast for datasets and fetch status, plus the
// single-slot event channel used for fetch-failure notifications.

mod event;

use std::sync::{Arc, Weak};

use futures_core::Stream;
use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

pub use event::EventSlot;

/// Producer side of a replay-latest broadcast.
///
/// Holds the latest value and an explicit subscriber list. Every
/// [`publish`](Self::publish) is queued to every live subscriber, so
/// observers see each value exactly once and in order (no conflation).
/// Cheaply cloneable; clones share the same subscriber list.
pub struct Observable<T: Clone + Send + Sync + 'static> {
    shared: Arc<Mutex<Shared<T>>>,
}

/// Derived-stream hook. Returns `false` once the derived stream is gone.
type Derive<T> = Box<dyn FnMut(&T) -> bool + Send>;

struct Shared<T> {
    latest: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    derived: Vec<Derive<T>>,
}

impl<T: Clone> Shared<T> {
    fn publish(&mut self, value: T) {
        self.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        self.derived.retain_mut(|hook| hook(&value));
        self.latest = value;
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                latest: initial,
                subscribers: Vec::new(),
                derived: Vec::new(),
            })),
        }
    }

    /// Store `value` as the latest and push it to every subscriber.
    ///
    /// Derived streams are updated before this returns. Subscribers whose
    /// [`Subscription`] was dropped are pruned here.
    pub fn publish(&self, value: T) {
        self.shared.lock().publish(value);
    }

    /// Publish only if `value` differs from the latest. Returns `true` if sent.
    pub fn publish_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        let mut shared = self.shared.lock();
        if shared.latest == value {
            return false;
        }
        shared.publish(value);
        true
    }

    /// The latest published value.
    pub fn get(&self) -> T {
        self.shared.lock().latest.clone()
    }

    /// Register a new subscriber.
    ///
    /// The latest value is captured under the same lock that registers the
    /// queue, so nothing published afterwards can be missed.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut shared = self.shared.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        shared.subscribers.push(tx);
        Subscription::new(shared.latest.clone(), rx, Arc::downgrade(&self.shared))
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut shared = self.shared.lock();
        shared.subscribers.retain(|tx| !tx.is_closed());
        shared.subscribers.len()
    }

    /// Derive a new observable through `f`.
    ///
    /// The derived value is computed inside [`publish`](Self::publish), so it
    /// never lags the source. Updates stop once `cancel` fires or the
    /// returned observable is dropped.
    pub fn project<U, F>(&self, f: F, cancel: CancellationToken) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        derive(&self.shared, f, cancel)
    }
}

fn derive<T, U, F>(
    source: &Arc<Mutex<Shared<T>>>,
    f: F,
    cancel: CancellationToken,
) -> Observable<U>
where
    T: Clone + Send + Sync + 'static,
    U: Clone + Send + Sync + 'static,
    F: Fn(&T) -> U + Send + 'static,
{
    let mut source = source.lock();
    let out = Observable::new(f(&source.latest));
    let sink = Arc::downgrade(&out.shared);

    source.derived.push(Box::new(move |value| {
        if cancel.is_cancelled() {
            return false;
        }
        let Some(sink) = sink.upgrade() else {
            return false;
        };
        sink.lock().publish(f(value));
        true
    }));

    out
}

impl<T: Clone + Send + Sync + 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A subscription to an [`Observable`].
///
/// Provides point-in-time access to the value replayed at subscription,
/// and ordered change notification via [`changed()`](Self::changed) or by
/// converting to a `Stream`. Dropping the subscription unsubscribes.
pub struct Subscription<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: mpsc::UnboundedReceiver<T>,
    source: Weak<Mutex<Shared<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    fn new(
        current: T,
        receiver: mpsc::UnboundedReceiver<T>,
        source: Weak<Mutex<Shared<T>>>,
    ) -> Self {
        Self {
            current,
            receiver,
            source,
        }
    }

    /// The most recently observed value (replayed at creation, then updated
    /// by `changed()` / `latest()`).
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Skip over queued values and return the newest one.
    pub fn latest(&mut self) -> &T {
        while let Ok(value) = self.receiver.try_recv() {
            self.current = value;
        }
        &self.current
    }

    /// Wait for the next value.
    /// Returns `None` once every producer handle has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        let value = self.receiver.recv().await?;
        self.current = value.clone();
        Some(value)
    }

    /// Take the next queued value without waiting.
    pub fn try_changed(&mut self) -> Option<T> {
        let value = self.receiver.try_recv().ok()?;
        self.current = value.clone();
        Some(value)
    }

    /// Convert into a `Stream` that yields the current value first, then
    /// every subsequent update.
    pub fn into_stream(self) -> impl Stream<Item = T> + Send + 'static {
        futures_util::stream::iter(std::iter::once(self.current))
            .chain(UnboundedReceiverStream::new(self.receiver))
    }

    /// Derive an observable from the producer behind this subscription.
    ///
    /// Same semantics as [`Observable::project`]. If the producer is already
    /// gone the result holds `f(current)` and never changes.
    pub fn project<U, F>(&self, f: F, cancel: CancellationToken) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        match self.source.upgrade() {
            Some(source) => derive(&source, f, cancel),
            None => Observable::new(f(&self.current)),
        }
    }
}
