use std::{fmt, ops::Deref, sync::Arc};

use crate::{
    utils::tracing::{instrument, trace},
    Disposable, Error,
};

/// A signal delivered to an [`Observer`].
///
/// An observer receives zero or more `Next` values, followed by at most one `Error` or
/// `Complete`.
#[derive(Clone, Debug)]
pub enum Message<T> {
    Next(T),
    Error(Error),
    Complete,
}

impl<T> Message<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Message::Next(_))
    }
}

/// A three-channel sink: next value, error and completion, all funnelled through one function.
pub struct Observer<T>(ObserverFn<T>);

pub type ObserverFn<T> = Box<dyn Fn(Message<T>) + Send + Sync>;

impl<T: 'static> Observer<T> {
    /// Builds an observer from one handler per channel.
    pub fn new<N, E, C>(on_next: N, on_error: E, on_complete: C) -> Self
    where
        N: Fn(T) + Send + Sync + 'static,
        E: Fn(Error) + Send + Sync + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        Observer(Box::new(move |message| match message {
            Message::Next(value) => on_next(value),
            Message::Error(error) => on_error(error),
            Message::Complete => on_complete(),
        }))
    }
}

impl<T> Deref for Observer<T> {
    type Target = ObserverFn<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observer<{}>", std::any::type_name::<T>())
    }
}

impl<T, F: 'static> From<F> for Observer<T>
where
    F: Fn(Message<T>) + Send + Sync,
{
    fn from(handler: F) -> Self {
        Observer(Box::new(handler))
    }
}

/// The producer side of one subscription.
///
/// Values pushed after the subscription is disposed, or after a terminal signal, are dropped. The
/// first terminal signal closes the subscription and then releases everything attached to it.
pub struct Subscriber<T> {
    observer: Arc<Observer<T>>,
    subscription: Disposable,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Subscriber {
            observer: Arc::clone(&self.observer),
            subscription: self.subscription.clone(),
        }
    }
}

impl<T> Subscriber<T> {
    pub(crate) fn new(observer: Observer<T>, subscription: Disposable) -> Self {
        Subscriber {
            observer: Arc::new(observer),
            subscription,
        }
    }

    pub fn next(&self, value: T) {
        if !self.subscription.is_disposed() {
            (self.observer)(Message::Next(value));
        }
    }

    pub fn error(&self, error: Error) {
        self.terminate(Message::Error(error));
    }

    pub fn complete(&self) {
        self.terminate(Message::Complete);
    }

    /// Forwards any message, applying the same delivery rules as the dedicated methods.
    pub fn send(&self, message: Message<T>) {
        match message {
            Message::Next(value) => self.next(value),
            message => self.terminate(message),
        }
    }

    /// Whether further values would be dropped.
    ///
    /// Producers that loop (such as [`Observable::counting`]) must check this between values.
    pub fn is_closed(&self) -> bool {
        self.subscription.is_disposed()
    }

    /// The handle disposed when the consumer cancels.
    pub fn subscription(&self) -> &Disposable {
        &self.subscription
    }

    /// A fresh handle that is disposed together with this subscription.
    ///
    /// Operators subscribe upstream with such a handle so that cancelling downstream during a
    /// synchronous emission reaches the producer before `subscribe` returns.
    pub fn link(&self) -> Disposable {
        let upstream = Disposable::empty();
        self.subscription.add(upstream.clone());
        upstream
    }

    fn terminate(&self, message: Message<T>) {
        if self.subscription.close() {
            trace!("terminal signal delivered");
            (self.observer)(message);
            self.subscription.release();
        }
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("closed", &self.is_closed())
            .finish()
    }
}

type SubscribeFn<T> = dyn Fn(Subscriber<T>) -> Disposable + Send + Sync;

/// A push-based event stream: a function from a [`Subscriber`] to a [`Disposable`].
///
/// Every call to [`subscribe`](Observable::subscribe) starts an independent push on the calling
/// thread. There is no state shared between subscriptions.
///
/// # Examples
///
/// ```
/// use crossbeam_queue::SegQueue;
/// use std::sync::Arc;
///
/// use seqflow::{Disposable, Observable};
///
/// let actual = Arc::new(SegQueue::new());
///
/// let source = Observable::create(|subscriber| {
///     subscriber.next(1);
///     subscriber.next(2);
///     subscriber.complete();
///     Disposable::empty()
/// });
///
/// source.map(|x| x * 10).for_each({
///     let actual = Arc::clone(&actual);
///     move |x| actual.push(x)
/// });
///
/// assert_eq!(actual.pop(), Some(10));
/// assert_eq!(actual.pop(), Some(20));
/// assert_eq!(actual.pop(), None);
/// ```
pub struct Observable<T>(Arc<SubscribeFn<T>>);

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Observable(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observable<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Observable<T> {
    /// Wraps a subscribe function.
    ///
    /// The function runs synchronously inside every [`subscribe`](Observable::subscribe) call. It
    /// may push values before returning, or keep the [`Subscriber`] and push later from elsewhere.
    /// The returned [`Disposable`] is disposed when the consumer cancels or the subscription ends.
    pub fn create<F>(subscribe: F) -> Self
    where
        F: Fn(Subscriber<T>) -> Disposable + Send + Sync + 'static,
    {
        Observable(Arc::new(subscribe))
    }

    /// Starts a new subscription and returns its cancellation handle.
    pub fn subscribe<O>(&self, observer: O) -> Disposable
    where
        O: Into<Observer<T>>,
    {
        let subscription = Disposable::empty();
        self.subscribe_with(observer.into(), &subscription);
        subscription
    }

    /// Subscribes using an existing handle as the subscription.
    pub(crate) fn subscribe_with(&self, observer: Observer<T>, subscription: &Disposable) {
        instrument!(subscribe);
        trace!("subscribing");
        let teardown = (self.0)(Subscriber::new(observer, subscription.clone()));
        subscription.add(teardown);
    }
}
