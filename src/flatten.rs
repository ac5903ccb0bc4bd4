use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    utils::{
        sync::lock,
        tracing::{instrument, trace},
    },
    Disposable, Error, Message, Observable, Observer, Subscriber,
};

impl<T: 'static> Observable<Observable<T>> {
    /// Flattens a higher-order event stream sequentially.
    ///
    /// Inner streams are subscribed one at a time, strictly in the order the outer stream emitted
    /// them; an inner stream arriving while another one is active waits in a queue. The result
    /// completes once the outer stream and every inner stream have completed. The first error from
    /// any of them ends the result: queued inner streams are dropped without being subscribed.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::of("hi".chars())
    ///     .map(|c| Observable::of([10, 20, 30]).map(move |n| format!("{c}{n}")))
    ///     .flatten();
    ///
    /// assert_eq!(
    ///     source.to_list().unwrap(),
    ///     ["h10", "h20", "h30", "i10", "i20", "i30"]
    /// );
    /// ```
    pub fn flatten(&self) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |sink: Subscriber<T>| {
            instrument!(flatten);
            let outer = sink.link();
            let engine = Arc::new(Flatten {
                sink: sink.clone(),
                outer: outer.clone(),
                state: Mutex::new(State::default()),
            });
            sink.subscription().add(Disposable::new({
                let engine = Arc::downgrade(&engine);
                move || {
                    if let Some(engine) = engine.upgrade() {
                        engine.cancel();
                    }
                }
            }));
            source.subscribe_with(
                (move |message: Message<Observable<T>>| match message {
                    Message::Next(inner) => engine.push(inner),
                    Message::Error(error) => engine.outer_error(error),
                    Message::Complete => engine.outer_complete(),
                })
                .into(),
                &outer,
            );
            Disposable::empty()
        })
    }
}

impl<T: 'static> Observable<T> {
    /// Maps every value to an event stream and concatenates them with
    /// [`flatten`](Observable::flatten).
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::of([1, 2, 3]).flat_map(|n| Observable::of(vec![n; n]));
    ///
    /// assert_eq!(source.to_list().unwrap(), [1, 2, 2, 3, 3, 3]);
    /// ```
    pub fn flat_map<U: 'static, F>(&self, f: F) -> Observable<U>
    where
        F: Fn(T) -> Observable<U> + Send + Sync + 'static,
    {
        self.map(f).flatten()
    }
}

/// State of one flatten subscription.
///
/// Whether a terminal signal went downstream is tracked by the sink's own subscription, which lets
/// at most one through.
struct Flatten<T> {
    sink: Subscriber<T>,
    outer: Disposable,
    state: Mutex<State<T>>,
}

struct State<T> {
    /// Inner streams received but not yet subscribed, in arrival order.
    pending: VecDeque<Observable<T>>,
    /// Subscription of the inner stream currently running.
    active: Option<Disposable>,
    outer_complete: bool,
    /// Set while [`Flatten::drain`] is subscribing to an inner stream on some stack frame.
    draining: bool,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        State {
            pending: VecDeque::new(),
            active: None,
            outer_complete: false,
            draining: false,
        }
    }
}

impl<T: 'static> Flatten<T> {
    fn push(self: &Arc<Self>, inner: Observable<T>) {
        if self.sink.is_closed() {
            return;
        }
        {
            let mut state = lock(&self.state);
            state.pending.push_back(inner);
            trace!(pending = state.pending.len(), "inner stream queued");
        }
        self.drain();
    }

    /// Starts queued inner streams until one stays active, the queue runs dry or the sink closes.
    ///
    /// Inner streams completing synchronously return here instead of recursing, so a long run of
    /// them does not grow the stack.
    fn drain(self: &Arc<Self>) {
        loop {
            let (inner, subscription) = {
                let mut state = lock(&self.state);
                if state.draining || state.active.is_some() {
                    return;
                }
                if self.sink.is_closed() {
                    let pending = std::mem::take(&mut state.pending);
                    drop(state);
                    drop(pending);
                    return;
                }
                match state.pending.pop_front() {
                    Some(inner) => {
                        let subscription = Disposable::empty();
                        state.active = Some(subscription.clone());
                        state.draining = true;
                        (inner, subscription)
                    },
                    None => {
                        let finished = state.outer_complete;
                        drop(state);
                        if finished {
                            trace!("outer and inner streams completed");
                            self.sink.complete();
                        }
                        return;
                    },
                }
            };
            trace!("subscribing to inner stream");
            inner.subscribe_with(self.inner_observer(&subscription), &subscription);
            lock(&self.state).draining = false;
        }
    }

    fn inner_observer(self: &Arc<Self>, subscription: &Disposable) -> Observer<T> {
        let engine = Arc::clone(self);
        let subscription = subscription.clone();
        (move |message: Message<T>| match message {
            Message::Next(value) => engine.sink.next(value),
            Message::Error(error) => engine.inner_error(error),
            Message::Complete => engine.inner_complete(&subscription),
        })
        .into()
    }

    fn inner_complete(self: &Arc<Self>, subscription: &Disposable) {
        {
            let mut state = lock(&self.state);
            match &state.active {
                Some(active) if active.ptr_eq(subscription) => state.active = None,
                _ => return,
            }
        }
        trace!("inner stream completed");
        self.drain();
    }

    fn inner_error(&self, error: Error) {
        trace!("inner stream failed");
        self.sink.error(error);
        let pending = {
            let mut state = lock(&self.state);
            state.active = None;
            std::mem::take(&mut state.pending)
        };
        drop(pending);
        self.outer.dispose();
    }

    fn outer_complete(&self) {
        let finished = {
            let mut state = lock(&self.state);
            state.outer_complete = true;
            !state.draining && state.active.is_none() && state.pending.is_empty()
        };
        trace!(finished, "outer stream completed");
        if finished {
            self.sink.complete();
        }
    }

    fn outer_error(&self, error: Error) {
        trace!("outer stream failed");
        self.sink.error(error);
        self.cancel();
    }

    /// Drops queued inner streams and disposes the running ones without signalling downstream.
    fn cancel(&self) {
        let (pending, active) = {
            let mut state = lock(&self.state);
            (std::mem::take(&mut state.pending), state.active.take())
        };
        drop(pending);
        self.outer.dispose();
        if let Some(active) = active {
            active.dispose();
        }
    }
}
