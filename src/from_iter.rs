use crate::{
    utils::tracing::{instrument, trace},
    Disposable, Error, Observable, Sequence, Subscriber,
};

impl<T: 'static> Observable<T> {
    /// Bridges a [`Sequence`] into an event stream.
    ///
    /// Every subscription walks one fresh iteration, pushing each element and then completing.
    /// A failure to open or continue the iteration is delivered as an error instead. The walk
    /// stops as soon as the subscription is disposed, which makes infinite sequences usable with
    /// operators such as [`take`](Observable::take).
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::{Observable, Sequence};
    ///
    /// let source = Observable::from_sequence(Sequence::counting()).take(3);
    ///
    /// assert_eq!(source.to_list().unwrap(), [0, 1, 2]);
    /// ```
    pub fn from_sequence(sequence: Sequence<T>) -> Self {
        Observable::create(move |subscriber: Subscriber<T>| {
            instrument!(from_sequence);
            match sequence.iter() {
                Ok(mut iteration) => loop {
                    if subscriber.is_closed() {
                        trace!("disposed before the iteration ended");
                        break;
                    }
                    match iteration.next() {
                        Some(Ok(value)) => subscriber.next(value),
                        Some(Err(error)) => {
                            subscriber.error(error);
                            break;
                        },
                        None => {
                            subscriber.complete();
                            break;
                        },
                    }
                },
                Err(error) => subscriber.error(error),
            }
            Disposable::empty()
        })
    }

    /// Pushes every element of a cloneable iterable, then completes.
    pub fn of<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        I::IntoIter: 'static,
    {
        Observable::from_sequence(Sequence::of(iterable))
    }

    /// Completes without pushing anything.
    pub fn empty() -> Self {
        Observable::create(|subscriber: Subscriber<T>| {
            subscriber.complete();
            Disposable::empty()
        })
    }

    /// Never pushes and never terminates.
    pub fn never() -> Self {
        Observable::create(|_subscriber: Subscriber<T>| Disposable::empty())
    }

    /// Fails every subscription with `error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::{Error, Observable};
    ///
    /// let source = Observable::<u8>::throw(Error::stream("offline"));
    ///
    /// assert!(matches!(source.to_list(), Err(Error::Stream(_))));
    /// ```
    pub fn throw(error: Error) -> Self {
        Observable::create(move |subscriber: Subscriber<T>| {
            subscriber.error(error.clone());
            Disposable::empty()
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Pushes `value` once, then completes.
    pub fn just(value: T) -> Self {
        Observable::create(move |subscriber: Subscriber<T>| {
            subscriber.next(value.clone());
            subscriber.complete();
            Disposable::empty()
        })
    }
}

impl Observable<usize> {
    /// Pushes `0, 1, 2, ...` until disposed.
    pub fn counting() -> Self {
        Observable::from_sequence(Sequence::counting())
    }
}
