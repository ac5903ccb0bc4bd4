use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc,
    },
};

use crate::{
    utils::tracing::{instrument, trace},
    BoxError, Disposable, Error, Message, Observable, Subscriber,
};

impl<T: 'static> Observable<T> {
    /// Limits the amount of values sent by the source.
    ///
    /// After the `max`-th value the sink completes and the upstream subscription is disposed, so
    /// infinite sources stop producing.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let squares = Observable::counting().map(|n| n * n).take(4);
    ///
    /// assert_eq!(squares.to_list().unwrap(), [0, 1, 4, 9]);
    /// ```
    pub fn take(&self, max: usize) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |sink: Subscriber<T>| {
            instrument!(take, max);
            if max == 0 {
                sink.complete();
                return Disposable::empty();
            }
            let taken = AtomicUsize::new(0);
            let upstream = sink.link();
            source.subscribe_with(
                {
                    let upstream = upstream.clone();
                    move |message: Message<T>| match message {
                        Message::Next(value) => {
                            let taken = taken.fetch_add(1, AtomicOrdering::AcqRel) + 1;
                            if taken > max {
                                return;
                            }
                            sink.next(value);
                            if taken == max {
                                trace!("limit reached");
                                upstream.dispose();
                                sink.complete();
                            }
                        },
                        Message::Error(error) => sink.error(error),
                        Message::Complete => sink.complete(),
                    }
                }
                .into(),
                &upstream,
            );
            Disposable::empty()
        })
    }

    /// Sends values while `predicate` holds. The first value failing it is dropped, the sink
    /// completes and the upstream subscription is disposed.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::of([3, 5, 8, 9]).take_while(|x| x % 2 == 1);
    ///
    /// assert_eq!(source.to_list().unwrap(), [3, 5]);
    /// ```
    pub fn take_while<P>(&self, predicate: P) -> Observable<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_take_while(move |value| Ok::<_, Infallible>(predicate(value)))
    }

    /// Like [`take_while`](Observable::take_while) with a fallible predicate. The first `Err`
    /// ends the stream as [`Error::Operator`].
    pub fn try_take_while<E, P>(&self, predicate: P) -> Observable<T>
    where
        E: Into<BoxError>,
        P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::create(move |sink: Subscriber<T>| {
            let predicate = Arc::clone(&predicate);
            let upstream = sink.link();
            source.subscribe_with(
                {
                    let upstream = upstream.clone();
                    move |message: Message<T>| match message {
                        Message::Next(value) => match predicate(&value) {
                            Ok(true) => sink.next(value),
                            Ok(false) => {
                                upstream.dispose();
                                sink.complete();
                            },
                            Err(error) => {
                                upstream.dispose();
                                sink.error(Error::operator(error));
                            },
                        },
                        Message::Error(error) => sink.error(error),
                        Message::Complete => sink.complete(),
                    }
                }
                .into(),
                &upstream,
            );
            Disposable::empty()
        })
    }
}
