use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc,
    },
};

use crate::{BoxError, Disposable, Error, Message, Observable, Subscriber};

impl<T: 'static> Observable<T> {
    /// Applies a transformation on every value passing through.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::of(["apple", "fig"]).map(str::len);
    ///
    /// assert_eq!(source.to_list().unwrap(), [5, 3]);
    /// ```
    pub fn map<U: 'static, F>(&self, f: F) -> Observable<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.map_indexed(move |value, _| f(value))
    }

    /// Like [`map`](Observable::map), also passing the 0-based position within the subscription.
    pub fn map_indexed<U: 'static, F>(&self, f: F) -> Observable<U>
    where
        F: Fn(T, usize) -> U + Send + Sync + 'static,
    {
        self.try_map_indexed(move |value, index| Ok::<_, Infallible>(f(value, index)))
    }

    /// Applies a fallible transformation.
    ///
    /// The first `Err` is delivered downstream as [`Error::Operator`] and the upstream subscription
    /// is disposed, so no value follows it.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::{Error, Observable};
    ///
    /// let source = Observable::of(["7", "eight", "9"]).try_map(|s| s.parse::<u8>());
    ///
    /// assert!(matches!(source.to_list(), Err(Error::Operator(_))));
    /// ```
    pub fn try_map<U: 'static, E, F>(&self, f: F) -> Observable<U>
    where
        E: Into<BoxError>,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    {
        self.try_map_indexed(move |value, _| f(value))
    }

    fn try_map_indexed<U: 'static, E, F>(&self, f: F) -> Observable<U>
    where
        E: Into<BoxError>,
        F: Fn(T, usize) -> Result<U, E> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::create(move |sink: Subscriber<U>| {
            let f = Arc::clone(&f);
            let index = AtomicUsize::new(0);
            let upstream = sink.link();
            source.subscribe_with(
                {
                    let upstream = upstream.clone();
                    move |message: Message<T>| match message {
                        Message::Next(value) => {
                            let index = index.fetch_add(1, AtomicOrdering::AcqRel);
                            match f(value, index) {
                                Ok(value) => sink.next(value),
                                Err(error) => {
                                    upstream.dispose();
                                    sink.error(Error::operator(error));
                                },
                            }
                        },
                        Message::Error(error) => sink.error(error),
                        Message::Complete => sink.complete(),
                    }
                }
                .into(),
                &upstream,
            );
            // upstream is already tied to the sink's subscription
            Disposable::empty()
        })
    }
}
