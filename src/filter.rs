use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc,
    },
};

use crate::{BoxError, Disposable, Error, Message, Observable, Subscriber};

impl<T: 'static> Observable<T> {
    /// Only lets through values that pass `predicate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::of(1..=6).filter(|x| x % 3 == 0);
    ///
    /// assert_eq!(source.to_list().unwrap(), [3, 6]);
    /// ```
    pub fn filter<P>(&self, predicate: P) -> Observable<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_indexed(move |value, _| predicate(value))
    }

    /// Like [`filter`](Observable::filter); the index counts every value seen, kept or not.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let every_other = Observable::of(["a", "b", "c", "d"]).filter_indexed(|_, i| i % 2 == 0);
    ///
    /// assert_eq!(every_other.to_list().unwrap(), ["a", "c"]);
    /// ```
    pub fn filter_indexed<P>(&self, predicate: P) -> Observable<T>
    where
        P: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.try_filter_indexed(move |value, index| Ok::<_, Infallible>(predicate(value, index)))
    }

    /// Filters with a fallible predicate; the first `Err` ends the stream as
    /// [`Error::Operator`].
    pub fn try_filter<E, P>(&self, predicate: P) -> Observable<T>
    where
        E: Into<BoxError>,
        P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    {
        self.try_filter_indexed(move |value, _| predicate(value))
    }

    fn try_filter_indexed<E, P>(&self, predicate: P) -> Observable<T>
    where
        E: Into<BoxError>,
        P: Fn(&T, usize) -> Result<bool, E> + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::create(move |sink: Subscriber<T>| {
            let predicate = Arc::clone(&predicate);
            let index = AtomicUsize::new(0);
            let upstream = sink.link();
            source.subscribe_with(
                {
                    let upstream = upstream.clone();
                    move |message: Message<T>| match message {
                        Message::Next(value) => {
                            let index = index.fetch_add(1, AtomicOrdering::AcqRel);
                            match predicate(&value, index) {
                                Ok(true) => sink.next(value),
                                Ok(false) => {},
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
            Disposable::empty()
        })
    }
}
