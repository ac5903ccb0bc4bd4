use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering},
        Arc,
    },
};

use crate::{BoxError, Disposable, Error, Message, Observable, Subscriber};

impl<T: 'static> Observable<T> {
    /// Skips the first `max` values of the source.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::counting().skip(2).take(3);
    ///
    /// assert_eq!(source.to_list().unwrap(), [2, 3, 4]);
    /// ```
    pub fn skip(&self, max: usize) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |sink: Subscriber<T>| {
            let skipped = AtomicUsize::new(0);
            let upstream = sink.link();
            source.subscribe_with(
                (move |message: Message<T>| match message {
                    Message::Next(value) => {
                        if skipped.load(AtomicOrdering::Acquire) < max {
                            skipped.fetch_add(1, AtomicOrdering::AcqRel);
                        } else {
                            sink.next(value);
                        }
                    },
                    Message::Error(error) => sink.error(error),
                    Message::Complete => sink.complete(),
                })
                .into(),
                &upstream,
            );
            Disposable::empty()
        })
    }

    /// Skips values while `predicate` holds; from the first value failing it onwards, that one
    /// included, everything passes through.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let source = Observable::of(["#", "# header", "a,b", "# not a comment"])
    ///     .skip_while(|line| line.starts_with('#'));
    ///
    /// assert_eq!(source.to_list().unwrap(), ["a,b", "# not a comment"]);
    /// ```
    pub fn skip_while<P>(&self, predicate: P) -> Observable<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_skip_while(move |value| Ok::<_, Infallible>(predicate(value)))
    }

    /// Like [`skip_while`](Observable::skip_while) with a fallible predicate. The first `Err`
    /// ends the stream as [`Error::Operator`]; once skipping stops the predicate is not called
    /// again.
    pub fn try_skip_while<E, P>(&self, predicate: P) -> Observable<T>
    where
        E: Into<BoxError>,
        P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::create(move |sink: Subscriber<T>| {
            let predicate = Arc::clone(&predicate);
            let skipping = AtomicBool::new(true);
            let upstream = sink.link();
            source.subscribe_with(
                {
                    let upstream = upstream.clone();
                    move |message: Message<T>| match message {
                        Message::Next(value) => {
                            if skipping.load(AtomicOrdering::Acquire) {
                                match predicate(&value) {
                                    Ok(true) => return,
                                    Ok(false) => skipping.store(false, AtomicOrdering::Release),
                                    Err(error) => {
                                        upstream.dispose();
                                        sink.error(Error::operator(error));
                                        return;
                                    },
                                }
                            }
                            sink.next(value);
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
