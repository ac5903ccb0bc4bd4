use std::sync::{Arc, Mutex};

use crate::{utils::sync::lock, Disposable, Error, Message, Observable, Result};

impl<T: 'static> Observable<T> {
    /// Subscribes and calls `f` on every value, ignoring the terminal signal.
    pub fn for_each<F>(&self, f: F) -> Disposable
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(move |message: Message<T>| {
            if let Message::Next(value) = message {
                f(value);
            }
        })
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Subscribes once and collects every value.
    ///
    /// Returns the values if the stream completed before `subscribe` returned, and the error if it
    /// failed. A stream still running at that point is disposed and reported as
    /// [`Error::Unfinished`].
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::{Error, Observable};
    ///
    /// assert_eq!(Observable::of([1, 2]).to_list().unwrap(), [1, 2]);
    /// assert!(matches!(Observable::<i32>::never().to_list(), Err(Error::Unfinished)));
    /// ```
    pub fn to_list(&self) -> Result<Vec<T>> {
        let collected = Arc::new(Mutex::new(Collected {
            values: Vec::new(),
            outcome: None,
        }));
        let subscription = self.subscribe({
            let collected = Arc::clone(&collected);
            move |message: Message<T>| {
                let mut collected = lock(&collected);
                match message {
                    Message::Next(value) => collected.values.push(value),
                    Message::Error(error) => collected.outcome = Some(Err(error)),
                    Message::Complete => collected.outcome = Some(Ok(())),
                }
            }
        });
        let mut collected = lock(&collected);
        match collected.outcome.take() {
            Some(Ok(())) => Ok(std::mem::take(&mut collected.values)),
            Some(Err(error)) => Err(error),
            None => {
                drop(collected);
                subscription.dispose();
                Err(Error::Unfinished)
            },
        }
    }
}

struct Collected<T> {
    values: Vec<T>,
    outcome: Option<Result<()>>,
}
